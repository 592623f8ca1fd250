//! Runtime configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;
use studydeck_core::stickers::DEFAULT_FETCH_DELAY;

const DATA_DIR_VAR: &str = "STUDYDECK_DATA_DIR";
const STICKER_DELAY_VAR: &str = "STUDYDECK_STICKER_DELAY_MS";
const LOG_FILTER_VAR: &str = "RUST_LOG";
const STORAGE_VAR: &str = "STUDYDECK_STORAGE";

const APP_DIR: &str = "studydeck";

/// Where study data is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageBackend {
    #[default]
    Sqlite,
    /// Single versioned JSON document.
    Json,
}

impl StorageBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Some(Self::Sqlite),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    fn file_name(self) -> &'static str {
        match self {
            Self::Sqlite => "studydeck.db",
            Self::Json => "studydeck.json",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub storage: StorageBackend,
    pub data_path: PathBuf,
    pub sticker_delay: Duration,
    pub log_filter: String,
}

impl Config {
    /// Read configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = lookup(DATA_DIR_VAR)
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let sticker_delay = lookup(STICKER_DELAY_VAR)
            .and_then(|ms| ms.trim().parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_FETCH_DELAY);

        let log_filter = lookup(LOG_FILTER_VAR).unwrap_or_else(|| "info".to_string());

        let storage = lookup(STORAGE_VAR)
            .and_then(|value| StorageBackend::parse(&value))
            .unwrap_or_default();

        Self {
            storage,
            data_path: data_dir.join(storage.file_name()),
            sticker_delay,
            log_filter,
        }
    }
}

fn default_data_dir() -> PathBuf {
    // Use app data directory for production, fallback to current dir
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}
