//! Headless desktop shell for the study app: storage, app state and the
//! commands a UI invokes.
//!
//! There is no window or Tauri entry point here. Each command is a plain
//! async function over [`AppState`](state::AppState) that a presentation
//! layer wires to its own event system.

pub mod commands;
pub mod config;
pub mod db;
pub mod state;

use anyhow::Context;
use config::Config;
use state::AppState;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber. Later calls are ignored.
pub fn init_logging(filter: &str) {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Read configuration, start logging and open the study data.
pub fn init() -> anyhow::Result<AppState> {
    let config = Config::from_env();
    init_logging(&config.log_filter);

    // Ensure data directory exists
    if let Some(parent) = config.data_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create data directory {}", parent.display()))?;
    }

    info!(path = %config.data_path.display(), storage = ?config.storage, "opening study data");
    Ok(AppState::open(&config))
}
