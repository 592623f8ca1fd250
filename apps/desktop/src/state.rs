//! Application state.

use crate::commands::CommandError;
use crate::config::{Config, StorageBackend};
use crate::db::SqliteRepository;
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};
use studydeck_core::{
    CardStore, ClassEntity, JsonFilePersistence, MemoryPersistence, Persistence,
    SessionController, StickerPicker, TopicEntity,
};
use tracing::{info, warn};
use uuid::Uuid;

/// Currently open class/topic, held by id and re-resolved on every read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub class_id: Option<Uuid>,
    pub topic_id: Option<Uuid>,
}

/// Selection resolved against the current store contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectionView {
    pub class: Option<ClassEntity>,
    pub topic: Option<TopicEntity>,
}

impl Selection {
    pub fn resolve(&self, store: &CardStore) -> SelectionView {
        let class = self.class_id.and_then(|id| store.class(id)).cloned();
        let topic = match (self.class_id, self.topic_id) {
            (Some(class_id), Some(topic_id)) => store.topic(class_id, topic_id).cloned(),
            _ => None,
        };
        SelectionView { class, topic }
    }
}

/// Global application state.
pub struct AppState {
    pub store: Mutex<CardStore>,
    pub session: Mutex<SessionController>,
    pub selection: Mutex<Selection>,
    pub stickers: StickerPicker,
}

impl AppState {
    pub fn new(store: CardStore, stickers: StickerPicker) -> Self {
        let session = SessionController::new();
        let store = store.with_initial_schedule(session.initial_schedule());
        Self {
            store: Mutex::new(store),
            session: Mutex::new(session),
            selection: Mutex::new(Selection::default()),
            stickers,
        }
    }

    /// Open the configured storage. If the database cannot be opened the
    /// app runs on an in-memory store instead of failing.
    pub fn open(config: &Config) -> Self {
        let stickers = StickerPicker::default().with_delay(config.sticker_delay);
        let store = CardStore::load(open_persistence(config));
        Self::new(store, stickers)
    }

    /// State over an in-memory SQLite database (for testing).
    pub fn in_memory(stickers: StickerPicker) -> Result<Self, CommandError> {
        let repo = SqliteRepository::open_in_memory()?;
        Ok(Self::new(CardStore::load(Box::new(repo)), stickers))
    }

    pub fn store(&self) -> Result<MutexGuard<'_, CardStore>, CommandError> {
        self.store.lock().map_err(|_| CommandError::poisoned("store"))
    }

    pub fn session(&self) -> Result<MutexGuard<'_, SessionController>, CommandError> {
        self.session.lock().map_err(|_| CommandError::poisoned("session"))
    }

    pub fn selection(&self) -> Result<MutexGuard<'_, Selection>, CommandError> {
        self.selection.lock().map_err(|_| CommandError::poisoned("selection"))
    }
}

fn open_persistence(config: &Config) -> Box<dyn Persistence> {
    match config.storage {
        StorageBackend::Sqlite => match SqliteRepository::open(&config.data_path) {
            Ok(repo) => Box::new(repo),
            Err(e) => {
                warn!(path = %config.data_path.display(), error = %e, "failed to open database, using in-memory store");
                Box::new(MemoryPersistence::new())
            }
        },
        StorageBackend::Json => {
            let file = JsonFilePersistence::new(&config.data_path);
            info!(path = %file.path().display(), "using JSON storage");
            Box::new(file)
        }
    }
}
