//! Common test utilities for command integration tests.
//!
//! Commands run against an in-memory SQLite database with sticker fetches
//! resolving immediately.

#![allow(dead_code)]

pub mod fixtures;

use std::path::Path;
use std::time::Duration;

use studydeck_core::{ClassEntity, StickerPicker, TopicEntity};
use studydeck_desktop::commands;
use studydeck_desktop::config::{Config, StorageBackend};
use studydeck_desktop::state::AppState;

pub struct TestContext {
    pub state: AppState,
}

impl TestContext {
    /// Context over a fresh in-memory database.
    pub fn new() -> Self {
        let state = AppState::in_memory(StickerPicker::default().with_delay(Duration::ZERO))
            .expect("Failed to open in-memory database");
        Self { state }
    }

    /// Context over a data file, as the app opens it at startup.
    pub fn with_storage(storage: StorageBackend, data_path: &Path) -> Self {
        let config = Config {
            storage,
            data_path: data_path.to_path_buf(),
            sticker_delay: Duration::ZERO,
            log_filter: "debug".to_string(),
        };
        Self {
            state: AppState::open(&config),
        }
    }

    pub async fn create_class(&self, name: &str) -> ClassEntity {
        commands::create_class(name.to_string(), &self.state)
            .await
            .expect("Failed to create class")
    }

    pub async fn create_topic(&self, class: &ClassEntity, name: &str) -> TopicEntity {
        commands::create_topic(class.id, name.to_string(), &self.state)
            .await
            .expect("Failed to create topic")
    }

    /// Class with one topic holding `num_cards` cards.
    pub async fn create_deck(&self, num_cards: usize) -> (ClassEntity, TopicEntity) {
        let class = self.create_class("Biology").await;
        let mut topic = self.create_topic(&class, "Cells").await;
        for i in 0..num_cards {
            let (front, back) = fixtures::card(i);
            topic = commands::create_flashcard(class.id, topic.id, front, back, &self.state)
                .await
                .expect("Failed to create flashcard");
        }
        (class, topic)
    }
}
