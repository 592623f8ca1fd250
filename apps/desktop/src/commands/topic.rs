//! Topic commands.

use super::CommandError;
use crate::state::{AppState, Selection};
use chrono::Utc;
use serde::Serialize;
use studydeck_core::{ClassEntity, EntityKind, StoreError, TopicEntity};
use uuid::Uuid;

/// Topic row for a class overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicOverview {
    pub id: Uuid,
    pub name: String,
    pub card_count: usize,
    /// Cards that would open a session right now.
    pub due_count: usize,
}

/// List a class's topics with card and due counts.
pub async fn list_topics(
    class_id: Uuid,
    state: &AppState,
) -> Result<Vec<TopicOverview>, CommandError> {
    let store = state.store()?;
    let class = store.class(class_id).ok_or(StoreError::NotFound {
        kind: EntityKind::Class,
        id: class_id,
    })?;

    let now = Utc::now().timestamp_millis();
    Ok(class
        .topics
        .iter()
        .map(|topic| TopicOverview {
            id: topic.id,
            name: topic.name.clone(),
            card_count: topic.flashcards.len(),
            due_count: topic.due_count(now),
        })
        .collect())
}

/// Create a topic inside a class.
pub async fn create_topic(
    class_id: Uuid,
    name: String,
    state: &AppState,
) -> Result<TopicEntity, CommandError> {
    let mut store = state.store()?;
    store.create_topic(class_id, &name).map_err(Into::into)
}

/// Delete a topic and its cards. Returns the updated class, if it still exists.
pub async fn delete_topic(
    class_id: Uuid,
    topic_id: Uuid,
    state: &AppState,
) -> Result<Option<ClassEntity>, CommandError> {
    let mut store = state.store()?;
    let class = store.delete_topic(class_id, topic_id);

    let mut selection = state.selection()?;
    if selection.topic_id == Some(topic_id) {
        selection.topic_id = None;
    }

    Ok(class)
}

/// Open a topic (and its class).
pub async fn select_topic(
    class_id: Uuid,
    topic_id: Uuid,
    state: &AppState,
) -> Result<TopicEntity, CommandError> {
    let store = state.store()?;
    if store.class(class_id).is_none() {
        return Err(StoreError::NotFound {
            kind: EntityKind::Class,
            id: class_id,
        }
        .into());
    }
    let topic = store
        .topic(class_id, topic_id)
        .cloned()
        .ok_or(StoreError::NotFound {
            kind: EntityKind::Topic,
            id: topic_id,
        })?;

    *state.selection()? = Selection {
        class_id: Some(class_id),
        topic_id: Some(topic_id),
    };
    Ok(topic)
}
