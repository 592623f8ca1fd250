//! Flashcard commands.

use super::CommandError;
use crate::state::{AppState, SelectionView};
use studydeck_core::stickers;
use studydeck_core::TopicEntity;
use uuid::Uuid;

/// Create a flashcard with fetched stickers. Returns the updated topic.
pub async fn create_flashcard(
    class_id: Uuid,
    topic_id: Uuid,
    front: String,
    back: String,
    state: &AppState,
) -> Result<TopicEntity, CommandError> {
    // Reject bad input before waiting on the sticker fetch.
    if front.trim().is_empty() || back.trim().is_empty() {
        return Err(studydeck_core::StoreError::Validation(
            "flashcard front and back are required".to_string(),
        )
        .into());
    }

    let keywords = stickers::keywords(&front, &back);
    let picked = state.stickers.fetch(&keywords).await;

    let mut store = state.store()?;
    store
        .create_flashcard(class_id, topic_id, &front, &back, picked)
        .map_err(Into::into)
}

/// Delete a flashcard. Returns the updated topic, if it still exists.
pub async fn delete_flashcard(
    topic_id: Uuid,
    card_id: Uuid,
    state: &AppState,
) -> Result<Option<TopicEntity>, CommandError> {
    let mut store = state.store()?;
    Ok(store.delete_flashcard(topic_id, card_id))
}

/// Currently open class and topic, as they exist in the store right now.
pub async fn get_selection(state: &AppState) -> Result<SelectionView, CommandError> {
    let store = state.store()?;
    let selection = state.selection()?;
    Ok(selection.resolve(&store))
}
