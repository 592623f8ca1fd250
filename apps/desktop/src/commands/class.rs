//! Class commands.

use super::CommandError;
use crate::state::{AppState, Selection};
use studydeck_core::{ClassEntity, EntityKind, StoreError};
use uuid::Uuid;

/// List all classes.
pub async fn list_classes(state: &AppState) -> Result<Vec<ClassEntity>, CommandError> {
    let store = state.store()?;
    Ok(store.classes().to_vec())
}

/// Create a class.
pub async fn create_class(name: String, state: &AppState) -> Result<ClassEntity, CommandError> {
    let mut store = state.store()?;
    store.create_class(&name).map_err(Into::into)
}

/// Delete a class and everything in it. Clears the selection if it pointed
/// into the deleted class.
pub async fn delete_class(
    class_id: Uuid,
    state: &AppState,
) -> Result<Vec<ClassEntity>, CommandError> {
    let mut store = state.store()?;
    let classes = store.delete_class(class_id).to_vec();

    let mut selection = state.selection()?;
    if selection.class_id == Some(class_id) {
        *selection = Selection::default();
    }

    Ok(classes)
}

/// Open a class, closing any open topic.
pub async fn select_class(class_id: Uuid, state: &AppState) -> Result<ClassEntity, CommandError> {
    let store = state.store()?;
    let class = store
        .class(class_id)
        .cloned()
        .ok_or(StoreError::NotFound {
            kind: EntityKind::Class,
            id: class_id,
        })?;

    *state.selection()? = Selection {
        class_id: Some(class_id),
        topic_id: None,
    };
    Ok(class)
}
