//! Commands invoked by the presentation layer.
//!
//! Each command maps one user intent onto the core and returns a snapshot
//! the UI can render. Selections are re-resolved by id after mutations.

pub mod card;
pub mod class;
pub mod import;
pub mod study;
pub mod topic;

use serde::{Deserialize, Serialize};
use studydeck_core::StoreError;

pub use card::{create_flashcard, delete_flashcard, get_selection};
pub use class::{create_class, delete_class, list_classes, select_class};
pub use import::{import_bulk, import_file, ImportResponse};
pub use study::{
    exit_session, get_session_state, preview_intervals, restart_session, reveal_card,
    start_session, submit_answer, AnswerResponse,
};
pub use topic::{create_topic, delete_topic, list_topics, select_topic, TopicOverview};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Consistency,
    Io,
    Internal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandError {
    pub kind: ErrorKind,
    pub message: String,
}

impl CommandError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn poisoned(what: &str) -> Self {
        Self::new(ErrorKind::Internal, format!("{what} lock poisoned"))
    }
}

impl From<StoreError> for CommandError {
    fn from(e: StoreError) -> Self {
        let kind = match e {
            StoreError::Validation(_) => ErrorKind::Validation,
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::Consistency(_) => ErrorKind::Consistency,
        };
        Self::new(kind, e.to_string())
    }
}

impl From<crate::db::DbError> for CommandError {
    fn from(e: crate::db::DbError) -> Self {
        Self::new(ErrorKind::Internal, e.to_string())
    }
}

impl From<std::io::Error> for CommandError {
    fn from(e: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studydeck_core::EntityKind;
    use uuid::Uuid;

    #[test]
    fn store_errors_keep_their_kind() {
        let err: CommandError = StoreError::Validation("name is required".into()).into();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err: CommandError = StoreError::NotFound {
            kind: EntityKind::Class,
            id: Uuid::nil(),
        }
        .into();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(err.message.starts_with("class not found"));

        let err: CommandError = StoreError::Consistency("gone".into()).into();
        assert_eq!(err.kind, ErrorKind::Consistency);
    }

    #[test]
    fn io_errors_map_to_io_kind() {
        let err: CommandError = std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert_eq!(err.kind, ErrorKind::Io);
        assert_eq!(err.message, "missing");
    }
}
