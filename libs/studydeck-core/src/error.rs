//! Error types for studydeck-core.

use crate::types::EntityKind;
use thiserror::Error;
use uuid::Uuid;

/// Result type alias using StoreError.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised by card store and session operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: Uuid },

    #[error("inconsistent session state: {0}")]
    Consistency(String),
}

impl StoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn not_found(kind: EntityKind, id: Uuid) -> Self {
        Self::NotFound { kind, id }
    }
}

/// Errors reported by a persistence collaborator.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported schema version {0}")]
    UnsupportedVersion(u32),

    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}
