//! Database error types.

use studydeck_core::PersistError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported schema version {found}, expected at most {supported}")]
    UnsupportedSchema { found: i32, supported: i32 },

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl From<DbError> for PersistError {
    fn from(e: DbError) -> Self {
        PersistError::Backend(Box::new(e))
    }
}
