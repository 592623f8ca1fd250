//! Bulk import commands.

use super::CommandError;
use crate::state::AppState;
use serde::Serialize;
use std::path::PathBuf;
use studydeck_core::{ImportReport, TopicEntity};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct ImportResponse {
    pub imported: usize,
    pub skipped: usize,
    pub topic: TopicEntity,
}

impl From<ImportReport> for ImportResponse {
    fn from(report: ImportReport) -> Self {
        Self {
            imported: report.imported,
            skipped: report.skipped,
            topic: report.topic,
        }
    }
}

/// Import `front, back` lines into a topic.
pub async fn import_bulk(
    class_id: Uuid,
    topic_id: Uuid,
    text: String,
    state: &AppState,
) -> Result<ImportResponse, CommandError> {
    let mut store = state.store()?;
    let report = store.import_bulk(
        class_id,
        topic_id,
        &text,
        &state.stickers,
        &mut rand::thread_rng(),
    )?;
    info!(imported = report.imported, skipped = report.skipped, "bulk import finished");
    Ok(report.into())
}

/// Read a text file and import it like [`import_bulk`].
pub async fn import_file(
    class_id: Uuid,
    topic_id: Uuid,
    path: PathBuf,
    state: &AppState,
) -> Result<ImportResponse, CommandError> {
    let text = tokio::fs::read_to_string(&path).await?;
    import_bulk(class_id, topic_id, text, state).await
}
