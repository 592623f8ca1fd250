//! Review session commands.

use super::{CommandError, ErrorKind};
use crate::state::AppState;
use chrono::Utc;
use serde::Serialize;
use studydeck_core::{
    AnswerOutcome, EntityKind, IntervalPreview, Rating, SessionState, SessionSummary, StoreError,
};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct AnswerResponse {
    /// `None` when no card was revealed.
    pub outcome: Option<AnswerOutcome>,
    pub state: SessionState,
    pub summary: Option<SessionSummary>,
}

/// Start reviewing a topic. An empty topic leaves the session untouched.
pub async fn start_session(
    class_id: Uuid,
    topic_id: Uuid,
    state: &AppState,
) -> Result<SessionState, CommandError> {
    let mut session = state.session()?;
    let store = state.store()?;
    let topic = store.topic(class_id, topic_id).ok_or(StoreError::NotFound {
        kind: EntityKind::Topic,
        id: topic_id,
    })?;

    if !session.start(class_id, topic, Utc::now()) {
        debug!(%topic_id, "topic has no flashcards, session not started");
    }
    Ok(session.state())
}

/// Reshuffle the current topic and start over.
pub async fn restart_session(state: &AppState) -> Result<SessionState, CommandError> {
    let mut session = state.session()?;
    let (Some(class_id), Some(topic_id)) = (session.class_id(), session.topic_id()) else {
        return Err(CommandError::new(
            ErrorKind::Validation,
            "no session to restart",
        ));
    };

    let store = state.store()?;
    let topic = store.topic(class_id, topic_id).ok_or(StoreError::NotFound {
        kind: EntityKind::Topic,
        id: topic_id,
    })?;
    session.restart(class_id, topic, Utc::now());
    Ok(session.state())
}

pub async fn reveal_card(state: &AppState) -> Result<SessionState, CommandError> {
    let mut session = state.session()?;
    session.reveal();
    Ok(session.state())
}

/// Rate the revealed card (0 = again, 1 = hard, 2 = good, 3 = easy).
pub async fn submit_answer(rating: u8, state: &AppState) -> Result<AnswerResponse, CommandError> {
    let rating = Rating::from_value(rating).ok_or_else(|| {
        CommandError::new(ErrorKind::Validation, format!("invalid rating: {rating}"))
    })?;

    let mut session = state.session()?;
    let mut store = state.store()?;
    let outcome = session.answer(&mut store, rating, Utc::now())?;

    Ok(AnswerResponse {
        outcome,
        state: session.state(),
        summary: session.summary(),
    })
}

pub async fn exit_session(state: &AppState) -> Result<SessionState, CommandError> {
    let mut session = state.session()?;
    session.exit();
    Ok(session.state())
}

pub async fn get_session_state(state: &AppState) -> Result<SessionState, CommandError> {
    Ok(state.session()?.state())
}

/// Projected next interval for each rating of the current card.
pub async fn preview_intervals(state: &AppState) -> Result<Vec<IntervalPreview>, CommandError> {
    let session = state.session()?;
    let store = state.store()?;
    Ok(session.preview(&store, Utc::now()))
}
