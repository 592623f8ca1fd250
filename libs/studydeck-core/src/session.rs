//! Review session controller.
//!
//! ```text
//! Idle ──start──▶ Question ──reveal──▶ Answer ──answer──▶ Question … ──▶ Finished
//! ```
//!
//! The deck is a snapshot of the topic's cards taken at start. Ratings are
//! written back through the [`CardStore`] before the session advances.

use crate::algorithm::{format_interval, Sm2, SpacedRepetitionAlgorithm};
use crate::error::{Result, StoreError};
use crate::store::CardStore;
use crate::types::{Flashcard, Rating, Schedule, TopicEntity};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

/// Accuracy at or above this percentage counts as a passed session.
pub const PASS_ACCURACY: u32 = 80;

/// Phase of a review session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    /// Active, card front showing.
    Question,
    /// Active, card back revealed.
    Answer,
    Finished,
}

/// Read-only view of the session for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub active: bool,
    pub revealed: bool,
    pub finished: bool,
    pub deck: Vec<Uuid>,
    pub position: usize,
    pub score: u64,
    pub streak: u32,
    pub max_streak: u32,
    pub correct_count: usize,
    pub current: Option<Flashcard>,
}

impl SessionState {
    /// Score padded to six digits for the scoreboard.
    pub fn score_display(&self) -> String {
        format!("{:06}", self.score)
    }
}

/// Result of answering one card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerOutcome {
    pub card_id: Uuid,
    pub rating: Rating,
    pub points: u64,
    pub streak: u32,
    pub schedule: Schedule,
    pub finished: bool,
}

/// Terminal results of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub score: u64,
    pub max_streak: u32,
    pub accuracy: u32,
    pub passed: bool,
}

/// Projected interval for one rating button.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalPreview {
    pub rating: Rating,
    pub interval: f64,
    pub label: String,
}

/// Points earned and the streak after a rating, given the streak before it.
pub fn score_answer(rating: Rating, streak: u32) -> (u64, u32) {
    let base = u64::from(streak);
    match rating {
        Rating::Again => (0, 0),
        Rating::Hard => (50 + base * 10, streak),
        Rating::Good => (100 + base * 20, streak + 1),
        Rating::Easy => (150 + base * 30, streak + 2),
    }
}

/// Order a deck: due cards first, each partition shuffled.
pub fn build_deck<R: Rng + ?Sized>(
    cards: &[Flashcard],
    now_millis: i64,
    rng: &mut R,
) -> Vec<Flashcard> {
    let (mut due, mut later): (Vec<Flashcard>, Vec<Flashcard>) = cards
        .iter()
        .cloned()
        .partition(|card| card.schedule.is_due(now_millis));
    due.shuffle(rng);
    later.shuffle(rng);
    due.extend(later);
    due
}

pub struct SessionController {
    algorithm: Box<dyn SpacedRepetitionAlgorithm>,
    phase: SessionPhase,
    class_id: Option<Uuid>,
    topic_id: Option<Uuid>,
    deck: Vec<Flashcard>,
    position: usize,
    score: u64,
    streak: u32,
    max_streak: u32,
    correct_count: usize,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionController {
    pub fn new() -> Self {
        Self::with_algorithm(Box::new(Sm2::default()))
    }

    pub fn with_algorithm(algorithm: Box<dyn SpacedRepetitionAlgorithm>) -> Self {
        Self {
            algorithm,
            phase: SessionPhase::Idle,
            class_id: None,
            topic_id: None,
            deck: Vec::new(),
            position: 0,
            score: 0,
            streak: 0,
            max_streak: 0,
            correct_count: 0,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn topic_id(&self) -> Option<Uuid> {
        self.topic_id
    }

    pub fn class_id(&self) -> Option<Uuid> {
        self.class_id
    }

    /// Schedule new cards should start from under this controller's algorithm.
    pub fn initial_schedule(&self) -> Schedule {
        self.algorithm.initial_schedule()
    }

    /// Start a session over `topic`, owned by `class_id`.
    ///
    /// Returns `false` without changing state when the topic has no cards.
    pub fn start(&mut self, class_id: Uuid, topic: &TopicEntity, now: DateTime<Utc>) -> bool {
        self.start_with_rng(class_id, topic, now, &mut rand::thread_rng())
    }

    pub fn start_with_rng<R: Rng + ?Sized>(
        &mut self,
        class_id: Uuid,
        topic: &TopicEntity,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> bool {
        if topic.flashcards.is_empty() {
            return false;
        }

        self.deck = build_deck(&topic.flashcards, now.timestamp_millis(), rng);
        self.class_id = Some(class_id);
        self.topic_id = Some(topic.id);
        self.phase = SessionPhase::Question;
        self.position = 0;
        self.score = 0;
        self.streak = 0;
        self.max_streak = 0;
        self.correct_count = 0;

        info!(
            topic = %topic.name,
            cards = self.deck.len(),
            algorithm = self.algorithm.name(),
            "review session started"
        );
        true
    }

    /// Reshuffle and reset counters for the same topic.
    pub fn restart(&mut self, class_id: Uuid, topic: &TopicEntity, now: DateTime<Utc>) -> bool {
        self.start(class_id, topic, now)
    }

    /// Flip the current card. Returns `false` unless a front was showing.
    pub fn reveal(&mut self) -> bool {
        if self.phase != SessionPhase::Question {
            return false;
        }
        self.phase = SessionPhase::Answer;
        true
    }

    /// Rate the revealed card.
    ///
    /// Returns `Ok(None)` when no card is revealed. If the owning class has
    /// been deleted from `store`, the session is finished and a
    /// [`StoreError::Consistency`] is returned without writing anything.
    pub fn answer(
        &mut self,
        store: &mut CardStore,
        rating: Rating,
        now: DateTime<Utc>,
    ) -> Result<Option<AnswerOutcome>> {
        if self.phase != SessionPhase::Answer {
            return Ok(None);
        }

        let class_id = self.class_id;
        if class_id.and_then(|id| store.class(id)).is_none() {
            self.phase = SessionPhase::Finished;
            warn!(class_id = ?class_id, "owning class missing during review, ending session");
            return Err(StoreError::Consistency(
                "owning class no longer exists".to_string(),
            ));
        }

        let Some(card) = self.deck.get(self.position) else {
            self.phase = SessionPhase::Finished;
            return Err(StoreError::Consistency(format!(
                "session position {} outside deck of {}",
                self.position,
                self.deck.len()
            )));
        };
        let card_id = card.id;
        let current = canonical_schedule(store, card);
        let schedule = self.algorithm.schedule(&current, rating, now);
        store.update_flashcard_scheduling(card_id, schedule);

        let (points, streak) = score_answer(rating, self.streak);
        self.score += points;
        self.streak = streak;
        self.max_streak = self.max_streak.max(streak);
        if rating.is_correct() {
            self.correct_count += 1;
        }

        let finished = self.position + 1 >= self.deck.len();
        if finished {
            self.phase = SessionPhase::Finished;
            info!(score = self.score, max_streak = self.max_streak, "review session finished");
        } else {
            self.position += 1;
            self.phase = SessionPhase::Question;
        }

        Ok(Some(AnswerOutcome {
            card_id,
            rating,
            points,
            streak,
            schedule,
            finished,
        }))
    }

    /// Abandon the session.
    pub fn exit(&mut self) {
        let algorithm = std::mem::replace(&mut self.algorithm, Box::new(Sm2::default()));
        *self = Self::with_algorithm(algorithm);
    }

    pub fn current_card(&self) -> Option<&Flashcard> {
        match self.phase {
            SessionPhase::Question | SessionPhase::Answer => self.deck.get(self.position),
            SessionPhase::Idle | SessionPhase::Finished => None,
        }
    }

    /// Projected interval for every rating of the current card, computed
    /// from the same schedule [`answer`](Self::answer) would commit against.
    pub fn preview(&self, store: &CardStore, now: DateTime<Utc>) -> Vec<IntervalPreview> {
        let Some(card) = self.current_card() else {
            return Vec::new();
        };
        let current = canonical_schedule(store, card);
        Rating::ALL
            .iter()
            .map(|&rating| {
                let next = self.algorithm.schedule(&current, rating, now);
                IntervalPreview {
                    rating,
                    interval: next.interval,
                    label: format_interval(next.interval),
                }
            })
            .collect()
    }

    pub fn state(&self) -> SessionState {
        let active = matches!(self.phase, SessionPhase::Question | SessionPhase::Answer);
        SessionState {
            phase: self.phase,
            active,
            revealed: self.phase == SessionPhase::Answer,
            finished: self.phase == SessionPhase::Finished,
            deck: self.deck.iter().map(|card| card.id).collect(),
            position: self.position,
            score: self.score,
            streak: self.streak,
            max_streak: self.max_streak,
            correct_count: self.correct_count,
            current: self.current_card().cloned(),
        }
    }

    /// Final results, once the session is finished.
    pub fn summary(&self) -> Option<SessionSummary> {
        if self.phase != SessionPhase::Finished {
            return None;
        }
        let accuracy = accuracy(self.correct_count, self.deck.len());
        Some(SessionSummary {
            score: self.score,
            max_streak: self.max_streak,
            accuracy,
            passed: accuracy >= PASS_ACCURACY,
        })
    }
}

/// The store copy is canonical; the deck snapshot may be behind it.
fn canonical_schedule(store: &CardStore, card: &Flashcard) -> Schedule {
    store
        .flashcard(card.id)
        .map(|stored| stored.schedule)
        .unwrap_or(card.schedule)
}

fn accuracy(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (correct as f64 / total as f64 * 100.0).round() as u32
}
