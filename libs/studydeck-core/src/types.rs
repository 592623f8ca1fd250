//! Core types for the class → topic → flashcard hierarchy.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Ease assigned to a card that has never been reviewed.
pub const INITIAL_EASE: f64 = 2.5;

/// Lower bound for a card's ease.
pub const MINIMUM_EASE: f64 = 1.3;

/// Rating for a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    /// All ratings in button order.
    pub const ALL: [Rating; 4] = [Self::Again, Self::Hard, Self::Good, Self::Easy];

    /// Convert to numeric value (0-3).
    pub fn to_value(self) -> u8 {
        match self {
            Self::Again => 0,
            Self::Hard => 1,
            Self::Good => 2,
            Self::Easy => 3,
        }
    }

    /// Create from numeric value (0-3).
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Again),
            1 => Some(Self::Hard),
            2 => Some(Self::Good),
            3 => Some(Self::Easy),
            _ => None,
        }
    }

    /// Map a hit/miss answer to a rating.
    /// Miss -> Again, Hit -> Good
    pub fn from_hit(hit: bool) -> Self {
        if hit { Self::Good } else { Self::Again }
    }

    /// Whether the rating counts towards session accuracy.
    pub fn is_correct(self) -> bool {
        !matches!(self, Self::Again)
    }
}

/// Scheduling fields of a flashcard.
///
/// `due_date` is epoch milliseconds; `0` means the card was never reviewed
/// and is due immediately.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub interval: f64,
    pub ease: f64,
    pub due_date: i64,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            interval: 0.0,
            ease: INITIAL_EASE,
            due_date: 0,
        }
    }
}

impl Schedule {
    /// Whether the card is eligible for review at `now_millis`.
    pub fn is_due(&self, now_millis: i64) -> bool {
        self.due_date == 0 || self.due_date <= now_millis
    }
}

/// A single flashcard. Owned by exactly one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: Uuid,
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub stickers: Vec<String>,
    #[serde(flatten)]
    pub schedule: Schedule,
}

/// A named group of flashcards inside a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicEntity {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub flashcards: Vec<Flashcard>,
}

impl TopicEntity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            flashcards: Vec::new(),
        }
    }

    /// Number of cards due at `now_millis`.
    pub fn due_count(&self, now_millis: i64) -> usize {
        self.flashcards
            .iter()
            .filter(|card| card.schedule.is_due(now_millis))
            .count()
    }
}

/// Top-level grouping; exclusively owns its topics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassEntity {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub topics: Vec<TopicEntity>,
}

impl ClassEntity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            topics: Vec::new(),
        }
    }

    pub fn topic(&self, topic_id: Uuid) -> Option<&TopicEntity> {
        self.topics.iter().find(|t| t.id == topic_id)
    }

    /// Total flashcards across all topics.
    pub fn card_count(&self) -> usize {
        self.topics.iter().map(|t| t.flashcards.len()).sum()
    }
}

/// Front/back pair parsed from bulk input, before it becomes a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCard {
    pub front: String,
    pub back: String,
    pub line_number: usize,
}

/// Kind of entity referenced by an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Class,
    Topic,
    Flashcard,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Class => "class",
            Self::Topic => "topic",
            Self::Flashcard => "flashcard",
        };
        f.write_str(name)
    }
}
