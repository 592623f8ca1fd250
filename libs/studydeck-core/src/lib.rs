//! Core study library: the class/topic/flashcard store and the review engine.
//!
//! Provides:
//! - Card store with cascading deletes and pluggable persistence
//! - Simplified SM-2 scheduler and interval formatting
//! - Review session controller (deck ordering, scoring, streaks)
//! - Bulk import of comma-delimited front/back pairs
//! - Text reflow and decorative stickers for new cards

pub mod algorithm;
pub mod error;
pub mod import;
pub mod persist;
pub mod session;
pub mod stickers;
pub mod store;
pub mod text;
pub mod types;

pub use algorithm::{format_interval, next_schedule, Sm2, SpacedRepetitionAlgorithm};
pub use error::{PersistError, Result, StoreError};
pub use import::parse_bulk_input;
pub use persist::{JsonFilePersistence, MemoryPersistence, Persistence};
pub use session::{
    AnswerOutcome, IntervalPreview, SessionController, SessionPhase, SessionState, SessionSummary,
};
pub use stickers::StickerPicker;
pub use store::{CardStore, ImportReport};
pub use text::organize_text;
pub use types::{
    ClassEntity, EntityKind, Flashcard, Rating, RawCard, Schedule, TopicEntity, INITIAL_EASE,
    MINIMUM_EASE,
};
