//! Spaced repetition scheduling.

pub mod sm2;

use crate::types::{Flashcard, Rating, Schedule};
use chrono::{DateTime, Utc};

pub use sm2::{Sm2, MAXIMUM_INTERVAL_DAYS};

/// Milliseconds in one scheduling day.
pub const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Trait for spaced repetition algorithms.
pub trait SpacedRepetitionAlgorithm: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// Calculate the next schedule after a review. Must be free of side
    /// effects so callers can use it for previews.
    fn schedule(&self, current: &Schedule, rating: Rating, now: DateTime<Utc>) -> Schedule;

    /// Initial schedule for a new card.
    fn initial_schedule(&self) -> Schedule;
}

/// Next schedule for `card` using the default parameters.
pub fn next_schedule(card: &Flashcard, rating: Rating, now: DateTime<Utc>) -> Schedule {
    Sm2::default().schedule(&card.schedule, rating, now)
}

/// Absolute due date for an interval measured from `now`. Saturates at
/// `i64::MAX` rather than wrapping.
pub fn due_date_after(now: DateTime<Utc>, interval_days: f64) -> i64 {
    // `as` saturates for out-of-range floats.
    let offset = (interval_days * MILLIS_PER_DAY).round() as i64;
    now.timestamp_millis().saturating_add(offset)
}

/// Render an interval the way rating buttons display it.
///
/// Anything under a day shows as `<10m`; otherwise the rounded day count.
pub fn format_interval(interval_days: f64) -> String {
    if interval_days < 1.0 {
        "<10m".to_string()
    } else {
        format!("{}d", interval_days.round() as i64)
    }
}
