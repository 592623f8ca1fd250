//! Simplified SM-2 scheduler.
//!
//! Intervals multiply by the card's ease instead of following the
//! SuperMemo learning steps, and ease is clamped at a lower bound.

use super::{due_date_after, SpacedRepetitionAlgorithm};
use crate::types::{Rating, Schedule, INITIAL_EASE, MINIMUM_EASE};
use chrono::{DateTime, Utc};

/// Default interval cap: one hundred years.
pub const MAXIMUM_INTERVAL_DAYS: f64 = 36_500.0;

/// SM-2 variant with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    pub again_penalty: f64,
    pub hard_penalty: f64,
    pub easy_reward: f64,
    pub easy_bonus: f64,
    pub hard_multiplier: f64,
    pub graduating_interval: f64,
    pub easy_interval: f64,
    /// Upper bound on any interval, in days.
    pub maximum_interval: f64,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: INITIAL_EASE,
            minimum_ease: MINIMUM_EASE,
            again_penalty: 0.2,
            hard_penalty: 0.15,
            easy_reward: 0.15,
            easy_bonus: 1.3,
            hard_multiplier: 1.2,
            graduating_interval: 1.0,
            easy_interval: 4.0,
            maximum_interval: MAXIMUM_INTERVAL_DAYS,
        }
    }
}

impl SpacedRepetitionAlgorithm for Sm2 {
    fn name(&self) -> &'static str {
        "sm2"
    }

    fn initial_schedule(&self) -> Schedule {
        Schedule {
            interval: 0.0,
            ease: self.initial_ease,
            due_date: 0,
        }
    }

    fn schedule(&self, current: &Schedule, rating: Rating, now: DateTime<Utc>) -> Schedule {
        let (interval, ease) = self.next_interval_and_ease(current, rating);

        Schedule {
            interval,
            ease,
            due_date: due_date_after(now, interval),
        }
    }
}

impl Sm2 {
    fn next_interval_and_ease(&self, current: &Schedule, rating: Rating) -> (f64, f64) {
        let (interval, ease) = self.uncapped(current, rating);
        (interval.min(self.maximum_interval), ease)
    }

    fn uncapped(&self, current: &Schedule, rating: Rating) -> (f64, f64) {
        let is_new = current.interval == 0.0;
        let ease = current.ease;

        match rating {
            Rating::Again => (0.0, self.clamp_ease(ease - self.again_penalty)),
            Rating::Hard => {
                let interval = if is_new {
                    self.graduating_interval
                } else {
                    current.interval * self.hard_multiplier
                };
                (interval, self.clamp_ease(ease - self.hard_penalty))
            }
            Rating::Good => {
                let interval = if is_new {
                    self.graduating_interval
                } else {
                    current.interval * ease
                };
                (interval, ease)
            }
            Rating::Easy => {
                let interval = if is_new {
                    self.easy_interval
                } else {
                    current.interval * ease * self.easy_bonus
                };
                (interval, ease + self.easy_reward)
            }
        }
    }

    fn clamp_ease(&self, ease: f64) -> f64 {
        ease.max(self.minimum_ease)
    }
}
