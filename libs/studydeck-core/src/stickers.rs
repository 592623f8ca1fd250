//! Decorative stickers attached to flashcards.
//!
//! Sticker "fetching" is simulated: it waits a fixed delay and then picks
//! from a local palette, so it always resolves.

use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;
use tracing::debug;

/// Maximum stickers stored on one card.
pub const MAX_STICKERS: usize = 3;

/// Default palette.
pub const PALETTE: [&str; 14] = [
    "👽", "💿", "💾", "👾", "🦋", "⚡", "🌈", "🎱", "🌸", "✨", "💅", "💖", "💊", "🧬",
];

/// Default simulated fetch latency.
pub const DEFAULT_FETCH_DELAY: Duration = Duration::from_millis(400);

/// Picks stickers for new cards.
#[derive(Debug, Clone)]
pub struct StickerPicker {
    palette: Vec<String>,
    count: usize,
    delay: Duration,
}

impl Default for StickerPicker {
    fn default() -> Self {
        Self {
            palette: PALETTE.iter().map(|s| s.to_string()).collect(),
            count: MAX_STICKERS,
            delay: DEFAULT_FETCH_DELAY,
        }
    }
}

impl StickerPicker {
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Pick distinct stickers at random.
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
        self.palette
            .choose_multiple(rng, self.count.min(MAX_STICKERS))
            .cloned()
            .collect()
    }

    /// Simulated lookup of stickers matching `keywords`.
    pub async fn fetch(&self, keywords: &str) -> Vec<String> {
        debug!(keywords, "fetching stickers");
        tokio::time::sleep(self.delay).await;
        self.random(&mut rand::thread_rng())
    }
}

/// Search keywords for a card: the first three words of front and back.
pub fn keywords(front: &str, back: &str) -> String {
    front
        .split_whitespace()
        .chain(back.split_whitespace())
        .take(3)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drop blanks and duplicates, keeping at most [`MAX_STICKERS`].
pub fn normalize(stickers: Vec<String>) -> Vec<String> {
    let mut kept: Vec<String> = Vec::with_capacity(MAX_STICKERS);
    for sticker in stickers {
        let sticker = sticker.trim();
        if sticker.is_empty() || kept.iter().any(|s| s == sticker) {
            continue;
        }
        kept.push(sticker.to_string());
        if kept.len() == MAX_STICKERS {
            break;
        }
    }
    kept
}
