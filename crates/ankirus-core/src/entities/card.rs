use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DECAY, DEFAULT_DIFFICULTY, DEFAULT_STABILITY, GROUP_SEPARATOR, NEVER_DUE,
    SECS_PER_DAY,
};
use crate::entities::Record;

/// One card of the collection, with its memory state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Card {
    pub cid: i64,
    /// Deck path, e.g. `"Languages::Japanese::Kanji"`.
    pub group: String,
    pub front: String,
    pub back: String,
    /// Last real review (unix seconds), 0 when never reviewed.
    pub time: i64,
    pub difficulty: f64,
    pub stability: f64,
    pub decay: f64,
    pub paused: bool,
    /// Next due moment (unix seconds). `0` for new cards, [`NEVER_DUE`] when unscheduled.
    pub due: u64,
}

impl Card {
    /// A new, never-reviewed card with default memory state.
    #[must_use]
    pub fn new(
        cid: i64,
        group: impl Into<String>,
        front: impl Into<String>,
        back: impl Into<String>,
    ) -> Self {
        Self {
            cid,
            group: group.into(),
            front: front.into(),
            back: back.into(),
            time: 0,
            difficulty: DEFAULT_DIFFICULTY,
            stability: DEFAULT_STABILITY,
            decay: DEFAULT_DECAY,
            paused: false,
            due: 0,
        }
    }

    /// Deck path split into its segments.
    #[must_use]
    pub fn group_path(&self) -> Vec<&str> {
        self.group.split(GROUP_SEPARATOR).collect()
    }

    /// Whether the card is due at `now` (unix seconds).
    #[must_use]
    pub const fn is_due(&self, now: u64) -> bool {
        self.due != NEVER_DUE && self.due <= now
    }

    /// FSRS retrievability at unix time `at`.
    ///
    /// Returns 0 for cards without stability (new cards).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn retention(&self, at: i64) -> f64 {
        if self.stability == 0.0 {
            return 0.0;
        }
        let days_elapsed = (at - self.time) as f64 / SECS_PER_DAY;
        let factor = 0.9_f64.powf(1.0 / -self.decay) - 1.0;
        (days_elapsed / self.stability).mul_add(factor, 1.0).powf(-self.decay)
    }
}

impl Record for Card {
    fn group(&self) -> &str {
        &self.group
    }

    fn text_fields_mut(&mut self) -> Vec<&mut String> {
        vec![&mut self.front, &mut self.back]
    }
}
