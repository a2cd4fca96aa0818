//! Collection defaults and sentinels.

/// Due timestamp for cards that are never scheduled (suspended, buried).
pub const NEVER_DUE: u64 = u64::MAX;

/// FSRS difficulty used when a card has no memory state.
pub const DEFAULT_DIFFICULTY: f64 = 5.5;

/// FSRS stability used when a card has no memory state.
pub const DEFAULT_STABILITY: f64 = 0.0;

/// FSRS decay used when the card carries none.
pub const DEFAULT_DECAY: f64 = 0.1542;

/// Separator between deck names in a group path.
pub const GROUP_SEPARATOR: &str = "::";

/// Seconds per day, for retention arithmetic.
pub const SECS_PER_DAY: f64 = 86_400.0;
