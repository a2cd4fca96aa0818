//! Immutable record snapshots.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entities::Card;

/// An ordered set of records as extracted by one refresh.
///
/// Snapshots are never mutated after construction. The reader publishes a new
/// one on every refresh and hands out shared references to it.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<R> {
    records: Vec<R>,
    fetched_at: DateTime<Utc>,
    enriched: bool,
}

impl<R> Snapshot<R> {
    #[must_use]
    pub const fn new(records: Vec<R>, fetched_at: DateTime<Utc>, enriched: bool) -> Self {
        Self {
            records,
            fetched_at,
            enriched,
        }
    }

    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Moment the source was copied for this snapshot.
    #[must_use]
    pub const fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Whether every text field went through an enricher.
    #[must_use]
    pub const fn is_enriched(&self) -> bool {
        self.enriched
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }
}

impl Snapshot<Card> {
    /// Number of cards due at `now` (unix seconds).
    #[must_use]
    pub fn count_due(&self, now: u64) -> usize {
        self.records.iter().filter(|card| card.is_due(now)).count()
    }
}

impl<'a, R> IntoIterator for &'a Snapshot<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
