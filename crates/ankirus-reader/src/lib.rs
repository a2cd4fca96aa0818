//! # ankirus-reader
//!
//! Cached, freshness-tracking access to a collection that another process
//! keeps open.
//!
//! [`CachedReader`] owns the single published [`Snapshot`](ankirus_core::Snapshot)
//! of a source. A read refreshes it when nothing is cached, when the source
//! file or its `-wal` side-file changed after the last copy was taken, when
//! the snapshot is older than the TTL, or when the caller asks for enriched
//! text and the snapshot has none. Refreshing copies the source to a private
//! path, hands the copy to an [`Extractor`] on the blocking pool, runs the
//! text fields through an optional [`TextEnricher`](ankirus_core::TextEnricher)
//! and only then publishes.

pub mod error;
pub mod extract;
pub mod freshness;
mod reader;
mod temp_copy;

pub use error::ReaderError;
pub use extract::Extractor;
pub use reader::{CachedReader, ReaderOptions, RefreshReason, SnapshotInfo, SourceProbe};
