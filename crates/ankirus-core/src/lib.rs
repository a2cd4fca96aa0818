//! # ankirus-core
//!
//! Core types shared across all ankirus crates:
//! - The [`Record`] trait and the [`Card`](entities::Card) record read from a collection
//! - [`Snapshot`], the immutable unit published by the cached reader
//! - [`TextEnricher`], the capability a reader uses to clean free-text fields
//! - Collection defaults and sentinels
//! - The error type enrichers report through

pub mod constants;
pub mod enrich;
pub mod entities;
pub mod snapshot;

pub use enrich::{EnrichError, TextEnricher};
pub use entities::{Card, Record};
pub use snapshot::Snapshot;
