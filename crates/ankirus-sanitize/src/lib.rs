//! # ankirus-sanitize
//!
//! Memoizing sanitizer for free text headed out of the reader.
//!
//! A miss runs the text through the worker's `purify` call, then removes every
//! banned word until nothing changes, and records the result in a libSQL
//! table keyed by the original text. Hits never touch the worker.
//!
//! [`Sanitizer`] implements [`ankirus_core::TextEnricher`], which is how the
//! cached reader consumes it.

pub mod banned;
pub mod error;
mod sanitizer;
pub mod store;

pub use banned::BannedWords;
pub use error::SanitizeError;
pub use sanitizer::{Purifier, Sanitizer};
pub use store::{CacheStats, SanitizeStore};
