//! Records produced by extraction.
//!
//! The cached reader is generic over [`Record`]; [`Card`] is the record type
//! read from an Anki collection.

mod card;

pub use card::Card;

/// A value extracted from the source collection.
///
/// Every free-text field returned by [`Record::text_fields_mut`] passes through
/// the reader's enricher (when one is supplied) before the record is published.
pub trait Record: Send + Sync + 'static {
    /// Group path of the record, segments joined with `::`.
    fn group(&self) -> &str;

    /// Free-text fields that must be enriched before leaving the core.
    fn text_fields_mut(&mut self) -> Vec<&mut String>;
}
