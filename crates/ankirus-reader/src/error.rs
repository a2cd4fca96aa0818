//! Reader error types.

use std::path::PathBuf;

use ankirus_core::EnrichError;
use thiserror::Error;

/// Errors that fail a [`CachedReader::read`](crate::CachedReader::read).
///
/// Whatever the variant, the previously published snapshot stays in place.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// The live collection file does not exist.
    #[error("Source collection not found: {}", .0.display())]
    SourceMissing(PathBuf),

    /// Copying the live files to their private location failed.
    #[error("Failed to copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The extraction collaborator failed on the private copy.
    #[error("Extraction failed: {0:#}")]
    Extract(anyhow::Error),

    /// A text field could not be enriched; nothing was published.
    #[error(transparent)]
    Enrich(#[from] EnrichError),

    /// The blocking refresh task panicked or was cancelled.
    #[error("Refresh task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
