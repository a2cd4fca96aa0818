//! Sanitizer error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from setting up or maintaining the sanitizer.
///
/// Sanitizing itself only fails when the worker call fails; see
/// [`Sanitizer::sanitize`](crate::Sanitizer::sanitize).
#[derive(Debug, Error)]
pub enum SanitizeError {
    /// The banned word list could not be read.
    #[error("Failed to read banned word list {}: {source}", path.display())]
    WordList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The cache directory could not be created.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),
}
