//! The extraction seam.

use std::path::Path;

use ankirus_core::Record;

/// Reads every record out of a private copy of the collection.
///
/// Called on the blocking pool. Implementations open `copy` read-only, read
/// what they need and close it again before returning; no handle outlives
/// the call.
pub trait Extractor: Send + Sync + 'static {
    type Record: Record;

    /// # Errors
    ///
    /// Any failure here fails the read that triggered the refresh.
    fn extract(&self, copy: &Path) -> anyhow::Result<Vec<Self::Record>>;
}

impl<X: Extractor> Extractor for std::sync::Arc<X> {
    type Record = X::Record;

    fn extract(&self, copy: &Path) -> anyhow::Result<Vec<Self::Record>> {
        X::extract(self.as_ref(), copy)
    }
}
