//! Text enrichment capability.
//!
//! The cached reader knows nothing about what "enrichment" means: it is handed
//! something implementing [`TextEnricher`] and runs every free-text field of
//! every record through it during a refresh.

use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by an enricher. Aborts the refresh that triggered it.
#[derive(Debug, Error)]
#[error("text enrichment failed: {source}")]
pub struct EnrichError {
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl EnrichError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// Transforms one free-text field into its published form.
#[async_trait]
pub trait TextEnricher: Send + Sync {
    /// Enrich `text`, returning the value to publish in its place.
    async fn enrich(&self, text: &str) -> Result<String, EnrichError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    #[async_trait]
    impl TextEnricher for Upper {
        async fn enrich(&self, text: &str) -> Result<String, EnrichError> {
            if text.is_empty() {
                return Err(EnrichError::new("empty input"));
            }
            Ok(text.to_uppercase())
        }
    }

    #[tokio::test]
    async fn enricher_transforms_text() {
        assert_eq!(Upper.enrich("abc").await.unwrap(), "ABC");
    }

    #[tokio::test]
    async fn enrich_error_keeps_source_message() {
        let err = Upper.enrich("").await.unwrap_err();
        assert_eq!(err.to_string(), "text enrichment failed: empty input");
        assert!(std::error::Error::source(&err).is_some());
    }
}
