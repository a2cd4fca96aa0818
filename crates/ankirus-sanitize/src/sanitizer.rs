use std::sync::Arc;

use ankirus_bridge::{BridgeError, WorkerBridge};
use ankirus_core::{EnrichError, TextEnricher};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::banned::BannedWords;
use crate::error::SanitizeError;
use crate::store::{CacheStats, SanitizeStore};

/// The remote half of the cleanup pipeline.
#[async_trait]
pub trait Purifier: Send + Sync {
    async fn purify(&self, text: &str) -> Result<String, BridgeError>;
}

#[async_trait]
impl Purifier for WorkerBridge {
    async fn purify(&self, text: &str) -> Result<String, BridgeError> {
        WorkerBridge::purify(self, text).await
    }
}

#[async_trait]
impl<P: Purifier> Purifier for Arc<P> {
    async fn purify(&self, text: &str) -> Result<String, BridgeError> {
        P::purify(self.as_ref(), text).await
    }
}

/// Memoizing text sanitizer.
///
/// Each distinct input goes through the worker's `purify` call and a local
/// banned-word scrub exactly once; the result is kept in a [`SanitizeStore`]
/// and served from there afterwards, across restarts.
pub struct Sanitizer<P> {
    remote: P,
    words: BannedWords,
    store: SanitizeStore,
}

impl<P: Purifier> Sanitizer<P> {
    pub const fn new(remote: P, words: BannedWords, store: SanitizeStore) -> Self {
        Self {
            remote,
            words,
            store,
        }
    }

    pub const fn remote(&self) -> &P {
        &self.remote
    }

    pub const fn banned_words(&self) -> &BannedWords {
        &self.words
    }

    /// Sanitized form of `text`.
    ///
    /// A store failure only costs the memoization and is logged; the
    /// computed result is still returned.
    ///
    /// # Errors
    ///
    /// Returns the worker's `BridgeError` on a cache miss whose `purify` call
    /// fails. Nothing is cached in that case.
    pub async fn sanitize(&self, text: &str) -> Result<String, BridgeError> {
        match self.store.lookup(text).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(error) => warn!(%error, "sanitize cache lookup failed"),
        }

        let purified = self.remote.purify(text).await?;
        let result = self.words.scrub(&purified);

        match self.store.insert(text, &result).await {
            Ok(true) => debug!(len = text.len(), "sanitize cache entry stored"),
            Ok(false) => debug!(len = text.len(), "sanitize cache entry already present"),
            Err(error) => warn!(%error, "sanitize cache insert failed"),
        }

        Ok(result)
    }

    /// # Errors
    ///
    /// Returns `SanitizeError::LibSql` if the store query fails.
    pub async fn stats(&self) -> Result<CacheStats, SanitizeError> {
        self.store.stats().await
    }

    /// Drop every memoized entry. Returns the number removed.
    ///
    /// # Errors
    ///
    /// Returns `SanitizeError::LibSql` if the delete fails.
    pub async fn clear(&self) -> Result<u64, SanitizeError> {
        self.store.clear().await
    }
}

#[async_trait]
impl<P: Purifier> TextEnricher for Sanitizer<P> {
    async fn enrich(&self, text: &str) -> Result<String, EnrichError> {
        self.sanitize(text).await.map_err(EnrichError::new)
    }
}
