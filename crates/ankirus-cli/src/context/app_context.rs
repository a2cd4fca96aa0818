use std::sync::Arc;

use ankirus_bridge::{BridgeError, WorkerBridge};
use ankirus_config::AnkirusConfig;
use ankirus_sanitize::{BannedWords, SanitizeStore, Sanitizer};
use anyhow::Context;

/// Shared application resources initialized once at startup.
///
/// The worker is not spawned here; the bridge starts it on the first call.
pub struct AppContext {
    pub config: AnkirusConfig,
    pub bridge: Arc<WorkerBridge>,
}

impl AppContext {
    pub fn init(config: AnkirusConfig) -> Self {
        let bridge = Arc::new(WorkerBridge::from_config(&config.worker));
        Self { config, bridge }
    }

    /// Open the sanitize cache without loading the word list or touching the worker.
    pub async fn sanitize_store(&self) -> anyhow::Result<SanitizeStore> {
        let path = self.config.sanitizer.cache_db_path();
        SanitizeStore::open(&path.to_string_lossy())
            .await
            .with_context(|| format!("failed to open sanitize cache at {}", path.display()))
    }

    /// Full sanitizer over the shared bridge. Requires a configured word list.
    pub async fn sanitizer(&self) -> anyhow::Result<Sanitizer<Arc<WorkerBridge>>> {
        let settings = self.config.require_sanitizer()?;
        let words = BannedWords::load(&settings.banned_words_path())?;
        tracing::debug!(words = words.len(), "loaded banned word list");
        let store = self.sanitize_store().await?;
        Ok(Sanitizer::new(Arc::clone(&self.bridge), words, store))
    }

    /// The enricher card text is served through, or `None` when
    /// `sanitizer.enabled` is off.
    pub async fn enricher(&self) -> anyhow::Result<Option<Sanitizer<Arc<WorkerBridge>>>> {
        if !self.config.sanitizer.enabled {
            tracing::debug!("sanitizer disabled, serving text as extracted");
            return Ok(None);
        }
        self.sanitizer().await.map(Some)
    }

    /// Stop the worker if it was started.
    pub async fn shutdown(&self) -> Result<(), BridgeError> {
        self.bridge.close().await
    }
}
