//! Source collection configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_collection() -> String {
    String::from("collection.anki2")
}

fn default_tmp_db() -> String {
    String::from("tmp-collection.anki2")
}

/// Default maximum snapshot age, in seconds.
const fn default_cache_ttl_secs() -> u64 {
    300
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Anki profile directory holding the live collection.
    #[serde(default)]
    pub profile_dir: String,

    /// Collection file name inside `profile_dir`.
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Path prefix of the private copy; the side-file copy appends `-wal`.
    #[serde(default = "default_tmp_db")]
    pub tmp_db: String,

    /// Maximum age of a cached snapshot before it is refreshed regardless of mtimes.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            profile_dir: String::new(),
            collection: default_collection(),
            tmp_db: default_tmp_db(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl SourceConfig {
    /// Check if the profile directory is set.
    pub fn is_configured(&self) -> bool {
        !self.profile_dir.is_empty()
    }

    /// Full path of the live collection file.
    pub fn collection_path(&self) -> PathBuf {
        PathBuf::from(&self.profile_dir).join(&self.collection)
    }

    pub fn tmp_path(&self) -> PathBuf {
        PathBuf::from(&self.tmp_db)
    }

    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
