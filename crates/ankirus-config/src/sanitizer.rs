//! Sensitive-word sanitizer configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const fn default_enabled() -> bool {
    true
}

fn default_cache_db() -> String {
    String::from("sanitize-cache.db")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SanitizerConfig {
    /// Whether card text is sanitized before it is served.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Path of the banned word list, one entry per line.
    #[serde(default)]
    pub banned_words: String,

    /// Path of the libSQL memoization cache.
    #[serde(default = "default_cache_db")]
    pub cache_db: String,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            banned_words: String::new(),
            cache_db: default_cache_db(),
        }
    }
}

impl SanitizerConfig {
    /// Enabled and pointing at a word list.
    pub fn is_configured(&self) -> bool {
        self.enabled && !self.banned_words.is_empty()
    }

    pub fn banned_words_path(&self) -> PathBuf {
        PathBuf::from(&self.banned_words)
    }

    pub fn cache_db_path(&self) -> PathBuf {
        PathBuf::from(&self.cache_db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enabled_without_word_list_is_not_configured() {
        let config = SanitizerConfig::default();
        assert!(config.enabled);
        assert!(!config.is_configured());
    }

    #[test]
    fn disabled_is_never_configured() {
        let config = SanitizerConfig {
            enabled: false,
            banned_words: "banned.txt".into(),
            ..SanitizerConfig::default()
        };
        assert!(!config.is_configured());
    }
}
