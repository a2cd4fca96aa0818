//! # ankirus-config
//!
//! Layered configuration loading for ankirus using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`ANKIRUS_*` prefix, `__` as separator)
//! 2. An explicit file passed by the caller (`--config`)
//! 3. Project-level `./ankirus.toml`
//! 4. User-level `~/.config/ankirus/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `ANKIRUS_SOURCE__PROFILE_DIR` -> `source.profile_dir`,
//! `ANKIRUS_WORKER__CALL_TIMEOUT_SECS` -> `worker.call_timeout_secs`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use ankirus_config::AnkirusConfig;
//!
//! let config = AnkirusConfig::load_with_dotenv(None).expect("config");
//! if config.source.is_configured() {
//!     println!("collection: {}", config.source.collection_path().display());
//! }
//! ```

mod error;
mod sanitizer;
mod source;
mod worker;

pub use error::ConfigError;
pub use sanitizer::SanitizerConfig;
pub use source::SourceConfig;
pub use worker::WorkerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnkirusConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub worker: WorkerConfig,
    #[serde(default)]
    pub sanitizer: SanitizerConfig,
}

impl AnkirusConfig {
    /// Load configuration from all sources and validate it.
    ///
    /// `explicit` is an extra TOML file layered above the project file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::FileNotFound` when `explicit` does not exist,
    /// `ConfigError::Figment` when a source cannot be parsed, or
    /// `ConfigError::InvalidValue` when validation fails.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit
            && !path.exists()
        {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        let config: Self = Self::figment(explicit).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`AnkirusConfig::load`].
    pub fn load_with_dotenv(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load(explicit)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect it or layer providers on top.
    pub fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from("ankirus.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed("ANKIRUS_").split("__"))
    }

    /// Reject values no component can run with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker.program.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "worker.program".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.worker.call_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "worker.call_timeout_secs".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` when `source.profile_dir` is empty.
    pub fn require_source(&self) -> Result<&SourceConfig, ConfigError> {
        if self.source.is_configured() {
            Ok(&self.source)
        } else {
            Err(ConfigError::NotConfigured {
                section: "source".into(),
            })
        }
    }

    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` when the sanitizer is disabled or
    /// has no word list.
    pub fn require_sanitizer(&self) -> Result<&SanitizerConfig, ConfigError> {
        if self.sanitizer.is_configured() {
            Ok(&self.sanitizer)
        } else {
            Err(ConfigError::NotConfigured {
                section: "sanitizer".into(),
            })
        }
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ankirus").join("config.toml"))
    }
}
