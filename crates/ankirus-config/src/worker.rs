//! Worker process configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_program() -> String {
    String::from("node")
}

fn default_args() -> Vec<String> {
    vec![String::from("ankirus_nodejs")]
}

/// Default bound on a single worker call, in seconds.
const fn default_call_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkerConfig {
    /// Executable of the worker process.
    #[serde(default = "default_program")]
    pub program: String,

    /// Arguments passed to `program`.
    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// How long a caller waits for a reply before giving up.
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
            call_timeout_secs: default_call_timeout_secs(),
        }
    }
}

impl WorkerConfig {
    pub const fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}
