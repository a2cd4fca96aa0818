//! Worker bridge error types.

use std::time::Duration;

use thiserror::Error;

/// Message carried by calls that were pending when the bridge closed.
pub const BRIDGE_CLOSED: &str = "bridge closed";

/// Message carried by calls that were pending when the worker's output ended.
pub const WORKER_EXITED: &str = "worker exited";

/// Errors from worker calls.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The worker replied with an error, or the call was abandoned on shutdown.
    #[error("Worker error: {0}")]
    Remote(String),

    /// No reply arrived within the configured bound.
    #[error("Worker call {id} ('{method}') timed out after {timeout:?}")]
    Timeout {
        id: u64,
        method: String,
        timeout: Duration,
    },

    /// The worker process could not be started.
    #[error("Failed to spawn worker '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing to the worker failed.
    #[error("Worker I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The request could not be serialized.
    #[error("Failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),

    /// The reply's result did not have the expected shape.
    #[error("Unexpected result from '{method}': {source}")]
    UnexpectedResult {
        method: String,
        #[source]
        source: serde_json::Error,
    },
}

impl BridgeError {
    pub(crate) fn closed() -> Self {
        Self::Remote(BRIDGE_CLOSED.to_string())
    }

    /// Whether the call failed because the bridge shut down.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Remote(message) if message == BRIDGE_CLOSED)
    }
}
