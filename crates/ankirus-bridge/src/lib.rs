//! # ankirus-bridge
//!
//! Request/reply bridge to the ankirus worker process (HTML purification and
//! `MathJax` rendering live there).
//!
//! The worker speaks newline-delimited JSON on stdin/stdout. Every request
//! carries a correlation id; replies may come back in any order and are routed
//! to the caller that issued the matching id. Unknown ids are dropped.
//!
//! ```no_run
//! # async fn demo() -> Result<(), ankirus_bridge::BridgeError> {
//! use std::time::Duration;
//! use ankirus_bridge::{WorkerBridge, WorkerCommand};
//!
//! let bridge = WorkerBridge::new(
//!     WorkerCommand::new("node", ["ankirus_nodejs"]),
//!     Duration::from_secs(30),
//! );
//! let clean = bridge.purify("<img src=x onerror=alert(1)>").await?;
//! bridge.close().await?;
//! # Ok(())
//! # }
//! ```

mod bridge;
pub mod error;
mod pending;
mod protocol;

pub use bridge::{BridgeState, WorkerBridge, WorkerCommand};
pub use error::{BRIDGE_CLOSED, BridgeError, WORKER_EXITED};
