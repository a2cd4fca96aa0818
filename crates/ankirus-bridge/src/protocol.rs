//! Wire format of the worker protocol.
//!
//! One JSON object per line in each direction:
//!
//! ```text
//! -> {"id":1,"name":"purify","args":"<b>hi</b>"}
//! <- {"id":1,"result":"<b>hi</b>"}
//! <- {"id":2,"error":"input is not a string"}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub(crate) struct Request<'a> {
    pub id: u64,
    pub name: &'a str,
    pub args: &'a Value,
}

impl Request<'_> {
    /// Serialize as a single newline-terminated line.
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

/// Outcome of one call as reported by the worker. `Err` holds its message.
pub(crate) type Outcome = Result<Value, String>;

#[derive(Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub(crate) enum Reply {
    Success { id: u64, result: Value },
    Failure { id: u64, error: String },
}

impl Reply {
    pub const fn id(&self) -> u64 {
        match self {
            Self::Success { id, .. } | Self::Failure { id, .. } => *id,
        }
    }

    pub fn into_outcome(self) -> Outcome {
        match self {
            Self::Success { result, .. } => Ok(result),
            Self::Failure { error, .. } => Err(error),
        }
    }
}
