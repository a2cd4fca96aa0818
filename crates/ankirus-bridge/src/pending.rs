//! Table of calls awaiting a reply.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;

use crate::protocol::Outcome;

/// Result slots keyed by correlation id.
///
/// Callers insert, the reply reader resolves, and shutdown drains. Each slot is
/// removed exactly once, by whichever of those gets there first.
#[derive(Debug, Default)]
pub(crate) struct PendingCalls {
    slots: Mutex<HashMap<u64, oneshot::Sender<Outcome>>>,
}

impl PendingCalls {
    fn slots(&self) -> MutexGuard<'_, HashMap<u64, oneshot::Sender<Outcome>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `id` and return the receiving half of its slot.
    pub fn register(&self, id: u64) -> oneshot::Receiver<Outcome> {
        let (tx, rx) = oneshot::channel();
        self.slots().insert(id, tx);
        rx
    }

    /// Fill and drop the slot for `id`. Returns `false` for unknown ids.
    pub fn resolve(&self, id: u64, outcome: Outcome) -> bool {
        let Some(slot) = self.slots().remove(&id) else {
            return false;
        };
        // The caller may have timed out between lookup and send.
        let _ = slot.send(outcome);
        true
    }

    /// Drop the slot for `id` without filling it.
    pub fn remove(&self, id: u64) -> bool {
        self.slots().remove(&id).is_some()
    }

    /// Fail every registered call with `message` and clear the table.
    pub fn fail_all(&self, message: &str) -> usize {
        let drained: Vec<_> = self.slots().drain().collect();
        let count = drained.len();
        for (_, slot) in drained {
            let _ = slot.send(Err(message.to_string()));
        }
        count
    }

    pub fn len(&self) -> usize {
        self.slots().len()
    }
}
