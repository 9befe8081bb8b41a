//! One-shot readiness signal shared between the UI thread and the worker.
//!
//! The state starts `Pending` and moves exactly once, to either `Fulfilled`
//! (the worker logged in) or `Cancelled` (stop was requested first). Later
//! transition attempts are rejected, so whichever side gets there first wins.

use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Pending,
    Fulfilled,
    Cancelled,
}

/// Cloneable handle; all clones observe the same state.
#[derive(Debug, Clone)]
pub struct ReadySignal {
    tx: Arc<watch::Sender<ReadyState>>,
}

impl Default for ReadySignal {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadySignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ReadyState::Pending);
        Self { tx: Arc::new(tx) }
    }

    pub fn state(&self) -> ReadyState {
        *self.tx.borrow()
    }

    /// `Pending -> Fulfilled`. Returns false if the signal already resolved.
    pub fn fulfill(&self) -> bool {
        self.resolve(ReadyState::Fulfilled)
    }

    /// `Pending -> Cancelled`. Returns false if the signal already resolved.
    pub fn cancel(&self) -> bool {
        self.resolve(ReadyState::Cancelled)
    }

    fn resolve(&self, to: ReadyState) -> bool {
        self.tx.send_if_modified(|state| {
            if *state == ReadyState::Pending {
                *state = to;
                true
            } else {
                false
            }
        })
    }

    /// Suspend until the signal leaves `Pending`.
    pub async fn resolved(&self) -> ReadyState {
        let mut rx = self.tx.subscribe();
        let state = match rx.wait_for(|state| *state != ReadyState::Pending).await {
            Ok(state) => *state,
            // unreachable while `self` holds the sender
            Err(_) => ReadyState::Cancelled,
        };
        state
    }
}
