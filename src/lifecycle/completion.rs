//! One-shot completion signal for the shutdown sequence.

use std::time::Duration;

use tokio::sync::watch;

/// How a drain ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Every in-flight request finished within the timeout.
    Drained { elapsed: Duration },
    /// The timeout elapsed; remaining connections were closed forcibly.
    TimedOut { timeout: Duration, in_flight: usize },
    /// The listener failed while draining; `serve` reports the error.
    Failed { elapsed: Duration },
}

impl ShutdownOutcome {
    pub fn is_drained(&self) -> bool {
        matches!(self, ShutdownOutcome::Drained { .. })
    }
}

/// Set-once, multi-waiter broadcast of the shutdown outcome.
///
/// The first `fire` wins; later calls are ignored and wake nobody. Waiters
/// that arrive after the signal fired return immediately.
#[derive(Debug)]
pub struct Completion {
    tx: watch::Sender<Option<ShutdownOutcome>>,
}

impl Completion {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    /// Publish the outcome. Returns `false` if it was already published.
    pub fn fire(&self, outcome: ShutdownOutcome) -> bool {
        self.tx.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(outcome);
            true
        })
    }

    /// The published outcome, if any.
    pub fn outcome(&self) -> Option<ShutdownOutcome> {
        *self.tx.borrow()
    }

    pub fn is_fired(&self) -> bool {
        self.outcome().is_some()
    }

    /// Wait until the outcome is published.
    pub async fn wait(&self) -> ShutdownOutcome {
        let mut rx = self.tx.subscribe();
        loop {
            if let Some(outcome) = *rx.borrow_and_update() {
                return outcome;
            }
            // The sender lives as long as `self`, so this only fails if the
            // runtime tears the task down.
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Default for Completion {
    fn default() -> Self {
        Self::new()
    }
}
