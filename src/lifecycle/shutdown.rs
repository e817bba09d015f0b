//! Shutdown coordination.
//!
//! The trigger is latched: a task that subscribes after shutdown began still
//! sees it, so a server spawned late in startup cannot miss the stop.

use tokio::sync::watch;

/// Why the process is stopping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// SIGINT / SIGTERM.
    Signal,
    /// Requested from code (tests, embedding).
    Requested,
}

/// Owner side of the shutdown latch. Dropping it also releases every signal.
#[derive(Debug)]
pub struct Shutdown {
    tx: watch::Sender<Option<ShutdownReason>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Start shutting down. Only the first reason is kept.
    pub fn trigger(&self, reason: ShutdownReason) {
        let first = self.tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(reason);
            true
        });
        if first {
            tracing::info!(reason = ?reason, listeners = self.tx.receiver_count(), "Shutdown triggered");
        }
    }

    pub fn reason(&self) -> Option<ShutdownReason> {
        *self.tx.borrow()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Listener side, handed to long-running tasks.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<Option<ShutdownReason>>,
}

impl ShutdownSignal {
    /// Resolves once shutdown is triggered, or when the owner is dropped.
    pub async fn triggered(mut self) -> Option<ShutdownReason> {
        let reason = self.rx.wait_for(Option::is_some).await.map(|r| *r);
        reason.ok().flatten()
    }
}
