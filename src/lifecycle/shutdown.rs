//! Shutdown coordination for the controller.

use tokio::sync::broadcast;

/// Receiving half handed to the monitor loop. Yields the shutdown reason.
pub type ShutdownReceiver = broadcast::Receiver<&'static str>;

/// Broadcasts a single shutdown request, with the reason, to every subscriber.
pub struct Shutdown {
    tx: broadcast::Sender<&'static str>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> ShutdownReceiver {
        self.tx.subscribe()
    }

    /// Ask every subscriber to stop. A no-op when nobody listens anymore.
    pub fn trigger(&self, reason: &'static str) {
        if self.tx.send(reason).is_err() {
            tracing::debug!(reason, "Shutdown requested with no running tasks");
        }
    }

    /// Tasks that have not dropped their receiver yet.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
