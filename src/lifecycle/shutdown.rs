//! Shutdown coordination for the driver.

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// The protocol shutdown command and OS signals both feed this; the serve
/// loop waits on it to stop accepting and drain in-flight requests.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal. Safe to call more than once.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Complete when shutdown has been triggered.
    pub async fn wait(&self) {
        let mut rx = self.subscribe();
        // RecvError::Closed also means the coordinator is going away.
        let _ = rx.recv().await;
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn trigger_wakes_waiters() {
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();
        shutdown.trigger();
        rx.recv().await.unwrap();
    }

    #[tokio::test]
    async fn wait_completes_after_trigger() {
        let shutdown = std::sync::Arc::new(Shutdown::new());
        let waiter = {
            let shutdown = shutdown.clone();
            tokio::spawn(async move { shutdown.wait().await })
        };
        shutdown.trigger();
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn repeated_trigger_is_harmless() {
        let shutdown = Shutdown::new();
        shutdown.trigger();
        shutdown.trigger();
    }
}
