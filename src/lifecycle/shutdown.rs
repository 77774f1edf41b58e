//! Graceful shutdown of the demo server.
//!
//! [`HttpServer::run`](crate::HttpServer::run) holds a receiver and stops
//! accepting connections once it fires. Requests already inside the patch
//! layer still finish and get their headers patched.

use tokio::sync::broadcast;

/// Broadcasts a single stop signal to every running server.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a coordinator with no servers attached yet.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Attach a server. The receiver resolves once shutdown is triggered.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Signal every attached server and return how many were reached.
    ///
    /// Returns 0 when every server has already stopped.
    pub fn trigger(&self) -> usize {
        let reached = self.tx.send(()).unwrap_or(0);
        tracing::debug!(servers = reached, "Shutdown triggered");
        reached
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Wait for Ctrl+C, then trigger.
    ///
    /// If the signal handler cannot be installed the servers are stopped
    /// straight away.
    pub async fn trigger_on_ctrl_c(&self) -> usize {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Ctrl+C received"),
            Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl+C, shutting down"),
        }
        self.trigger()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
