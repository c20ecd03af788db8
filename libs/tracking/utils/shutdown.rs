//! Graceful shutdown for long-running commands

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;
use tracing::info;

/// Shared running flag plus a signal that wakes anyone waiting on shutdown
#[derive(Clone)]
pub struct ShutdownManager {
    flag: Arc<AtomicBool>,
    stopped: watch::Sender<bool>,
}

impl ShutdownManager {
    pub fn new() -> Self {
        let (stopped, _) = watch::channel(false);
        Self {
            flag: Arc::new(AtomicBool::new(true)),
            stopped,
        }
    }

    /// Trigger shutdown on Ctrl+C
    pub fn spawn_signal_handler(&self) {
        let manager = self.clone();
        tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                info!("Received shutdown signal (Ctrl+C)");
                manager.trigger();
            }
        });
    }

    pub fn trigger(&self) {
        self.flag.store(false, Ordering::Release);
        self.stopped.send_replace(true);
    }

    pub fn is_running(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Running flag for background tasks
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Resolve once shutdown has been triggered
    pub async fn wait(&self) {
        let mut stopped = self.stopped.subscribe();
        // Sender is owned by self, so the channel cannot close here
        let _ = stopped.wait_for(|stopped| *stopped).await;
    }
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}
