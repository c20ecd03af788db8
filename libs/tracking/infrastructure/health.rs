//! Backend health monitor
//!
//! Probes `GET /health`, measures round-trip latency and publishes the result
//! on a watch channel. Overlapping checks are skipped rather than queued.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use swifttrack_client::RestClient;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Last known backend reachability
#[derive(Debug, Clone, PartialEq)]
pub struct BackendHealth {
    /// `None` until the first check completes
    pub ok: Option<bool>,
    pub message: String,
    pub last_check: Option<DateTime<Utc>>,
    pub service: Option<String>,
    pub error: Option<String>,
}

impl Default for BackendHealth {
    fn default() -> Self {
        Self {
            ok: None,
            message: "Checking...".to_string(),
            last_check: None,
            service: None,
            error: None,
        }
    }
}

impl BackendHealth {
    fn connected(service: String, latency: Duration) -> Self {
        Self {
            ok: Some(true),
            message: format!("Connected • {}ms", latency.as_millis()),
            last_check: Some(Utc::now()),
            service: Some(service),
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            ok: Some(false),
            message: "Connection failed".to_string(),
            last_check: Some(Utc::now()),
            service: None,
            error: Some(error),
        }
    }

    pub fn status_class(&self) -> &'static str {
        match self.ok {
            None => "status-info",
            Some(true) => "status-success",
            Some(false) => "status-danger",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self.ok {
            None => "⏳",
            Some(true) => "✅",
            Some(false) => "❌",
        }
    }
}

/// Releases the in-progress flag even if the check is dropped mid-request
struct CheckingGuard<'a>(&'a AtomicBool);

impl Drop for CheckingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct BackendMonitor {
    client: RestClient,
    checking: AtomicBool,
    health_tx: watch::Sender<BackendHealth>,
}

impl BackendMonitor {
    pub fn new(client: RestClient) -> Self {
        let (health_tx, _) = watch::channel(BackendHealth::default());
        Self {
            client,
            checking: AtomicBool::new(false),
            health_tx,
        }
    }

    pub fn status(&self) -> BackendHealth {
        self.health_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<BackendHealth> {
        self.health_tx.subscribe()
    }

    /// Run one health check
    ///
    /// Returns `None` without touching the network if a check is already running.
    pub async fn check(&self) -> Option<BackendHealth> {
        if self
            .checking
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Health check already running, skipping");
            return None;
        }

        let _checking = CheckingGuard(&self.checking);

        let started = Instant::now();
        let health = match self.client.health().await {
            Ok(response) => {
                let health = BackendHealth::connected(response.service, started.elapsed());
                debug!("Backend healthy: {}", health.message);
                health
            }
            Err(e) => {
                warn!("Backend health check failed: {}", e);
                BackendHealth::failed(e.to_string())
            }
        };

        self.health_tx.send_replace(health.clone());
        Some(health)
    }

    /// Check now and then every `interval` until `running` goes false
    pub fn spawn(self: Arc<Self>, interval: Duration, running: Arc<AtomicBool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            info!("Backend health monitor started ({:?} interval)", interval);

            loop {
                ticker.tick().await;
                if !running.load(Ordering::Acquire) {
                    break;
                }
                self.check().await;
            }

            debug!("Backend health monitor stopped");
        })
    }
}
