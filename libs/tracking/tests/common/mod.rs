//! Shared test fixtures

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use swifttrack_client::{ClientError, OrderStatusSnapshot};
use tracking::OrderStatusSource;

#[derive(Default)]
struct FakeState {
    statuses: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    last_updated: HashMap<String, DateTime<Utc>>,
    failing: bool,
    calls: Vec<String>,
}

/// Scripted order status backend
///
/// Known ids answer with their configured status and a `lastUpdated` that
/// advances one second per call unless pinned; unknown ids answer NotFound.
#[derive(Clone, Default)]
pub struct FakeSource {
    state: Arc<Mutex<FakeState>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(self, order_id: &str, status: &str) -> Self {
        self.set_status(order_id, status);
        self
    }

    pub fn set_status(&self, order_id: &str, status: &str) {
        self.state
            .lock()
            .statuses
            .insert(order_id.to_string(), status.to_string());
    }

    pub fn set_delay(&self, order_id: &str, delay: Duration) {
        self.state.lock().delays.insert(order_id.to_string(), delay);
    }

    /// Answer `order_id` with a fixed `lastUpdated`
    pub fn set_last_updated(&self, order_id: &str, at: DateTime<Utc>) {
        self.state.lock().last_updated.insert(order_id.to_string(), at);
    }

    /// Every request fails with a 503
    pub fn set_failing(&self, failing: bool) {
        self.state.lock().failing = failing;
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
}

#[async_trait]
impl OrderStatusSource for FakeSource {
    async fn fetch_status(&self, order_id: &str) -> Result<OrderStatusSnapshot, ClientError> {
        let (delay, call_index) = {
            let mut state = self.state.lock();
            state.calls.push(order_id.to_string());
            (state.delays.get(order_id).copied(), state.calls.len() as i64)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.state.lock();
        if state.failing {
            return Err(ClientError::Http {
                status: 503,
                message: "backend unavailable".to_string(),
            });
        }

        let status = state
            .statuses
            .get(order_id)
            .ok_or_else(|| ClientError::NotFound(order_id.to_string()))?;

        let last_updated = state
            .last_updated
            .get(order_id)
            .copied()
            .unwrap_or_else(|| base_time() + ChronoDuration::seconds(call_index));

        Ok(OrderStatusSnapshot {
            order_id: order_id.to_string(),
            status: status.clone(),
            received_at: base_time(),
            last_updated,
            error: None,
        })
    }
}
