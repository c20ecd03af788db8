//! Tracking controller
//!
//! Owns everything the tracking view renders: the current snapshot, the last
//! error, the loading and polling flags and the recent-searches ledger. The
//! UI reads it through [`TrackingController::view`] or a watch subscription;
//! only the controller writes it.
//!
//! # Request fencing
//!
//! Every fetch, whether user-triggered or from a poll tick, takes the next
//! request id. A response is applied only if no newer request was issued in
//! the meantime, and a poll response only if its ticket is still current.
//! Poll ticks that come due while a user lookup is loading are skipped, so
//! only another lookup can supersede a lookup. Stopping polling or switching
//! orders never aborts a request in flight; its result is simply dropped when
//! it lands.

use super::scheduler::{PollScheduler, PollTicket, DEFAULT_POLL_INTERVAL};
use super::source::OrderStatusSource;
use crate::domain::{map_status, HistoryEntry, HistoryLedger, StatusDisplay, Timeline, MAX_HISTORY_ENTRIES};
use crate::infrastructure::config::TrackingSettings;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use swifttrack_client::{ClientError, OrderStatusSnapshot};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Polling flags as shown to the UI
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollState {
    pub subject_order_id: String,
    pub enabled: bool,
    pub in_flight: bool,
}

/// Coarse lifecycle of the tracking view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingPhase {
    Idle,
    Loading,
    Success,
    Failed,
}

/// Everything the tracking view renders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackingView {
    pub snapshot: Option<OrderStatusSnapshot>,
    pub display: Option<StatusDisplay>,
    pub timeline: Option<Timeline>,
    pub error: Option<String>,
    pub loading: bool,
    pub poll: PollState,
    /// Recent searches, oldest first
    pub history: Vec<HistoryEntry>,
    pub last_refreshed: Option<DateTime<Utc>>,
}

impl TrackingView {
    pub fn phase(&self) -> TrackingPhase {
        if self.loading {
            TrackingPhase::Loading
        } else if self.error.is_some() {
            TrackingPhase::Failed
        } else if self.snapshot.is_some() {
            TrackingPhase::Success
        } else {
            TrackingPhase::Idle
        }
    }
}

/// What happened to a lookup
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// Empty order id, nothing was fetched
    Skipped,
    /// A user lookup was already loading
    Busy,
    Updated(OrderStatusSnapshot),
    Failed(String),
    /// A newer request superseded this one, or the snapshot was older than the one held
    Stale,
}

struct TrackingState {
    subject: String,
    snapshot: Option<OrderStatusSnapshot>,
    error: Option<String>,
    loading: bool,
    polling: bool,
    /// Generation of the poll tick currently fetching
    in_flight: Option<u64>,
    history: HistoryLedger,
    latest_request: u64,
    last_refreshed: Option<DateTime<Utc>>,
}

impl TrackingState {
    fn new(history_limit: usize) -> Self {
        Self {
            subject: String::new(),
            snapshot: None,
            error: None,
            loading: false,
            polling: false,
            in_flight: None,
            history: HistoryLedger::with_capacity(history_limit),
            latest_request: 0,
            last_refreshed: None,
        }
    }

    fn begin_request(&mut self) -> u64 {
        self.latest_request += 1;
        self.latest_request
    }

    fn is_latest(&self, request: u64) -> bool {
        request == self.latest_request
    }

    /// Apply a successful fetch; false if it is older than what we hold
    fn apply_snapshot(&mut self, snapshot: OrderStatusSnapshot) -> bool {
        if let Some(current) = &self.snapshot {
            if current.order_id == snapshot.order_id && snapshot.last_updated < current.last_updated {
                debug!(
                    "Ignoring out-of-order snapshot for {} ({} < {})",
                    snapshot.order_id, snapshot.last_updated, current.last_updated
                );
                return false;
            }
        }

        let now = Utc::now();
        if self.history.record(HistoryEntry::new(snapshot.clone(), now)) {
            debug!("Recorded {} in search history", snapshot.order_id);
        }

        self.snapshot = Some(snapshot);
        self.error = None;
        self.last_refreshed = Some(now);
        true
    }

    fn apply_failure(&mut self, message: String) {
        self.snapshot = None;
        self.error = Some(message);
    }

    fn view(&self) -> TrackingView {
        TrackingView {
            display: self.snapshot.as_ref().map(|s| map_status(&s.status)),
            timeline: self.snapshot.as_ref().map(|s| Timeline::derive(&s.status)),
            snapshot: self.snapshot.clone(),
            error: self.error.clone(),
            loading: self.loading,
            poll: PollState {
                subject_order_id: self.subject.clone(),
                enabled: self.polling,
                in_flight: self.in_flight.is_some(),
            },
            history: self.history.list(),
            last_refreshed: self.last_refreshed,
        }
    }
}

struct Inner<S> {
    source: S,
    state: Mutex<TrackingState>,
    view_tx: watch::Sender<TrackingView>,
}

impl<S: OrderStatusSource> Inner<S> {
    /// Mutate state and publish the new view
    fn update<R>(&self, f: impl FnOnce(&mut TrackingState) -> R) -> R {
        let mut state = self.state.lock();
        let result = f(&mut state);
        self.view_tx.send_replace(state.view());
        result
    }

    /// One silent background refresh
    async fn poll_once(&self, ticket: PollTicket) -> Result<(), ClientError> {
        let request = self.update(|state| {
            if !ticket.is_current() {
                return None;
            }
            if state.loading {
                debug!("Skipping poll tick for {}, a lookup is loading", ticket.subject());
                return None;
            }
            state.in_flight = Some(ticket.generation());
            Some(state.begin_request())
        });
        let Some(request) = request else {
            return Ok(());
        };

        let result = self.source.fetch_status(ticket.subject()).await;

        self.update(|state| {
            if state.in_flight == Some(ticket.generation()) {
                state.in_flight = None;
            }

            if !ticket.is_current() || !state.is_latest(request) {
                debug!(
                    "Discarding poll result for {} (generation {}, request {})",
                    ticket.subject(),
                    ticket.generation(),
                    request
                );
                return Ok(());
            }

            match result {
                Ok(snapshot) => {
                    state.apply_snapshot(snapshot);
                    Ok(())
                }
                Err(e) => {
                    state.apply_failure(e.to_string());
                    Err(e)
                }
            }
        })
    }
}

/// Clears the loading flag however the lookup exits
struct LoadingGuard<'a, S: OrderStatusSource> {
    inner: &'a Inner<S>,
}

impl<S: OrderStatusSource> Drop for LoadingGuard<'_, S> {
    fn drop(&mut self) {
        self.inner.update(|state| state.loading = false);
    }
}

/// Orchestrates lookups, polling and history for the tracking view
pub struct TrackingController<S: OrderStatusSource> {
    inner: Arc<Inner<S>>,
    scheduler: Arc<Mutex<PollScheduler>>,
}

impl<S: OrderStatusSource> Clone for TrackingController<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            scheduler: Arc::clone(&self.scheduler),
        }
    }
}

impl<S: OrderStatusSource> TrackingController<S> {
    /// Controller with the default 5s poll interval and 5-entry history
    pub fn new(source: S) -> Self {
        Self::with_options(source, DEFAULT_POLL_INTERVAL, MAX_HISTORY_ENTRIES)
    }

    pub fn with_settings(source: S, settings: &TrackingSettings) -> Self {
        Self::with_options(source, settings.poll_interval(), settings.history_limit)
    }

    pub fn with_options(source: S, poll_interval: Duration, history_limit: usize) -> Self {
        let state = TrackingState::new(history_limit);
        let (view_tx, _) = watch::channel(state.view());

        Self {
            inner: Arc::new(Inner {
                source,
                state: Mutex::new(state),
                view_tx,
            }),
            scheduler: Arc::new(Mutex::new(PollScheduler::new(poll_interval))),
        }
    }

    /// Current view state
    pub fn view(&self) -> TrackingView {
        self.inner.view_tx.borrow().clone()
    }

    /// Receive every view change
    pub fn subscribe(&self) -> watch::Receiver<TrackingView> {
        self.inner.view_tx.subscribe()
    }

    /// User-triggered fetch of an order's status
    pub async fn lookup(&self, order_id: &str) -> LookupOutcome {
        let order_id = order_id.trim();
        if order_id.is_empty() {
            debug!("Ignoring lookup with empty order id");
            return LookupOutcome::Skipped;
        }

        let request = self.inner.update(|state| {
            if state.loading {
                return None;
            }
            state.loading = true;
            state.error = None;
            Some(state.begin_request())
        });
        let Some(request) = request else {
            debug!("Lookup for {} ignored, another lookup is loading", order_id);
            return LookupOutcome::Busy;
        };

        let _loading = LoadingGuard { inner: &self.inner };

        info!("Looking up order {}", order_id);
        let result = self.inner.source.fetch_status(order_id).await;

        self.inner.update(|state| {
            if !state.is_latest(request) {
                debug!("Discarding stale lookup result for {} (request {})", order_id, request);
                return LookupOutcome::Stale;
            }

            match result {
                Ok(snapshot) => {
                    if state.apply_snapshot(snapshot.clone()) {
                        LookupOutcome::Updated(snapshot)
                    } else {
                        LookupOutcome::Stale
                    }
                }
                Err(e) => {
                    warn!("Lookup for {} failed: {}", order_id, e);
                    let message = e.to_string();
                    state.apply_failure(message.clone());
                    LookupOutcome::Failed(message)
                }
            }
        })
    }

    /// Turn live tracking on or off
    ///
    /// Enabling needs a non-empty order id and is otherwise ignored.
    pub fn set_polling(&self, enabled: bool, order_id: &str) {
        if !enabled {
            self.scheduler.lock().stop();
            self.inner.update(|state| {
                state.polling = false;
                state.in_flight = None;
            });
            return;
        }

        let order_id = order_id.trim();
        if order_id.is_empty() {
            debug!("Ignoring polling request without an order id");
            return;
        }

        self.inner.update(|state| {
            state.polling = true;
            state.subject = order_id.to_string();
        });

        let mut scheduler = self.scheduler.lock();
        if scheduler.is_running() && scheduler.subject() == order_id {
            return;
        }

        let inner = Arc::clone(&self.inner);
        scheduler.start(order_id, move |ticket| {
            let inner = Arc::clone(&inner);
            async move { inner.poll_once(ticket).await }
        });
    }

    /// Change the tracked order id
    ///
    /// While polling, the cycle restarts against the new id; an empty id
    /// pauses it.
    pub fn set_subject(&self, order_id: &str) {
        let order_id = order_id.trim();
        self.inner.update(|state| state.subject = order_id.to_string());
        self.scheduler.lock().set_subject(order_id);
    }

    /// Re-track an order picked from the history
    pub async fn quick_track(&self, order_id: &str) -> LookupOutcome {
        self.set_subject(order_id);
        self.lookup(order_id).await
    }

    pub fn clear_history(&self) {
        self.inner.update(|state| state.history.clear());
    }

    pub fn is_polling(&self) -> bool {
        self.scheduler.lock().is_running()
    }
}
