//! Poll scheduler
//!
//! Re-fetches a subject on a fixed delay measured from the end of one tick to
//! the start of the next, so a slow fetch pushes the next one back instead of
//! overlapping it.
//!
//! # Cancellation
//!
//! Every restart or stop bumps a generation counter held in a
//! `tokio::sync::watch` channel. Each spawned loop owns a [`PollTicket`] for
//! the generation it was started with and:
//!
//! 1. Checks the ticket before every tick and after every delay
//! 2. Wakes from its delay as soon as the generation changes
//! 3. Never aborts a tick that is already running
//!
//! A tick that completes after its generation moved on can still ask
//! [`PollTicket::is_current`] and drop its result.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Default delay between the end of one tick and the start of the next
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

pub type TickError = Box<dyn std::error::Error + Send + Sync>;
pub type TickResult = std::result::Result<(), TickError>;
type TickFn = Arc<dyn Fn(PollTicket) -> BoxFuture<'static, TickResult> + Send + Sync>;

/// Identifies one poll cycle: the subject and the generation that started it
#[derive(Debug, Clone)]
pub struct PollTicket {
    subject: String,
    generation: u64,
    current: watch::Receiver<u64>,
}

impl PollTicket {
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True while no restart or stop happened since this ticket was issued
    pub fn is_current(&self) -> bool {
        *self.current.borrow() == self.generation
    }
}

pub struct PollScheduler {
    interval: Duration,
    generation: watch::Sender<u64>,
    subject: String,
    enabled: bool,
    on_tick: Option<TickFn>,
}

impl PollScheduler {
    pub fn new(interval: Duration) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            interval,
            generation,
            subject: String::new(),
            enabled: false,
            on_tick: None,
        }
    }

    /// Begin polling `subject`, replacing any running cycle
    ///
    /// The first tick fires right away. Must be called within a Tokio runtime.
    pub fn start<F, Fut, E>(&mut self, subject: impl Into<String>, on_tick: F)
    where
        F: Fn(PollTicket) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<(), E>> + Send + 'static,
        E: Into<TickError> + 'static,
    {
        let callback: TickFn = Arc::new(move |ticket: PollTicket| {
            let tick = on_tick(ticket);
            async move {
                let result: TickResult = tick.await.map_err(Into::into);
                result
            }
            .boxed()
        });

        self.subject = subject.into();
        self.on_tick = Some(callback);
        self.enabled = true;
        self.restart();
    }

    /// Cancel the pending tick and stop cycling
    ///
    /// A tick already running is left to finish.
    pub fn stop(&mut self) {
        if self.enabled {
            info!("Stopping polling for {}", self.subject);
        }
        self.enabled = false;
        self.bump();
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled == self.enabled {
            return;
        }
        if enabled {
            self.enabled = true;
            self.restart();
        } else {
            self.stop();
        }
    }

    /// Point the cycle at a new subject
    ///
    /// While enabled this restarts against the new subject; an empty subject
    /// pauses the cycle until a non-empty one is set.
    pub fn set_subject(&mut self, subject: impl Into<String>) {
        let subject = subject.into();
        if subject == self.subject {
            return;
        }
        self.subject = subject;
        if self.enabled {
            self.restart();
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether a cycle is currently scheduled
    pub fn is_running(&self) -> bool {
        self.enabled && !self.subject.is_empty() && self.on_tick.is_some()
    }

    fn bump(&mut self) -> u64 {
        self.generation.send_modify(|g| *g += 1);
        *self.generation.borrow()
    }

    fn restart(&mut self) {
        let generation = self.bump();

        if !self.is_running() {
            return;
        }
        let Some(on_tick) = self.on_tick.clone() else {
            return;
        };

        let ticket = PollTicket {
            subject: self.subject.clone(),
            generation,
            current: self.generation.subscribe(),
        };

        info!(
            "Polling {} every {:?} (generation {})",
            self.subject, self.interval, generation
        );

        tokio::spawn(poll_loop(ticket, self.interval, on_tick));
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.bump();
    }
}

async fn poll_loop(mut ticket: PollTicket, interval: Duration, on_tick: TickFn) {
    debug!(
        "Poll loop for {} started (generation {})",
        ticket.subject, ticket.generation
    );

    loop {
        if !ticket.is_current() {
            break;
        }

        if let Err(e) = on_tick(ticket.clone()).await {
            warn!("Poll tick for {} failed: {}", ticket.subject, e);
        }

        if !ticket.is_current() {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            changed = ticket.current.changed() => {
                if changed.is_err() {
                    // Scheduler dropped
                    break;
                }
            }
        }
    }

    debug!(
        "Poll loop for {} exiting (generation {})",
        ticket.subject, ticket.generation
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::convert::Infallible;

    type TickLog = Arc<Mutex<Vec<String>>>;

    fn recorder(log: &TickLog) -> impl Fn(PollTicket) -> futures::future::Ready<Result<(), Infallible>> + Send + Sync + 'static {
        let log = log.clone();
        move |ticket: PollTicket| {
            log.lock().push(ticket.subject().to_string());
            futures::future::ready(Ok(()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_is_immediate_then_fixed_delay() {
        let log: TickLog = Arc::default();
        let mut scheduler = PollScheduler::new(Duration::from_secs(5));

        scheduler.start("A", recorder(&log));
        tokio::task::yield_now().await;
        assert_eq!(log.lock().len(), 1);

        tokio::time::sleep(Duration::from_millis(4900)).await;
        assert_eq!(log.lock().len(), 1);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(log.lock().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_counts_from_end_of_slow_tick() {
        let starts: Arc<Mutex<Vec<Duration>>> = Arc::default();
        let origin = tokio::time::Instant::now();
        let mut scheduler = PollScheduler::new(Duration::from_secs(5));

        let log = starts.clone();
        scheduler.start("A", move |_ticket| {
            log.lock().push(origin.elapsed());
            async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Ok::<(), Infallible>(())
            }
        });

        tokio::time::sleep(Duration::from_secs(25)).await;

        let secs: Vec<u64> = starts.lock().iter().map(Duration::as_secs).collect();
        assert_eq!(secs, [0, 8, 16, 24]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_switch_subject_before_first_tick() {
        let log: TickLog = Arc::default();
        let mut scheduler = PollScheduler::new(Duration::from_secs(5));

        scheduler.start("A", recorder(&log));
        scheduler.set_subject("B");

        tokio::time::sleep(Duration::from_secs(11)).await;

        let ticks = log.lock().clone();
        assert!(!ticks.iter().any(|s| s == "A"));
        assert_eq!(ticks, ["B", "B", "B"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_pending_tick() {
        let log: TickLog = Arc::default();
        let mut scheduler = PollScheduler::new(Duration::from_secs(5));

        scheduler.start("A", recorder(&log));
        tokio::task::yield_now().await;
        scheduler.set_enabled(false);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(log.lock().len(), 1);
        assert!(!scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reenable_resumes_same_subject() {
        let log: TickLog = Arc::default();
        let mut scheduler = PollScheduler::new(Duration::from_secs(5));

        scheduler.start("A", recorder(&log));
        scheduler.stop();
        scheduler.set_enabled(true);
        tokio::task::yield_now().await;

        assert_eq!(log.lock().clone(), ["A"]);
        assert!(scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_subject_pauses() {
        let log: TickLog = Arc::default();
        let mut scheduler = PollScheduler::new(Duration::from_secs(5));

        scheduler.start("A", recorder(&log));
        tokio::task::yield_now().await;
        scheduler.set_subject("");

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(log.lock().len(), 1);
        assert!(scheduler.is_enabled());
        assert!(!scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_tick_keeps_polling() {
        let count = Arc::new(Mutex::new(0u32));
        let mut scheduler = PollScheduler::new(Duration::from_secs(5));

        let counter = count.clone();
        scheduler.start("A", move |_ticket| {
            *counter.lock() += 1;
            futures::future::ready(Err::<(), _>(std::io::Error::other("backend down")))
        });

        tokio::time::sleep(Duration::from_millis(15_100)).await;
        assert_eq!(*count.lock(), 4);
    }
}
