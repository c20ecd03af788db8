//! Main application state and key handling for the visualizer

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::KeyCode;
use swifttrack_client::RestClient;
use tokio::runtime::Handle;
use tracing::debug;

use crate::application::controller::{TrackingController, TrackingView};
use crate::domain::HistoryEntry;
use crate::infrastructure::config::TrackerConfig;
use crate::infrastructure::health::{BackendHealth, BackendMonitor};

/// Whether keystrokes edit the order id or act as commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

pub struct App {
    controller: TrackingController<RestClient>,
    monitor: Arc<BackendMonitor>,
    runtime: Handle,
    /// true = keep running, false = shutdown requested
    running: Arc<AtomicBool>,
    health_interval: Duration,
    poll_interval: Duration,
    /// Order id being typed
    pub input: String,
    pub input_mode: InputMode,
    pub client_id: String,
    pub should_quit: bool,
    /// Status message to show in footer
    pub status_message: Option<String>,
}

impl App {
    pub fn new(runtime: Handle, client: RestClient, config: &TrackerConfig, client_id: String) -> Self {
        Self {
            controller: TrackingController::with_settings(client.clone(), &config.tracking),
            monitor: Arc::new(BackendMonitor::new(client)),
            runtime,
            running: Arc::new(AtomicBool::new(true)),
            health_interval: Duration::from_secs(config.health.check_interval_secs),
            poll_interval: config.tracking.poll_interval(),
            input: String::new(),
            input_mode: InputMode::Editing,
            client_id,
            should_quit: false,
            status_message: None,
        }
    }

    /// Start background health checks
    pub fn start(&self) {
        let _guard = self.runtime.enter();
        Arc::clone(&self.monitor).spawn(self.health_interval, Arc::clone(&self.running));
    }

    pub fn view(&self) -> TrackingView {
        self.controller.view()
    }

    pub fn health(&self) -> BackendHealth {
        self.monitor.status()
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Recent searches, newest first; this is the order the quick-track keys use
    pub fn recent_searches(&self) -> Vec<HistoryEntry> {
        let mut history = self.view().history;
        history.reverse();
        history
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        self.status_message = None;

        match self.input_mode {
            InputMode::Editing => match code {
                KeyCode::Enter => {
                    self.input_mode = InputMode::Normal;
                    self.track();
                }
                KeyCode::Esc => self.input_mode = InputMode::Normal,
                KeyCode::Backspace => {
                    self.input.pop();
                }
                KeyCode::Char(c) => self.input.push(c),
                _ => {}
            },
            InputMode::Normal => match code {
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                KeyCode::Char('i') | KeyCode::Char('/') => self.input_mode = InputMode::Editing,
                KeyCode::Enter => self.track(),
                KeyCode::Char('p') => self.toggle_polling(),
                KeyCode::Char('c') => {
                    self.controller.clear_history();
                    self.status_message = Some("Search history cleared".to_string());
                }
                KeyCode::Char(c @ '1'..='5') => {
                    let index = c as usize - '1' as usize;
                    self.quick_track(index);
                }
                _ => {}
            },
        }
    }

    fn track(&mut self) {
        let order_id = self.input.trim().to_string();
        if order_id.is_empty() {
            self.status_message = Some("Enter an order id first".to_string());
            return;
        }

        let _guard = self.runtime.enter();
        self.controller.set_subject(&order_id);

        let controller = self.controller.clone();
        self.runtime.spawn(async move {
            let outcome = controller.lookup(&order_id).await;
            debug!("Lookup for {} finished: {:?}", order_id, outcome);
        });
    }

    fn toggle_polling(&mut self) {
        let _guard = self.runtime.enter();

        if self.controller.view().poll.enabled {
            self.controller.set_polling(false, "");
            self.status_message = Some("Auto-refresh off".to_string());
            return;
        }

        let order_id = self.input.trim();
        if order_id.is_empty() {
            self.status_message = Some("Enter an order id to auto-refresh".to_string());
            return;
        }

        self.controller.set_polling(true, order_id);
        self.status_message = Some(format!("Auto-refresh on for {}", order_id));
    }

    fn quick_track(&mut self, index: usize) {
        let Some(entry) = self.recent_searches().into_iter().nth(index) else {
            return;
        };

        let order_id = entry.order_id().to_string();
        self.input = order_id.clone();

        let _guard = self.runtime.enter();
        let controller = self.controller.clone();
        self.runtime.spawn(async move {
            controller.quick_track(&order_id).await;
        });
    }

    pub fn shutdown(&mut self) {
        self.running.store(false, Ordering::Release);
        let _guard = self.runtime.enter();
        self.controller.set_polling(false, "");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(
            Handle::current(),
            RestClient::new("http://127.0.0.1:9"),
            &TrackerConfig::default(),
            "CLIENT001".to_string(),
        )
    }

    #[tokio::test]
    async fn test_editing_keys() {
        let mut app = app();
        assert_eq!(app.input_mode, InputMode::Editing);

        for c in "ORD12q".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        app.handle_key(KeyCode::Backspace);
        assert_eq!(app.input, "ORD12");
        assert!(!app.should_quit);

        app.handle_key(KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Normal);

        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_track_needs_order_id() {
        let mut app = app();
        app.handle_key(KeyCode::Enter);

        assert_eq!(app.status_message.as_deref(), Some("Enter an order id first"));
        assert!(!app.view().loading);
    }

    #[tokio::test]
    async fn test_polling_toggle() {
        let mut app = app();
        app.handle_key(KeyCode::Esc);
        app.handle_key(KeyCode::Char('p'));
        assert!(!app.view().poll.enabled);

        app.input = "ORD7".to_string();
        app.handle_key(KeyCode::Char('p'));
        assert!(app.view().poll.enabled);
        assert_eq!(app.view().poll.subject_order_id, "ORD7");

        app.handle_key(KeyCode::Char('p'));
        assert!(!app.view().poll.enabled);
    }

    #[tokio::test]
    async fn test_quick_track_out_of_range_is_noop() {
        let mut app = app();
        app.handle_key(KeyCode::Esc);
        app.handle_key(KeyCode::Char('3'));
        assert!(app.input.is_empty());
    }
}
