//! SwiftTrack order tracking
//!
//! Live status tracking for SwiftTrack orders: status presentation, recent
//! searches, a cancelable poll loop and the controller tying them together,
//! plus the session, health and dashboard pieces the client views share.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod utils;

// Re-export commonly used items
pub use application::{
    LookupOutcome, OrderForm, OrderStatusSource, PollScheduler, TrackingController, TrackingPhase,
    TrackingView,
};
pub use domain::{map_status, DriverManifest, HistoryEntry, HistoryLedger, StatusDisplay, Timeline};
pub use infrastructure::{init_tracing, BackendMonitor, SessionStore, TrackerConfig};
pub use utils::ShutdownManager;
