//! Infrastructure layer: configuration, persistence, logging and backend probes

pub mod config;
pub mod health;
pub mod logging;
pub mod session;

pub use config::{ConfigError, TrackerConfig, TrackingSettings};
pub use health::{BackendHealth, BackendMonitor};
pub use logging::init_tracing;
pub use session::{SessionError, SessionStore, QUICK_LOGIN_IDS};
