//! Application layer: orchestration of the tracking view and its companions

pub mod controller;
pub mod dashboard;
pub mod order_form;
pub mod scheduler;
pub mod source;
pub mod visualizer;

pub use controller::{LookupOutcome, PollState, TrackingController, TrackingPhase, TrackingView};
pub use dashboard::{DashboardData, DashboardLoader, DashboardState};
pub use order_form::{parse_items, random_order_id, OrderForm};
pub use scheduler::{PollScheduler, PollTicket, DEFAULT_POLL_INTERVAL};
pub use source::OrderStatusSource;
