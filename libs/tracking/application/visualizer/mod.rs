//! Track Visualizer
//!
//! Terminal UI for live order tracking: status card, progress timeline,
//! recent searches and backend health.

pub mod app;
pub mod ui;

pub use app::{App, InputMode};
