//! SwiftTrack client - main library
//!
//! Command-line and terminal clients for the SwiftTrack logistics platform.
//!
//! ## Architecture
//!
//! - **bin_common**: Common utilities for binary executables (CLI, runners)
//! - **tracking**: Tracking engine, sessions, health and dashboard (re-exported from workspace)
//! - **swifttrack_client**: HTTP client for the order service (re-exported from workspace)
//!
//! ## Usage in Binaries
//!
//! ```rust
//! use swifttrack::bin_common::{load_config_from_env, ConfigType};
//! use swifttrack::tracking::TrackerConfig;
//! ```

// Re-export workspace libraries for convenience
pub use swifttrack_client;
pub use tracking;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables

    pub mod cli;
    pub mod runner;

    pub use cli::{load_config_from_env, load_tracker_config, ConfigType};
    pub use runner::{build_client, RunConfig};
}
