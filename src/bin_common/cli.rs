//! CLI utilities for binaries
//!
//! Resolves and loads the tracker configuration for all binary executables.

use std::path::PathBuf;
use tracking::infrastructure::config::{Result, TrackerConfig};

/// Where the configuration comes from
#[derive(Debug, Clone)]
pub enum ConfigType {
    /// Tracker configuration (config/tracker.yaml)
    Tracker,
    /// Custom path
    Custom(String),
}

impl ConfigType {
    /// Get the default path for this config type
    pub fn default_path(&self) -> &str {
        match self {
            ConfigType::Tracker => "config/tracker.yaml",
            ConfigType::Custom(path) => path,
        }
    }

    /// Environment variable that overrides the default path
    pub fn env_var_name(&self) -> Option<&'static str> {
        match self {
            ConfigType::Tracker => Some("SWIFTTRACK_CONFIG_PATH"),
            ConfigType::Custom(_) => None,
        }
    }
}

/// Load configuration path from environment or use default
///
/// An explicit custom path always wins over the environment.
pub fn load_config_from_env(config_type: ConfigType) -> PathBuf {
    config_type
        .env_var_name()
        .and_then(|name| std::env::var(name).ok())
        .unwrap_or_else(|| config_type.default_path().to_string())
        .into()
}

/// Resolve the config path and load it, falling back to defaults if the file is absent
pub fn load_tracker_config(config_type: ConfigType) -> Result<TrackerConfig> {
    TrackerConfig::load_or_default(load_config_from_env(config_type))
}
