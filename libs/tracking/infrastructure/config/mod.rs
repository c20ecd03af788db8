use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Overrides the API base URL from the YAML file
pub const API_BASE_ENV: &str = "SWIFTTRACK_API_BASE";
/// Overrides where the client session is stored
pub const SESSION_PATH_ENV: &str = "SWIFTTRACK_SESSION_PATH";
/// Overrides the configured log level
pub const LOG_LEVEL_ENV: &str = "SWIFTTRACK_LOG_LEVEL";

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub tracking: TrackingSettings,
    #[serde(default)]
    pub health: HealthSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
    #[serde(default)]
    pub session: SessionSettings,
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// File this was loaded from; `None` when running on defaults
    #[serde(skip)]
    pub source: Option<PathBuf>,
    /// Environment variables that overrode file values
    #[serde(skip)]
    pub env_overrides: Vec<&'static str>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            tracking: TrackingSettings::default(),
            health: HealthSettings::default(),
            dashboard: DashboardSettings::default(),
            session: SessionSettings::default(),
            log_level: default_log_level(),
            source: None,
            env_overrides: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingSettings {
    /// Delay between the end of one poll and the start of the next
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Recent searches kept
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            history_limit: default_history_limit(),
        }
    }
}

impl TrackingSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthSettings {
    #[serde(default = "default_refresh_secs")]
    pub check_interval_secs: u64,
}

impl Default for HealthSettings {
    fn default() -> Self {
        Self {
            check_interval_secs: default_refresh_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSettings {
    #[serde(default = "default_refresh_secs")]
    pub refresh_interval_secs: u64,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_session_path")]
    pub path: PathBuf,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            path: default_session_path(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_poll_interval_ms() -> u64 {
    5000
}

fn default_history_limit() -> usize {
    5
}

fn default_refresh_secs() -> u64 {
    30
}

fn default_session_path() -> PathBuf {
    PathBuf::from(".swifttrack/session.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TrackerConfig {
    /// Load configuration from a YAML file
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let config_path = config_path.as_ref();
        let yaml_content = std::fs::read_to_string(config_path)?;
        let mut config: TrackerConfig = serde_yaml::from_str(&yaml_content)?;
        config.source = Some(config_path.to_path_buf());
        config.finish()
    }

    /// Load configuration, falling back to defaults when the file does not exist
    pub fn load_or_default(config_path: impl AsRef<Path>) -> Result<Self> {
        let config_path = config_path.as_ref();
        if config_path.exists() {
            Self::load(config_path)
        } else {
            Self::default().finish()
        }
    }

    fn finish(mut self) -> Result<Self> {
        self.apply_env_overrides();
        self.validate()?;
        Ok(self)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var(API_BASE_ENV) {
            self.api.base_url = base_url;
            self.env_overrides.push(API_BASE_ENV);
        }

        if let Ok(path) = std::env::var(SESSION_PATH_ENV) {
            self.session.path = PathBuf::from(path);
            self.env_overrides.push(SESSION_PATH_ENV);
        }

        if let Ok(level) = std::env::var(LOG_LEVEL_ENV) {
            self.log_level = level;
            self.env_overrides.push(LOG_LEVEL_ENV);
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let base_url = self.api.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "api.base_url must be an http(s) URL, got {:?}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "api.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.tracking.poll_interval_ms < 100 {
            return Err(ConfigError::ValidationError(
                "tracking.poll_interval_ms must be at least 100".to_string(),
            ));
        }

        if self.tracking.history_limit == 0 {
            return Err(ConfigError::ValidationError(
                "tracking.history_limit must be greater than 0".to_string(),
            ));
        }

        if self.health.check_interval_secs == 0 || self.dashboard.refresh_interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "refresh intervals must be greater than 0".to_string(),
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "log_level must be one of: {}",
                valid_levels.join(", ")
            )));
        }

        Ok(())
    }

    /// Log configuration summary
    pub fn log(&self) {
        match &self.source {
            Some(path) => info!("Configuration loaded from {}:", path.display()),
            None => info!("No config file found, using defaults:"),
        }
        info!("  API base URL: {}", self.api.base_url);
        info!("  Request timeout: {} seconds", self.api.timeout_secs);
        info!("  Poll interval: {} ms", self.tracking.poll_interval_ms);
        info!("  History limit: {}", self.tracking.history_limit);
        info!("  Session file: {}", self.session.path.display());
        info!("  Log level: {}", self.log_level);
        if !self.env_overrides.is_empty() {
            info!("  Overridden by environment: {}", self.env_overrides.join(", "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.tracking.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.tracking.history_limit, 5);
        assert_eq!(config.health.check_interval_secs, 30);
        assert_eq!(config.dashboard.refresh_interval_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: TrackerConfig = serde_yaml::from_str(
            "tracking:\n  poll_interval_ms: 2000\nlog_level: debug\n",
        )
        .unwrap();

        assert_eq!(config.tracking.poll_interval_ms, 2000);
        assert_eq!(config.tracking.history_limit, 5);
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api:\n  base_url: https://api.swifttrack.example\n  timeout_secs: 3").unwrap();

        let config = TrackerConfig::load(file.path()).unwrap();
        assert_eq!(config.api.timeout(), Duration::from_secs(3));
        assert_eq!(config.source.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrackerConfig::load_or_default(dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config.source, None);
        assert_eq!(config.tracking.history_limit, 5);
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = TrackerConfig::default();
        config.tracking.history_limit = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));

        let mut config = TrackerConfig::default();
        config.api.base_url = "localhost:8000".to_string();
        assert!(config.validate().is_err());

        let mut config = TrackerConfig::default();
        config.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_error_for_load() {
        assert!(matches!(
            TrackerConfig::load("definitely/not/here.yaml"),
            Err(ConfigError::FileError(_))
        ));
    }
}
