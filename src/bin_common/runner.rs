//! Binary runner utilities
//!
//! Shared startup for the binaries: a banner, the HTTP client built from
//! config, and the session gate for commands that need a logged-in client.

use anyhow::Context;
use swifttrack_client::RestClient;
use tracing::info;
use tracking::infrastructure::{SessionStore, TrackerConfig};

/// Configuration for running a binary command
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Name of the command (for logging)
    pub name: String,
    /// Whether the command needs a stored client session
    pub requires_session: bool,
}

impl RunConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requires_session: false,
        }
    }

    pub fn with_session(mut self) -> Self {
        self.requires_session = true;
        self
    }

    /// Print the banner and check the session gate
    ///
    /// Returns the logged-in client id when one is stored.
    pub fn begin(&self, config: &TrackerConfig) -> anyhow::Result<Option<String>> {
        info!("========================================");
        info!("SwiftTrack {}", self.name);
        info!("Backend: {}", config.api.base_url);
        info!("========================================");

        let store = SessionStore::new(&config.session.path);
        if self.requires_session {
            let client_id = store.require_client_id().with_context(|| {
                format!("{} requires a session; run `swifttrack login <client-id>` first", self.name)
            })?;
            return Ok(Some(client_id));
        }
        Ok(store.client_id()?)
    }
}

/// HTTP client for the configured backend
pub fn build_client(config: &TrackerConfig) -> anyhow::Result<RestClient> {
    RestClient::with_timeout(&config.api.base_url, config.api.timeout())
        .with_context(|| format!("Failed to build HTTP client for {}", config.api.base_url))
}
