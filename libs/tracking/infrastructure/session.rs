//! Client session storage
//!
//! The platform has no real authentication: the client id is kept unchecked
//! in a small JSON file under a fixed key and its presence is what gates the
//! order, tracking and driver views.

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Key the client id is stored under
pub const CLIENT_ID_KEY: &str = "clientId";

/// Demo accounts offered for quick login
pub const QUICK_LOGIN_IDS: [&str; 3] = ["CLIENT001", "CLIENT002", "ENTERPRISE"];

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt session file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Client id must not be empty")]
    EmptyClientId,

    #[error("Not logged in")]
    NotLoggedIn,
}

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored client id, if any
    pub fn client_id(&self) -> Result<Option<String>> {
        let entries = self.read()?;
        Ok(entries
            .get(CLIENT_ID_KEY)
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_string))
    }

    /// The stored client id, or [`SessionError::NotLoggedIn`]
    pub fn require_client_id(&self) -> Result<String> {
        self.client_id()?.ok_or(SessionError::NotLoggedIn)
    }

    /// Store a client id; surrounding whitespace is dropped
    pub fn login(&self, client_id: &str) -> Result<String> {
        let client_id = client_id.trim();
        if client_id.is_empty() {
            return Err(SessionError::EmptyClientId);
        }

        let mut entries = self.read()?;
        entries.insert(CLIENT_ID_KEY.to_string(), Value::String(client_id.to_string()));
        self.write(&entries)?;

        info!("Logged in as {}", client_id);
        Ok(client_id.to_string())
    }

    pub fn logout(&self) -> Result<()> {
        let mut entries = self.read()?;
        if entries.remove(CLIENT_ID_KEY).is_some() {
            self.write(&entries)?;
            info!("Logged out");
        }
        Ok(())
    }

    fn read(&self) -> Result<Map<String, Value>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(Map::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        debug!("Writing session to {}", self.path.display());
        std::fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::new(dir.path().join("nested").join("session.json"))
    }

    #[test]
    fn test_no_session_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        assert_eq!(store.client_id().unwrap(), None);
        assert!(matches!(store.require_client_id(), Err(SessionError::NotLoggedIn)));
    }

    #[test]
    fn test_login_trims_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        assert_eq!(store.login("  CLIENT002 ").unwrap(), "CLIENT002");

        let reopened = SessionStore::new(store.path());
        assert_eq!(reopened.client_id().unwrap().as_deref(), Some("CLIENT002"));
    }

    #[test]
    fn test_empty_login_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        assert!(matches!(store.login("   "), Err(SessionError::EmptyClientId)));
        assert_eq!(store.client_id().unwrap(), None);
    }

    #[test]
    fn test_logout_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"clientId":"ENTERPRISE","theme":"dark"}"#).unwrap();

        let store = SessionStore::new(&path);
        store.logout().unwrap();

        assert_eq!(store.client_id().unwrap(), None);
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("theme"));
    }
}
