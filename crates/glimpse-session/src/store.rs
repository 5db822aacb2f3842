//! Single-record session persistence.
//!
//! Exactly one session exists per deployment; it lives in one JSON file
//! named by a fixed key. Writes are whole-value replaces, last writer wins.

use std::path::PathBuf;

use async_trait::async_trait;
use glimpse_core::Session;
use tracing::{debug, warn};

use crate::error::StoreResult;

/// Fixed well-known key the session is stored under
pub const SESSION_KEY: &str = "screenshot-analyzer-session";

/// Durable persistence for the single session record.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist the session, replacing whatever was stored before.
    /// `None` deletes the stored value entirely (clear).
    async fn save(&self, session: Option<&Session>) -> StoreResult<()>;

    /// Load the stored session. Absent or undeserializable values both come
    /// back as `None`; corruption is logged, never returned as an error.
    async fn load(&self) -> StoreResult<Option<Session>>;
}

/// File-backed store rooted in a data directory.
///
/// A store without a resolvable directory (no home directory, or explicitly
/// detached) turns both operations into no-ops, so the surrounding code
/// behaves identically in environments with no durable storage at all.
pub struct FileSessionStore {
    base_dir: Option<PathBuf>,
}

impl FileSessionStore {
    /// Store rooted at the given directory
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    /// Store rooted at `~/.glimpse`, detached when no home directory exists
    pub fn from_default_location() -> Self {
        Self {
            base_dir: Self::default_dir(),
        }
    }

    /// Store with no backing directory; every operation is a no-op
    pub fn detached() -> Self {
        Self { base_dir: None }
    }

    /// Default data directory
    pub fn default_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".glimpse"))
    }

    fn session_path(&self) -> Option<PathBuf> {
        self.base_dir
            .as_ref()
            .map(|dir| dir.join(format!("{SESSION_KEY}.json")))
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn save(&self, session: Option<&Session>) -> StoreResult<()> {
        let Some(path) = self.session_path() else {
            debug!("no storage directory, skipping save");
            return Ok(());
        };

        match session {
            Some(session) => {
                if let Some(dir) = path.parent() {
                    tokio::fs::create_dir_all(dir).await?;
                }
                let json = serde_json::to_string(session)?;
                tokio::fs::write(&path, json).await?;
                debug!(path = %path.display(), "session saved");
            }
            None => match tokio::fs::remove_file(&path).await {
                Ok(()) => debug!(path = %path.display(), "session deleted"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            },
        }
        Ok(())
    }

    async fn load(&self) -> StoreResult<Option<Session>> {
        let Some(path) = self.session_path() else {
            return Ok(None);
        };

        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!("failed to parse saved session, treating as absent: {e}");
                Ok(None)
            }
        }
    }
}
