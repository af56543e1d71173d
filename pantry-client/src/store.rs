//! Persisted session storage
//!
//! The cookie-equivalent: one record holding the token and its expiry, read
//! at startup, written on login, cleared on logout. Pure storage, no network.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared::util::now_millis;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persisted session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub token: String,
    /// Expiry timestamp, UTC milliseconds.
    pub expires_at: i64,
}

impl PersistedSession {
    pub fn is_expired(&self) -> bool {
        now_millis() >= self.expires_at
    }
}

/// Storage abstraction injected into the lifecycle controller.
///
/// Implementations drop records that are already expired, so a `load` that
/// returns a session always returns a usable one.
pub trait SessionStore: Send + Sync {
    /// Read the persisted record, if any.
    fn load(&self) -> Result<Option<PersistedSession>, StoreError>;

    /// Persist a record, overwriting any prior value.
    fn save(&self, session: &PersistedSession) -> Result<(), StoreError>;

    /// Remove the persisted record.
    fn clear(&self) -> Result<(), StoreError>;
}

/// File-backed store: `{dir}/session.json`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    file_path: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            file_path: dir.join("session.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<PersistedSession>, StoreError> {
        if !self.file_path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.file_path)?;
        let session: PersistedSession = serde_json::from_str(&content)?;
        if session.is_expired() {
            let _ = std::fs::remove_file(&self.file_path);
            tracing::info!("Persisted session expired, cleared");
            return Ok(None);
        }
        Ok(Some(session))
    }

    fn save(&self, session: &PersistedSession) -> Result<(), StoreError> {
        if let Some(parent) = self.file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.file_path, content)?;
        tracing::debug!("Session persisted");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        if self.file_path.exists() {
            std::fs::remove_file(&self.file_path)?;
            tracing::debug!("Persisted session cleared");
        }
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<PersistedSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: PersistedSession) -> Self {
        Self {
            slot: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<PersistedSession>, StoreError> {
        let mut slot = self.slot.lock().expect("session slot poisoned");
        if slot.as_ref().is_some_and(PersistedSession::is_expired) {
            *slot = None;
        }
        Ok(slot.clone())
    }

    fn save(&self, session: &PersistedSession) -> Result<(), StoreError> {
        *self.slot.lock().expect("session slot poisoned") = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.slot.lock().expect("session slot poisoned") = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn live_session() -> PersistedSession {
        PersistedSession {
            token: "token-live".into(),
            expires_at: now_millis() + 3_600_000,
        }
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path());

        assert!(store.load().unwrap().is_none());

        let session = live_session();
        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), Some(session));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_drops_expired_record() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path());

        store
            .save(&PersistedSession {
                token: "token-stale".into(),
                expires_at: now_millis() - 1_000,
            })
            .unwrap();

        assert!(store.load().unwrap().is_none());
        // The backing file is gone too.
        assert!(!store.path().exists());
    }

    #[test]
    fn test_save_overwrites_prior_value() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path());

        store.save(&live_session()).unwrap();
        let newer = PersistedSession {
            token: "token-newer".into(),
            expires_at: now_millis() + 7_200_000,
        };
        store.save(&newer).unwrap();
        assert_eq!(store.load().unwrap(), Some(newer));
    }

    #[test]
    fn test_memory_store_drops_expired_record() {
        let store = MemorySessionStore::with_session(PersistedSession {
            token: "token-stale".into(),
            expires_at: now_millis() - 1,
        });
        assert!(store.load().unwrap().is_none());
    }
}
