//! # courier-sessions
//!
//! Durable per-persona conversation tokens.
//!
//! The CLI resumes a conversation by session id. Courier keys one token per
//! persona so each persona keeps its own history, and persists the mapping
//! as a single JSON document that survives restarts.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use courier_core::error::CourierError;

/// Maps persona id to an opaque session token. At most one token per
/// persona; mutations overwrite the whole document on disk.
pub struct SessionStore {
    path: PathBuf,
    sessions: Mutex<HashMap<String, String>>,
}

impl SessionStore {
    /// Open the store at `path`, loading any existing document. A missing
    /// or unreadable file starts the store empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let sessions = Self::load(&path);
        Self {
            path,
            sessions: Mutex::new(sessions),
        }
    }

    fn load(path: &Path) -> HashMap<String, String> {
        let Ok(content) = std::fs::read_to_string(path) else {
            return HashMap::new();
        };
        match serde_json::from_str(&content) {
            Ok(map) => map,
            Err(e) => {
                warn!("Ignoring malformed session file {}: {e}", path.display());
                HashMap::new()
            }
        }
    }

    /// Token for `persona_id`, minting and persisting a fresh one when
    /// absent. The boolean reports whether the token was just created,
    /// which decides whether the CLI starts a conversation or resumes one.
    pub async fn get_or_create(&self, persona_id: &str) -> Result<(String, bool), CourierError> {
        let mut sessions = self.sessions.lock().await;
        if let Some(token) = sessions.get(persona_id) {
            return Ok((token.clone(), false));
        }
        let token = Uuid::new_v4().to_string();
        sessions.insert(persona_id.to_string(), token.clone());
        self.persist(&sessions)?;
        info!(persona = persona_id, "Minted new session token");
        Ok((token, true))
    }

    /// Whether a token is currently stored for `persona_id`. Read-only,
    /// never mints.
    pub async fn contains(&self, persona_id: &str) -> bool {
        self.sessions.lock().await.contains_key(persona_id)
    }

    /// Drop the token for `persona_id`, forcing a fresh conversation on
    /// next use. Returns whether a token existed.
    pub async fn reset(&self, persona_id: &str) -> Result<bool, CourierError> {
        let mut sessions = self.sessions.lock().await;
        let removed = sessions.remove(persona_id).is_some();
        if removed {
            self.persist(&sessions)?;
            info!(persona = persona_id, "Session reset");
        }
        Ok(removed)
    }

    /// Whole-document overwrite via temp file + rename, so a crash mid-write
    /// never leaves a truncated store behind.
    fn persist(&self, sessions: &HashMap<String, String>) -> Result<(), CourierError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(sessions)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_or_create_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open(dir.path().join("sessions.json"));

        let (first, created) = store.get_or_create("dev").await.unwrap();
        assert!(created);
        let (second, created) = store.get_or_create("dev").await.unwrap();
        assert!(!created);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_personas_get_distinct_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open(dir.path().join("sessions.json"));

        let (a, _) = store.get_or_create("a").await.unwrap();
        let (b, _) = store.get_or_create("b").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_reset_forces_fresh_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open(dir.path().join("sessions.json"));

        let (old, _) = store.get_or_create("dev").await.unwrap();
        assert!(store.reset("dev").await.unwrap());
        let (fresh, created) = store.get_or_create("dev").await.unwrap();
        assert!(created);
        assert_ne!(old, fresh);
    }

    #[tokio::test]
    async fn test_contains_does_not_mint() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open(dir.path().join("sessions.json"));

        assert!(!store.contains("dev").await);
        store.get_or_create("dev").await.unwrap();
        assert!(store.contains("dev").await);
    }

    #[tokio::test]
    async fn test_reset_unknown_persona_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open(dir.path().join("sessions.json"));
        assert!(!store.reset("ghost").await.unwrap());
    }

    #[tokio::test]
    async fn test_tokens_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");

        let (token, _) = SessionStore::open(&path).get_or_create("dev").await.unwrap();

        let reopened = SessionStore::open(&path);
        let (loaded, created) = reopened.get_or_create("dev").await.unwrap();
        assert!(!created, "token should come from disk");
        assert_eq!(token, loaded);
    }

    #[tokio::test]
    async fn test_malformed_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = SessionStore::open(&path);
        let (_, created) = store.get_or_create("dev").await.unwrap();
        assert!(created);
    }
}
