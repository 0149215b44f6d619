//! Per-chat session persistence backed by a single JSON file.
//!
//! Sessions hold the auth tokens handed out by the downstream services.
//! Every mutation rewrites the whole file; the last write wins. Conversation
//! state is deliberately not stored here.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Session record for one chat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    pub username: Option<String>,
    pub nutrition_token: Option<String>,
    pub workout_token: Option<String>,
    pub registered_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl ChatSession {
    /// True when the chat holds tokens for both services.
    pub fn is_logged_in(&self) -> bool {
        self.nutrition_token.is_some() && self.workout_token.is_some()
    }
}

/// JSON-file backed store of chat sessions, keyed by Telegram chat id.
pub struct SessionStore {
    path: PathBuf,
    sessions: Mutex<HashMap<i64, ChatSession>>,
}

impl SessionStore {
    /// Load the store from `path`. A missing file yields an empty store;
    /// a malformed file is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let sessions: HashMap<i64, ChatSession> = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read session file {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Malformed session file {}", path.display()))?
        } else {
            HashMap::new()
        };

        info!(
            path = %path.display(),
            sessions = sessions.len(),
            "Session store loaded"
        );

        Ok(Self {
            path,
            sessions: Mutex::new(sessions),
        })
    }

    /// Fetch a copy of the session for `chat_id`, if any.
    pub async fn get(&self, chat_id: i64) -> Option<ChatSession> {
        self.sessions.lock().await.get(&chat_id).cloned()
    }

    /// Mutate (creating if absent) the session for `chat_id` and persist.
    pub async fn update<F>(&self, chat_id: i64, apply: F) -> Result<()>
    where
        F: FnOnce(&mut ChatSession),
    {
        let mut sessions = self.sessions.lock().await;
        apply(sessions.entry(chat_id).or_default());
        self.persist(&sessions)
    }

    /// Drop the session for `chat_id` and persist.
    pub async fn clear(&self, chat_id: i64) -> Result<()> {
        let mut sessions = self.sessions.lock().await;
        sessions.remove(&chat_id);
        self.persist(&sessions)
    }

    // Whole-file rewrite; callers hold the mutex.
    fn persist(&self, sessions: &HashMap<i64, ChatSession>) -> Result<()> {
        let content =
            serde_json::to_string_pretty(sessions).context("Failed to serialize sessions")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write session file {}", self.path.display()))?;

        debug!(
            path = %self.path.display(),
            sessions = sessions.len(),
            "Session file written"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_yields_empty_store() {
        let dir = tempdir().unwrap();
        let store = SessionStore::load(dir.path().join("sessions.json")).unwrap();
        assert!(store.get(42).await.is_none());
    }

    #[tokio::test]
    async fn test_update_persists_to_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sessions.json");

        let store = SessionStore::load(&path).unwrap();
        store
            .update(42, |session| {
                session.username = Some("alice".to_string());
                session.nutrition_token = Some("tok-n".to_string());
            })
            .await
            .unwrap();

        // A fresh load must see the write.
        let reloaded = SessionStore::load(&path).unwrap();
        let session = reloaded.get(42).await.unwrap();
        assert_eq!(session.username.as_deref(), Some("alice"));
        assert_eq!(session.nutrition_token.as_deref(), Some("tok-n"));
        assert!(!session.is_logged_in());
    }

    #[tokio::test]
    async fn test_clear_removes_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sessions.json");

        let store = SessionStore::load(&path).unwrap();
        store
            .update(7, |session| {
                session.workout_token = Some("tok-w".to_string());
            })
            .await
            .unwrap();
        store.clear(7).await.unwrap();

        assert!(store.get(7).await.is_none());
        let reloaded = SessionStore::load(&path).unwrap();
        assert!(reloaded.get(7).await.is_none());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sessions.json");
        fs::write(&path, "not json").unwrap();

        assert!(SessionStore::load(&path).is_err());
    }
}
