//! Session store: ordered chat sessions with durable persistence

use super::store::{ChatMessage, Session};
use crate::storage::KeyValueStore;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Storage key holding the JSON session collection
pub const CHATS_KEY: &str = "ollama-chats";

/// Storage key holding the last selected model as plain text
pub const SELECTED_MODEL_KEY: &str = "ollama-selected-model";

/// Names of the two storage slots used by the session store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub chats: String,
    pub model: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            chats: CHATS_KEY.to_string(),
            model: SELECTED_MODEL_KEY.to_string(),
        }
    }
}

/// Manages the ordered session collection and the active selection.
///
/// Every mutation is flushed to storage before returning. When flushing
/// fails the in-memory change is kept and the storage error is returned.
#[derive(Debug)]
pub struct SessionManager<S> {
    storage: S,
    keys: StorageKeys,
    /// Newest first
    sessions: Vec<Session>,
    active_id: Option<String>,
    selected_model: String,
}

impl<S: KeyValueStore> SessionManager<S> {
    /// Load sessions from `storage` using the default keys
    pub fn restore(storage: S, default_model: impl Into<String>) -> Self {
        Self::restore_with_keys(storage, StorageKeys::default(), default_model)
    }

    /// Load sessions from `storage`.
    ///
    /// Unreadable or malformed stored data is treated as "no prior sessions".
    pub fn restore_with_keys(
        storage: S,
        keys: StorageKeys,
        default_model: impl Into<String>,
    ) -> Self {
        let sessions = load_sessions(&storage, &keys.chats);

        let selected_model = match storage.get(&keys.model) {
            Ok(Some(model)) if !model.trim().is_empty() => model.trim().to_string(),
            Ok(_) => default_model.into(),
            Err(e) => {
                warn!("Failed to read selected model: {}", e);
                default_model.into()
            }
        };

        let active_id = sessions.first().map(|s| s.id().to_string());
        info!(
            "Restored {} session(s), selected model {}",
            sessions.len(),
            selected_model
        );

        Self {
            storage,
            keys,
            sessions,
            active_id,
            selected_model,
        }
    }

    /// Write the session collection and selected model to storage
    pub fn persist(&self) -> crate::Result<()> {
        let json = serde_json::to_string(&self.sessions)?;
        self.storage.set(&self.keys.chats, &json)?;
        self.storage.set(&self.keys.model, &self.selected_model)?;
        debug!("Persisted {} session(s)", self.sessions.len());
        Ok(())
    }

    /// Create an empty session at the front of the list and make it active
    pub fn create_session(&mut self, model: impl Into<String>) -> crate::Result<&Session> {
        let session = Session::new(model);
        debug!("Created session {}", session.id());
        self.active_id = Some(session.id().to_string());
        self.sessions.insert(0, session);
        self.persist()?;
        Ok(&self.sessions[0])
    }

    /// Make `id` the active session
    pub fn select_session(&mut self, id: &str) -> crate::Result<()> {
        if self.get(id).is_none() {
            return Err(crate::Error::NotFound(format!("session {}", id)));
        }
        self.active_id = Some(id.to_string());
        Ok(())
    }

    /// Remove a session.
    ///
    /// Deleting the active session activates the first remaining one.
    pub fn delete_session(&mut self, id: &str) -> crate::Result<Session> {
        let index = self
            .position(id)
            .ok_or_else(|| crate::Error::NotFound(format!("session {}", id)))?;
        let removed = self.sessions.remove(index);

        if self.active_id.as_deref() == Some(id) {
            self.active_id = self.sessions.first().map(|s| s.id().to_string());
        }

        debug!("Deleted session {}", id);
        self.persist()?;
        Ok(removed)
    }

    /// Append a message to a session's log
    pub fn append_message(&mut self, session_id: &str, message: ChatMessage) -> crate::Result<()> {
        let index = self
            .position(session_id)
            .ok_or_else(|| crate::Error::NotFound(format!("session {}", session_id)))?;
        self.sessions[index].push(message);
        self.persist()
    }

    /// Remember the model picked by the user
    pub fn set_selected_model(&mut self, model: impl Into<String>) -> crate::Result<()> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(crate::Error::Validation(
                "model name must not be empty".to_string(),
            ));
        }
        self.selected_model = model;
        self.persist()
    }

    /// All sessions, newest first
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Look up a session by id
    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id() == id)
    }

    /// Id of the active session
    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// The active session
    pub fn active_session(&self) -> Option<&Session> {
        self.active_id.as_deref().and_then(|id| self.get(id))
    }

    /// The last selected model
    pub fn selected_model(&self) -> &str {
        &self.selected_model
    }

    /// Number of sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether there are no sessions
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// The backing store
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.sessions.iter().position(|s| s.id() == id)
    }
}

fn load_sessions<S: KeyValueStore>(storage: &S, key: &str) -> Vec<Session> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("Failed to read stored sessions: {}", e);
            return Vec::new();
        }
    };

    let sessions: Vec<Session> = match serde_json::from_str(&raw) {
        Ok(sessions) => sessions,
        Err(e) => {
            warn!("Ignoring malformed stored sessions: {}", e);
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    sessions
        .into_iter()
        .filter(|s| {
            let fresh = seen.insert(s.id().to_string());
            if !fresh {
                warn!("Dropping duplicate stored session {}", s.id());
            }
            fresh
        })
        .collect()
}
