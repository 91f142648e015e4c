//! Chat controller: the send / receive flow over the session store

use ollama_chat_core::config::Config;
use ollama_chat_core::session::{ChatMessage, SessionManager};
use ollama_chat_core::storage::{FileStore, KeyValueStore};
use ollama_chat_providers::{fetch_models_or_default, ChatProvider, OllamaClient};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::error::{failed_response_message, ChatError};
use crate::request_state::RequestState;

/// Drives chat sessions against an inference provider.
///
/// Each session has its own request state, so requests for different
/// sessions may run concurrently while a second send to a busy session is
/// rejected. Locks are never held across an await point.
///
/// Session mutations persist synchronously while the session lock is held,
/// so with a [`FileStore`] each send blocks its worker thread for one small
/// file write before the request goes out.
pub struct ChatController<S> {
    sessions: Mutex<SessionManager<S>>,
    provider: Arc<dyn ChatProvider>,
    fallback_models: Vec<String>,
    available_models: Mutex<Vec<String>>,
    states: Mutex<HashMap<String, RequestState>>,
    inflight: Mutex<HashMap<String, CancellationToken>>,
}

impl ChatController<FileStore> {
    /// Build a controller with file-backed storage and an Ollama client
    pub fn from_config(config: &Config) -> Result<Self, ChatError> {
        let storage = FileStore::new(config.storage.resolved_dir());
        let sessions = SessionManager::restore_with_keys(
            storage,
            config.storage.keys(),
            config.ollama.default_model.clone(),
        );
        let provider = OllamaClient::from_config(&config.ollama)?;

        Ok(Self::new(
            sessions,
            Arc::new(provider),
            config.ollama.fallback_models.clone(),
        ))
    }
}

impl<S: KeyValueStore> ChatController<S> {
    /// Create a controller over restored sessions
    pub fn new(
        sessions: SessionManager<S>,
        provider: Arc<dyn ChatProvider>,
        fallback_models: Vec<String>,
    ) -> Self {
        Self {
            sessions: Mutex::new(sessions),
            provider,
            available_models: Mutex::new(fallback_models.clone()),
            fallback_models,
            states: Mutex::new(HashMap::new()),
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Send `input` in the active session and wait for the reply.
    ///
    /// Blank input is ignored and returns `Ok(None)`. Without an active
    /// session a new one is created first. The user message stays in the
    /// log even when the request fails; the reply is only appended on
    /// success.
    pub async fn send_message(&self, input: &str) -> Result<Option<ChatMessage>, ChatError> {
        if input.trim().is_empty() {
            return Ok(None);
        }

        let (session_id, model, history, token) = {
            let mut sessions = self.sessions.lock();
            let session_id = match sessions.active_id() {
                Some(id) => id.to_string(),
                None => {
                    let model = sessions.selected_model().to_string();
                    sessions.create_session(model)?.id().to_string()
                }
            };

            let mut states = self.states.lock();
            if states.get(&session_id).is_some_and(RequestState::is_pending) {
                return Err(ChatError::RequestInFlight(session_id));
            }

            sessions.append_message(&session_id, ChatMessage::user(input))?;
            let history = sessions
                .get(&session_id)
                .map(|s| s.messages().to_vec())
                .unwrap_or_default();

            let token = CancellationToken::new();
            states.insert(session_id.clone(), RequestState::Pending);
            self.inflight
                .lock()
                .insert(session_id.clone(), token.clone());

            (
                session_id,
                sessions.selected_model().to_string(),
                history,
                token,
            )
        };

        info!(
            "Sending {} message(s) in session {} to model {}",
            history.len(),
            session_id,
            model
        );

        let outcome = tokio::select! {
            _ = token.cancelled() => None,
            result = self.provider.chat(&model, &history) => Some(result),
        };

        match outcome {
            None => {
                info!("Request for session {} cancelled", session_id);
                self.finish(&session_id, RequestState::Idle);
                Err(ChatError::Cancelled(session_id))
            }
            Some(Ok(reply)) => {
                let appended = self
                    .sessions
                    .lock()
                    .append_message(&session_id, reply.clone());
                self.finish(&session_id, RequestState::Idle);
                match appended {
                    Ok(()) => {
                        debug!("Session {} received {} chars", session_id, reply.content.len());
                        Ok(Some(reply))
                    }
                    Err(e) => {
                        warn!("Dropping reply for session {}: {}", session_id, e);
                        Err(e.into())
                    }
                }
            }
            Some(Err(e)) => {
                error!(
                    "Chat request for session {} with model {} failed: {}",
                    session_id, model, e
                );
                self.finish(
                    &session_id,
                    RequestState::Failed(failed_response_message(&model)),
                );
                Err(ChatError::Request { model, source: e })
            }
        }
    }

    /// Cancel the in-flight request of a session. Returns whether one was running.
    pub fn cancel(&self, session_id: &str) -> bool {
        match self.inflight.lock().get(session_id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Start a new chat with the selected model; returns its id
    pub fn new_chat(&self) -> Result<String, ChatError> {
        let mut sessions = self.sessions.lock();
        let model = sessions.selected_model().to_string();
        Ok(sessions.create_session(model)?.id().to_string())
    }

    /// Switch the active chat
    pub fn select_chat(&self, session_id: &str) -> Result<(), ChatError> {
        Ok(self.sessions.lock().select_session(session_id)?)
    }

    /// Delete a chat, cancelling its in-flight request if any
    pub fn delete_chat(&self, session_id: &str) -> Result<(), ChatError> {
        self.cancel(session_id);
        let mut sessions = self.sessions.lock();
        sessions.delete_session(session_id)?;
        self.states.lock().remove(session_id);
        Ok(())
    }

    /// Change the model used for subsequent requests
    pub fn set_model(&self, model: &str) -> Result<(), ChatError> {
        self.sessions.lock().set_selected_model(model)?;
        info!("Selected model {}", model);
        Ok(())
    }

    /// The model used for subsequent requests
    pub fn selected_model(&self) -> String {
        self.sessions.lock().selected_model().to_string()
    }

    /// Reload the model list from the server, keeping the fallback on failure
    pub async fn refresh_models(&self) -> Vec<String> {
        let models = fetch_models_or_default(self.provider.as_ref(), &self.fallback_models).await;
        *self.available_models.lock() = models.clone();
        models
    }

    /// Models offered for selection
    pub fn available_models(&self) -> Vec<String> {
        self.available_models.lock().clone()
    }

    /// Request state of a session; unknown sessions are idle
    pub fn request_state(&self, session_id: &str) -> RequestState {
        self.states
            .lock()
            .get(session_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Request state of the active session
    pub fn active_request_state(&self) -> RequestState {
        let active = self.sessions.lock().active_id().map(ToString::to_string);
        active
            .map(|id| self.request_state(&id))
            .unwrap_or_default()
    }

    /// Clear a failed state after the user has seen the error
    pub fn dismiss_error(&self, session_id: &str) {
        let mut states = self.states.lock();
        if matches!(states.get(session_id), Some(RequestState::Failed(_))) {
            states.insert(session_id.to_string(), RequestState::Idle);
        }
    }

    /// Read access to the session store
    pub fn with_sessions<R>(&self, f: impl FnOnce(&SessionManager<S>) -> R) -> R {
        f(&self.sessions.lock())
    }

    fn finish(&self, session_id: &str, state: RequestState) {
        self.inflight.lock().remove(session_id);
        // Same lock order as send_message and delete_chat: sessions, then states.
        let sessions = self.sessions.lock();
        let mut states = self.states.lock();
        if sessions.get(session_id).is_some() {
            states.insert(session_id.to_string(), state);
        } else {
            states.remove(session_id);
        }
    }
}
