//! Error type for chat operations

use ollama_chat_providers::ProviderError;
use thiserror::Error;

/// Errors surfaced by [`crate::ChatController`]
#[derive(Error, Debug)]
pub enum ChatError {
    #[error(transparent)]
    Core(#[from] ollama_chat_core::Error),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Failed to get response from {model}: {source}")]
    Request {
        model: String,
        #[source]
        source: ProviderError,
    },

    #[error("A request is already pending for session {0}")]
    RequestInFlight(String),

    #[error("Request for session {0} was cancelled")]
    Cancelled(String),
}

impl ChatError {
    /// Short text suitable for an inline error banner
    pub fn user_message(&self) -> String {
        match self {
            ChatError::Request { model, .. } => failed_response_message(model),
            other => other.to_string(),
        }
    }
}

pub(crate) fn failed_response_message(model: &str) -> String {
    format!("Failed to get response from {}", model)
}
