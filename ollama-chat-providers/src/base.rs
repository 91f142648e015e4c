//! Base trait for inference providers

use async_trait::async_trait;
use ollama_chat_core::session::ChatMessage;
use thiserror::Error;

/// Error type for provider operations
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },
}

impl ProviderError {
    /// Whether the request gave up because it ran past its timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProviderError::Http(e) if e.is_timeout())
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Trait for chat-completion backends
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Names of the models the server can run
    async fn list_models(&self) -> ProviderResult<Vec<String>>;

    /// Send the conversation and return the assistant's reply
    async fn chat(&self, model: &str, messages: &[ChatMessage]) -> ProviderResult<ChatMessage>;

    /// Base URL requests are sent to
    fn api_base(&self) -> &str;
}
