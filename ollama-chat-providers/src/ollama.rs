//! Ollama HTTP client implementation

use async_trait::async_trait;
use ollama_chat_core::config::OllamaConfig;
use ollama_chat_core::session::ChatMessage;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::base::{ChatProvider, ProviderError, ProviderResult};

/// `POST /api/chat` request body
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

/// `POST /api/chat` response body
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    message: Option<ResponseMessage>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    #[allow(dead_code)]
    role: Option<String>,
    content: String,
}

/// `GET /api/tags` response body
#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

/// Client for an Ollama-compatible inference server
pub struct OllamaClient {
    client: Client,
    api_base: String,
}

impl OllamaClient {
    /// Create a client for `api_base` whose requests give up after `timeout`
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> ProviderResult<Self> {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .http1_only()
            .timeout(timeout)
            .build()?;

        Ok(Self { client, api_base })
    }

    /// Create a client from configuration
    pub fn from_config(config: &OllamaConfig) -> ProviderResult<Self> {
        Self::new(
            config.api_base.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    async fn error_for_status(response: reqwest::Response) -> ProviderResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(ProviderError::Api { status, body })
    }
}

#[async_trait]
impl ChatProvider for OllamaClient {
    async fn list_models(&self) -> ProviderResult<Vec<String>> {
        let url = self.url("/api/tags");
        debug!("Fetching model list from {}", url);

        let response = Self::error_for_status(self.client.get(&url).send().await?).await?;
        let body = response.text().await?;
        let tags: TagsResponse = serde_json::from_str(&body)?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    async fn chat(&self, model: &str, messages: &[ChatMessage]) -> ProviderResult<ChatMessage> {
        let url = self.url("/api/chat");
        let request = ChatRequest {
            model,
            messages,
            stream: false,
        };

        debug!(
            "Sending chat request to {} with model {} ({} messages)",
            url,
            model,
            messages.len()
        );

        let response =
            Self::error_for_status(self.client.post(&url).json(&request).send().await?).await?;
        let body = response.text().await?;
        let data: ChatResponse = serde_json::from_str(&body)?;

        match data.message {
            Some(message) => Ok(ChatMessage::assistant(message.content)),
            None => Err(ProviderError::InvalidResponse(
                data.error
                    .unwrap_or_else(|| "response has no message".to_string()),
            )),
        }
    }

    fn api_base(&self) -> &str {
        &self.api_base
    }
}
