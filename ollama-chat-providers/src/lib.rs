//! Inference server integration for ollama-chat
//!
//! This crate provides the provider abstraction and the HTTP client for an
//! Ollama-compatible server.

pub mod base;
pub mod models;
pub mod ollama;

pub use base::{ChatProvider, ProviderError, ProviderResult};
pub use models::fetch_models_or_default;
pub use ollama::OllamaClient;
