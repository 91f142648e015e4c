//! Configuration validation rules.

use super::schema::Config;
use crate::utils::safe_filename;

/// Validate configuration and return aggregated validation errors.
pub fn validate_config(config: &Config) -> crate::Result<()> {
    let mut errors = Vec::new();

    let api_base = config.ollama.api_base.trim();
    if api_base.is_empty() {
        errors.push("ollama.api_base must not be empty".to_string());
    } else if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
        errors.push("ollama.api_base must start with http:// or https://".to_string());
    }
    if config.ollama.default_model.trim().is_empty() {
        errors.push("ollama.default_model must not be empty".to_string());
    }
    if config.ollama.fallback_models.is_empty() {
        errors.push("ollama.fallback_models must list at least one model".to_string());
    } else if config
        .ollama
        .fallback_models
        .iter()
        .any(|m| m.trim().is_empty())
    {
        errors.push("ollama.fallback_models must not contain empty names".to_string());
    }
    if config.ollama.request_timeout_secs == 0 {
        errors.push("ollama.request_timeout_secs must be > 0".to_string());
    }

    if config.storage.dir.trim().is_empty() {
        errors.push("storage.dir must not be empty".to_string());
    }
    if config.storage.chats_key.trim().is_empty() {
        errors.push("storage.chats_key must not be empty".to_string());
    }
    if config.storage.model_key.trim().is_empty() {
        errors.push("storage.model_key must not be empty".to_string());
    }
    // Keys become file names, so they must stay distinct after sanitizing.
    if safe_filename(&config.storage.chats_key) == safe_filename(&config.storage.model_key) {
        errors.push("storage.chats_key and storage.model_key must differ".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(crate::Error::Validation(errors.join("; ")))
    }
}
