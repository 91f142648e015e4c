//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::session::{StorageKeys, CHATS_KEY, SELECTED_MODEL_KEY};
use crate::utils::expand_home;

/// Root configuration for ollama-chat
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Inference server configuration
    #[serde(default)]
    pub ollama: OllamaConfig,
    /// Session storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Inference server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Base URL of the inference server
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Model selected when nothing was stored yet
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Models offered when the server's model list cannot be fetched
    #[serde(default = "default_fallback_models")]
    pub fallback_models: Vec<String>,
    /// Timeout for a single HTTP request, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_api_base() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama2".to_string()
}

fn default_fallback_models() -> Vec<String> {
    vec!["llama2".to_string(), "mistral".to_string(), "phi".to_string()]
}

fn default_request_timeout() -> u64 {
    120
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            default_model: default_model(),
            fallback_models: default_fallback_models(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Session storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory of the file-backed key-value store
    #[serde(default = "default_storage_dir")]
    pub dir: String,
    /// Key holding the session collection
    #[serde(default = "default_chats_key")]
    pub chats_key: String,
    /// Key holding the last selected model
    #[serde(default = "default_model_key")]
    pub model_key: String,
}

fn default_storage_dir() -> String {
    "~/.ollama-chat/storage".to_string()
}

fn default_chats_key() -> String {
    CHATS_KEY.to_string()
}

fn default_model_key() -> String {
    SELECTED_MODEL_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
            chats_key: default_chats_key(),
            model_key: default_model_key(),
        }
    }
}

impl StorageConfig {
    /// Storage directory with `~` expanded
    pub fn resolved_dir(&self) -> PathBuf {
        expand_home(&self.dir)
    }

    /// Storage slot names for the session store
    pub fn keys(&self) -> StorageKeys {
        StorageKeys {
            chats: self.chats_key.clone(),
            model: self.model_key.clone(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Directory for log files
    #[serde(default = "default_log_dir")]
    pub dir: String,
    /// Module-specific overrides
    #[serde(default)]
    pub overrides: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            dir: default_log_dir(),
            overrides: HashMap::new(),
        }
    }
}
