//! Session management for conversation history
//!
//! Sessions are kept newest first and flushed to a key-value store after
//! every change.

pub mod manager;
pub mod store;

pub use manager::{SessionManager, StorageKeys, CHATS_KEY, SELECTED_MODEL_KEY};
pub use store::{derive_title, ChatMessage, Role, Session, DEFAULT_SESSION_TITLE, TITLE_MAX_CHARS};
