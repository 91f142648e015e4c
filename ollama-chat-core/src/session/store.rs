//! Session data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::truncate_chars;

/// Title shown for a session before its first user message
pub const DEFAULT_SESSION_TITLE: &str = "New Chat";

/// Maximum number of characters kept from the first message for a title
pub const TITLE_MAX_CHARS: usize = 30;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role (user, assistant)
    pub role: Role,
    /// Message content
    pub content: String,
}

impl ChatMessage {
    /// Create a new chat message
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// A conversation session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: String,
    title: String,
    messages: Vec<ChatMessage>,
    model: String,
    #[serde(default = "Utc::now")]
    created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    updated_at: DateTime<Utc>,
}

impl Session {
    /// Create an empty session bound to `model`
    pub fn new(model: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: DEFAULT_SESSION_TITLE.to_string(),
            messages: Vec::new(),
            model: model.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Unique session id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Messages in append order
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Model the session was created with
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Session creation time
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last update time
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether the session has no messages yet
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append a message. The first user message also names the session.
    pub(crate) fn push(&mut self, message: ChatMessage) {
        if message.role == Role::User && !self.messages.iter().any(|m| m.role == Role::User) {
            self.title = derive_title(&message.content);
        }
        self.messages.push(message);
        self.updated_at = Utc::now();
    }
}

/// Title for a session whose first user message is `content`
pub fn derive_title(content: &str) -> String {
    truncate_chars(content, TITLE_MAX_CHARS)
}
