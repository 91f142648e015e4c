//! Per-session request state

/// Where a session's outbound chat request stands
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    /// Nothing in flight
    #[default]
    Idle,
    /// Waiting for the inference server
    Pending,
    /// The last request failed; holds the text to show the user
    Failed(String),
}

impl RequestState {
    /// Whether a request is in flight
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending)
    }

    /// Error text of a failed request
    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Failed(reason) => Some(reason.as_str()),
            _ => None,
        }
    }
}
