//! Chat controller for ollama-chat
//!
//! Ties the session store to an inference provider: appends user input,
//! runs the completion request and records the reply, tracking request
//! state separately for every session.

pub mod controller;
pub mod error;
pub mod request_state;

pub use controller::ChatController;
pub use error::ChatError;
pub use request_state::RequestState;
