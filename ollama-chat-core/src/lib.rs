//! Core types and services for ollama-chat
//!
//! This crate provides the content parser, the session store with its
//! key-value persistence, configuration, logging and shared error types
//! used by the other ollama-chat crates.

pub mod config;
pub mod content;
pub mod error;
pub mod logging;
pub mod session;
pub mod storage;
pub mod utils;

pub use error::{Error, Result};
