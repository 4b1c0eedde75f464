//! Listener lifecycle errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the service runner.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum RunnerError {
    /// Port in use or permission denied
    #[error("Failed to bind {addr}: {message}")]
    Bind { addr: String, message: String },

    /// Listener may only bind the loopback interface
    #[error("Refusing to bind non-loopback address {addr}")]
    NotLoopback { addr: String },

    /// `start` called while a listener is already serving
    #[error("Relay service already running on {addr}")]
    AlreadyRunning { addr: String },

    /// Background listener task ended abnormally
    #[error("Relay service task failed: {message}")]
    Join { message: String },
}
