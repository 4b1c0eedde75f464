//! Relay-related errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while forwarding a trigger to the target URL.
///
/// A non-2xx upstream status is not an error: only the transport is checked.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum RelayError {
    /// Target did not answer within the relay timeout
    #[error("Request to {target_url} timed out after {duration_ms}ms")]
    Timeout { target_url: String, duration_ms: u64 },

    /// Connection could not be established (DNS, refused, TLS)
    #[error("Failed to connect to {target_url}: {message}")]
    Connect { target_url: String, message: String },

    /// Any other request failure, including an unparseable target URL
    #[error("Request to {target_url} failed: {message}")]
    Request { target_url: String, message: String },

    /// Config could not be reloaded before the relay decision
    #[error("Config unavailable: {message}")]
    Config { message: String },
}
