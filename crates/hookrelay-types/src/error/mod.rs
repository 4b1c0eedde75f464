//! Typed error definitions for Hook Relay.
//!
//! Each domain gets its own enum so callers can match on what went wrong:
//!
//! - **`ConfigError`** - reading, validating and persisting the config record
//! - **`RelayError`** - the forwarded GET to the target URL
//! - **`RunnerError`** - binding and stopping the loopback listener

mod config;
mod relay;
mod runner;

pub use config::ConfigError;
pub use relay::RelayError;
pub use runner::RunnerError;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type that wraps all domain-specific errors.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "domain", content = "error")]
pub enum TypedError {
    /// Wraps a configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Wraps a relay error
    #[error("Relay error: {0}")]
    Relay(#[from] RelayError),

    /// Wraps a listener lifecycle error
    #[error("Runner error: {0}")]
    Runner(#[from] RunnerError),
}

/// Standard Result type using TypedError.
pub type Result<T> = std::result::Result<T, TypedError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = TypedError::Config(ConfigError::WriteError {
            path: "/tmp/config.json".to_string(),
            message: "permission denied".to_string(),
        });

        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("Config"));
        assert!(json.contains("permission denied"));

        let deserialized: TypedError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, deserialized);
    }

    #[test]
    fn test_error_display() {
        let err = RunnerError::Bind {
            addr: "127.0.0.1:8765".to_string(),
            message: "Address already in use".to_string(),
        };

        let msg = format!("{}", TypedError::from(err));
        assert!(msg.contains("127.0.0.1:8765"));
        assert!(msg.contains("already in use"));
    }
}
