//! Configuration-related errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading or persisting the config record.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ConfigError {
    /// Config file exists but could not be read
    #[error("Config read error at {path}: {message}")]
    ReadError {
        /// Filesystem path of the config file
        path: String,
        /// Description of the IO failure
        message: String,
    },

    /// Config file parse error (JSON)
    #[error("Config parse error: {message}")]
    ParseError {
        /// Description of the parse failure
        message: String,
    },

    /// Config validation error (invalid values)
    #[error("Config validation error for {field}: {message}")]
    ValidationError {
        /// Name of the field that failed validation
        field: String,
        /// Description of the validation failure
        message: String,
    },

    /// Config write error (permission denied, disk full, etc)
    #[error("Config write error at {path}: {message}")]
    WriteError {
        /// Filesystem path that could not be written
        path: String,
        /// Description of the write failure
        message: String,
    },

    /// Value does not fit the key it was assigned to
    #[error("Config key {key} expects a {expected}")]
    TypeMismatch {
        /// Key being assigned
        key: String,
        /// Human-readable expected type
        expected: String,
    },

    /// Key is not part of the config record
    #[error("Unknown config key: {key}")]
    UnknownKey {
        /// The key as given by the caller
        key: String,
    },
}

impl ConfigError {
    /// Create a parse error from a serde_json error.
    pub fn from_json_error(e: &serde_json::Error) -> Self {
        Self::ParseError { message: e.to_string() }
    }

    /// Create a read error from an IO error.
    pub fn read_error(path: impl Into<String>, e: &std::io::Error) -> Self {
        Self::ReadError { path: path.into(), message: e.to_string() }
    }

    /// Create a write error from an IO error.
    pub fn write_error(path: impl Into<String>, e: &std::io::Error) -> Self {
        Self::WriteError { path: path.into(), message: e.to_string() }
    }

    /// Whether load recovers from this error by regenerating defaults.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ReadError { .. } | Self::ParseError { .. } | Self::ValidationError { .. }
        )
    }
}
