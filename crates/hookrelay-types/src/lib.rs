//! # Hook Relay Types
//!
//! Core types, models, and error definitions for Hook Relay.
//!
//! - **`error`** - Typed error hierarchy for config persistence, relaying and the listener
//! - **`models`** - The persisted relay configuration record and its keys/values
//!
//! ## Architecture Role
//!
//! `hookrelay-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!      hookrelay-types (this crate)
//!               │
//!               ▼
//!        hookrelay-core
//!               │
//!               ▼
//!       hookrelay-server
//! ```

pub mod error;
pub mod models;

// Re-export error types for convenience
pub use error::{ConfigError, RelayError, Result, RunnerError, TypedError};

// Re-export core model types
pub use models::{ConfigKey, ConfigValue, RelayConfig, ServiceState};
