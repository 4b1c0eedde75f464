//! Relay service - loopback trigger endpoint and its forwarder
//!
//! - `handler` decides per trigger whether to forward and performs the GET
//! - `server` builds the router and owns the listener lifecycle

pub mod handler;
pub mod server;

pub use handler::{RelayHandler, RelayOutcome, DISABLED_BODY, RELAY_TIMEOUT};
pub use server::{build_relay_router, ServiceRunner, TRIGGER_PATH};
