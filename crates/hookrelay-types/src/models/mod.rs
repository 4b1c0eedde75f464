//! Domain models for Hook Relay.

mod config;

pub use config::{
    default_enabled, default_port, default_target_url, ConfigKey, ConfigValue, RelayConfig,
    ServiceState, CONFIG_FILE, DEFAULT_PORT, DEFAULT_TARGET_URL,
};
