//! Relay configuration record.
//!
//! The record is the only persisted entity. Every named field has a serde
//! default, so a partial file on disk loads with the missing keys backfilled.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::error::ConfigError;

/// File name used when no explicit config path is given.
pub const CONFIG_FILE: &str = "config.json";
/// Default loopback port for the trigger endpoint.
pub const DEFAULT_PORT: u16 = 8765;
/// Default forward target.
pub const DEFAULT_TARGET_URL: &str = "https://example.com";

/// Persisted relay configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct RelayConfig {
    /// Forward triggers when true
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Loopback port the trigger endpoint listens on
    #[validate(range(min = 1_u16, max = 65535_u16))]
    #[serde(default = "default_port")]
    pub port: u16,
    /// URL that receives the forwarded GET
    #[validate(url)]
    #[serde(default = "default_target_url")]
    pub target_url: String,
    /// Keys this version does not know about, written back untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            port: default_port(),
            target_url: default_target_url(),
            extra: Map::new(),
        }
    }
}

impl RelayConfig {
    /// Run field validation and fold the result into a [`ConfigError`].
    pub fn validate_record(&self) -> Result<(), ConfigError> {
        self.validate().map_err(|errors| {
            let field = errors
                .field_errors()
                .keys()
                .next()
                .map(|k| k.to_string())
                .unwrap_or_else(|| "record".to_string());
            ConfigError::ValidationError { field, message: errors.to_string() }
        })
    }

    /// Read a single field.
    pub fn get(&self, key: ConfigKey) -> ConfigValue {
        match key {
            ConfigKey::Enabled => ConfigValue::Bool(self.enabled),
            ConfigKey::Port => ConfigValue::Port(self.port),
            ConfigKey::TargetUrl => ConfigValue::Url(self.target_url.clone()),
        }
    }

    /// Write a single field. The value variant must match the key.
    pub fn apply(&mut self, key: ConfigKey, value: ConfigValue) -> Result<(), ConfigError> {
        match (key, value) {
            (ConfigKey::Enabled, ConfigValue::Bool(v)) => self.enabled = v,
            (ConfigKey::Port, ConfigValue::Port(v)) => self.port = v,
            (ConfigKey::TargetUrl, ConfigValue::Url(v)) => self.target_url = v,
            (key, _) => {
                return Err(ConfigError::TypeMismatch {
                    key: key.to_string(),
                    expected: key.expected_type().to_string(),
                })
            },
        }
        Ok(())
    }

    /// The subset of the record a UI shell shows.
    pub fn service_state(&self) -> ServiceState {
        ServiceState { enabled: self.enabled, port: self.port }
    }
}

pub const fn default_enabled() -> bool {
    true
}

pub const fn default_port() -> u16 {
    DEFAULT_PORT
}

pub fn default_target_url() -> String {
    DEFAULT_TARGET_URL.to_string()
}

/// Addressable fields of [`RelayConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigKey {
    Enabled,
    Port,
    TargetUrl,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 3] = [ConfigKey::Enabled, ConfigKey::Port, ConfigKey::TargetUrl];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::Enabled => "enabled",
            ConfigKey::Port => "port",
            ConfigKey::TargetUrl => "target_url",
        }
    }

    fn expected_type(&self) -> &'static str {
        match self {
            ConfigKey::Enabled => "boolean",
            ConfigKey::Port => "port number",
            ConfigKey::TargetUrl => "URL",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enabled" => Ok(ConfigKey::Enabled),
            "port" => Ok(ConfigKey::Port),
            "target_url" => Ok(ConfigKey::TargetUrl),
            other => Err(ConfigError::UnknownKey { key: other.to_string() }),
        }
    }
}

/// A typed value for one [`ConfigKey`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Port(u16),
    Url(String),
}

impl ConfigValue {
    /// Parse user input into the value type `key` expects.
    pub fn parse_for(key: ConfigKey, raw: &str) -> Result<Self, ConfigError> {
        let mismatch = || ConfigError::TypeMismatch {
            key: key.to_string(),
            expected: key.expected_type().to_string(),
        };
        match key {
            ConfigKey::Enabled => {
                raw.trim().parse::<bool>().map(ConfigValue::Bool).map_err(|_| mismatch())
            },
            ConfigKey::Port => {
                raw.trim().parse::<u16>().map(ConfigValue::Port).map_err(|_| mismatch())
            },
            ConfigKey::TargetUrl => Ok(ConfigValue::Url(raw.trim().to_string())),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(v) => write!(f, "{}", v),
            ConfigValue::Port(v) => write!(f, "{}", v),
            ConfigValue::Url(v) => f.write_str(v),
        }
    }
}

/// Snapshot handed to the UI shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceState {
    pub enabled: bool,
    pub port: u16,
}
