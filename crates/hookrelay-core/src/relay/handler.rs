//! Trigger handling: reload config, check the toggle, forward a GET.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reqwest::Client;
use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use hookrelay_types::{RelayConfig, RelayError};

use crate::modules::config::ConfigStore;

/// Upper bound for the forwarded GET.
pub const RELAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Body returned while the relay is switched off.
pub const DISABLED_BODY: &str = "Service disabled";

/// Result of one trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Toggle is off; nothing was sent.
    Disabled,
    /// The target answered. Any status counts, only the transport is checked.
    Forwarded { target_url: String, status: u16 },
    /// Transport failure or config reload failure.
    Failed(RelayError),
}

impl RelayOutcome {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayOutcome::Disabled | RelayOutcome::Forwarded { .. } => StatusCode::OK,
            RelayOutcome::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> String {
        match self {
            RelayOutcome::Disabled => DISABLED_BODY.to_string(),
            RelayOutcome::Forwarded { target_url, status } => {
                format!("GET request sent to {}, status: {}", target_url, status)
            },
            RelayOutcome::Failed(e) => format!("Error: {}", e),
        }
    }
}

impl IntoResponse for RelayOutcome {
    fn into_response(self) -> Response {
        (self.status_code(), self.body()).into_response()
    }
}

/// Per-request relay logic.
///
/// Cheap to clone; every clone shares the store and the connection pool.
/// Nothing mutable is held across requests besides the store itself.
#[derive(Debug, Clone)]
pub struct RelayHandler {
    store: Arc<ConfigStore>,
    client: Client,
    timeout: Duration,
}

impl RelayHandler {
    pub fn new(store: Arc<ConfigStore>, client: Client) -> Self {
        Self::with_timeout(store, client, RELAY_TIMEOUT)
    }

    pub fn with_timeout(store: Arc<ConfigStore>, client: Client, timeout: Duration) -> Self {
        Self { store, client, timeout }
    }

    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    pub async fn handle_trigger(&self) -> RelayOutcome {
        let config = match self.reload_config().await {
            Ok(config) => config,
            Err(e) => {
                warn!("❌ Trigger rejected: {}", e);
                return RelayOutcome::Failed(e);
            },
        };

        if !config.enabled {
            debug!("Trigger ignored, relay disabled");
            return RelayOutcome::Disabled;
        }

        self.forward(&config.target_url).await
    }

    /// Send the GET to `target_url` and classify the result.
    pub async fn forward(&self, target_url: &str) -> RelayOutcome {
        match self.client.get(target_url).timeout(self.timeout).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                info!("📤 Forwarded trigger to {} ({})", target_url, status);
                RelayOutcome::Forwarded { target_url: target_url.to_string(), status }
            },
            Err(e) => {
                let error = classify_error(target_url, &e, self.timeout);
                warn!("❌ Forward to {} failed: {}", target_url, error);
                RelayOutcome::Failed(error)
            },
        }
    }

    async fn reload_config(&self) -> Result<RelayConfig, RelayError> {
        let store = self.store.clone();
        match tokio::task::spawn_blocking(move || store.reload()).await {
            Ok(Ok(config)) => Ok(config),
            Ok(Err(e)) => Err(RelayError::Config { message: e.to_string() }),
            Err(e) => Err(RelayError::Config { message: format!("spawn_blocking panicked: {e}") }),
        }
    }
}

fn classify_error(target_url: &str, err: &reqwest::Error, timeout: Duration) -> RelayError {
    let target_url = target_url.to_string();
    if err.is_timeout() {
        RelayError::Timeout { target_url, duration_ms: millis(timeout) }
    } else if err.is_connect() {
        RelayError::Connect { target_url, message: error_chain(err) }
    } else {
        RelayError::Request { target_url, message: error_chain(err) }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Flatten an error and its sources into one line.
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
