//! Loopback listener for the trigger endpoint.
//!
//! [`ServiceRunner`] is a two-state machine (`Stopped` / `Running`). The
//! listener lives in its own tokio task so the caller (CLI driver or UI event
//! loop) is never blocked by accept or by a slow forward.
//!
//! Shutdown is graceful: `stop()` closes the accept loop at once and then waits
//! for in-flight triggers to finish, each bounded by the relay timeout.

use axum::{extract::State, http::StatusCode, routing::post, Router};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use hookrelay_types::RunnerError;

use super::handler::{RelayHandler, RelayOutcome};
use crate::modules::config::ConfigStore;

/// Route the hook runner posts to.
pub const TRIGGER_PATH: &str = "/trigger";

/// Build the relay router. Only `POST /trigger` is served; everything else is 404.
pub fn build_relay_router(handler: RelayHandler) -> Router<()> {
    Router::new()
        .route(TRIGGER_PATH, post(handle_trigger).fallback(not_found))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(handler)
}

async fn handle_trigger(State(handler): State<RelayHandler>) -> RelayOutcome {
    handler.handle_trigger().await
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

struct RunningService {
    addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
}

enum RunnerState {
    Stopped,
    Running(RunningService),
}

/// Owns the listener lifecycle.
pub struct ServiceRunner {
    store: Arc<ConfigStore>,
    handler: RelayHandler,
    state: Mutex<RunnerState>,
}

impl ServiceRunner {
    pub fn new(handler: RelayHandler) -> Self {
        Self { store: handler.store().clone(), handler, state: Mutex::new(RunnerState::Stopped) }
    }

    /// Bind `127.0.0.1:<configured port>` and start serving.
    pub async fn start(&self) -> Result<SocketAddr, RunnerError> {
        let port = self.store.snapshot().port;
        self.start_on(SocketAddr::from((Ipv4Addr::LOCALHOST, port))).await
    }

    /// Bind `addr` and start serving. Port 0 picks a free port.
    ///
    /// Returns once the socket is bound, so a bind failure is reported here
    /// rather than from the background task.
    pub async fn start_on(&self, addr: SocketAddr) -> Result<SocketAddr, RunnerError> {
        if !addr.ip().is_loopback() {
            return Err(RunnerError::NotLoopback { addr: addr.to_string() });
        }

        let mut state = self.state.lock().await;
        if let RunnerState::Running(running) = &*state {
            return Err(RunnerError::AlreadyRunning { addr: running.addr.to_string() });
        }

        let bind_error = |e: std::io::Error| RunnerError::Bind {
            addr: addr.to_string(),
            message: e.to_string(),
        };
        let listener = TcpListener::bind(addr).await.map_err(bind_error)?;
        let local_addr = listener.local_addr().map_err(bind_error)?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = build_relay_router(self.handler.clone());
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        info!("🌐 Relay listening on http://{}{}", local_addr, TRIGGER_PATH);
        *state = RunnerState::Running(RunningService { addr: local_addr, shutdown_tx, task });
        Ok(local_addr)
    }

    /// Stop accepting, drain in-flight triggers and wait for the task to exit.
    ///
    /// Calling this while stopped does nothing. The state lock is released
    /// before draining, so `is_running()` reports `false` during the drain.
    pub async fn stop(&self) -> Result<(), RunnerError> {
        let previous = std::mem::replace(&mut *self.state.lock().await, RunnerState::Stopped);
        let running = match previous {
            RunnerState::Stopped => {
                debug!("Relay already stopped");
                return Ok(());
            },
            RunnerState::Running(running) => running,
        };

        info!("⏳ Stopping relay on {}...", running.addr);
        let _ = running.shutdown_tx.send(());
        match running.task.await {
            Ok(Ok(())) => {
                info!("🛑 Relay stopped");
                Ok(())
            },
            Ok(Err(e)) => Err(RunnerError::Join { message: e.to_string() }),
            Err(e) => Err(RunnerError::Join { message: e.to_string() }),
        }
    }

    pub async fn is_running(&self) -> bool {
        matches!(&*self.state.lock().await, RunnerState::Running(_))
    }

    pub async fn local_addr(&self) -> Option<SocketAddr> {
        match &*self.state.lock().await {
            RunnerState::Running(running) => Some(running.addr),
            RunnerState::Stopped => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum_test::TestServer;
    use hookrelay_types::models::CONFIG_FILE;
    use hookrelay_types::{ConfigKey, ConfigValue};
    use reqwest::Client;
    use tempfile::TempDir;

    fn test_handler(enabled: bool) -> (RelayHandler, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(ConfigStore::open(dir.path().join(CONFIG_FILE)).unwrap());
        store.set(ConfigKey::Enabled, ConfigValue::Bool(enabled)).unwrap();
        (RelayHandler::new(store, Client::new()), dir)
    }

    #[tokio::test]
    async fn test_disabled_trigger_returns_service_disabled() {
        let (handler, _dir) = test_handler(false);
        let server = TestServer::new(build_relay_router(handler)).unwrap();

        let response = server.post("/trigger").await;

        response.assert_status_ok();
        response.assert_text("Service disabled");
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let (handler, _dir) = test_handler(false);
        let server = TestServer::new(build_relay_router(handler)).unwrap();

        server.get("/health").await.assert_status(StatusCode::NOT_FOUND);
        server.post("/trigger/extra").await.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_wrong_method_on_trigger_is_404() {
        let (handler, _dir) = test_handler(false);
        let server = TestServer::new(build_relay_router(handler)).unwrap();

        server.get("/trigger").await.assert_status(StatusCode::NOT_FOUND);
        server.put("/trigger").await.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_non_loopback_address_is_refused() {
        let (handler, _dir) = test_handler(false);
        let runner = ServiceRunner::new(handler);

        let err = runner.start_on(SocketAddr::from(([0, 0, 0, 0], 0))).await.unwrap_err();
        assert!(matches!(err, RunnerError::NotLoopback { .. }));
        assert!(!runner.is_running().await);
    }

    #[tokio::test]
    async fn test_start_twice_is_an_error() {
        let (handler, _dir) = test_handler(false);
        let runner = ServiceRunner::new(handler);

        let addr = runner.start_on(SocketAddr::from((Ipv4Addr::LOCALHOST, 0))).await.unwrap();
        let err = runner.start_on(SocketAddr::from((Ipv4Addr::LOCALHOST, 0))).await.unwrap_err();
        assert_eq!(err, RunnerError::AlreadyRunning { addr: addr.to_string() });
        assert_eq!(runner.local_addr().await, Some(addr));

        runner.stop().await.unwrap();
        assert!(runner.local_addr().await.is_none());
    }
}
