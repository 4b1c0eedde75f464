//! Hook Relay - loopback trigger relay
//!
//! A small daemon that:
//! - Listens on http://127.0.0.1:<port>/trigger for hook runners
//! - Forwards each trigger as a GET to the configured URL while enabled
//! - Keeps its on/off switch in a JSON config shared with the CLI
//!
//! Default endpoint: http://localhost:8765/trigger

use anyhow::Result;
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config_commands;
mod signals;
#[cfg(test)]
mod test_helpers;

use cli::{Cli, Commands};
use hookrelay_core::modules::config::default_config_path;
use hookrelay_core::{ConfigStore, RelayHandler, ServiceRunner, ToggleController};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log_level)?)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.unwrap_or_else(default_config_path);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(&config_path).await,
        Commands::Status { json } => {
            let store = Arc::new(ConfigStore::open(&config_path)?);
            commands::handle_status(store, json).await
        },
        Commands::Toggle => {
            let controller = ToggleController::new(Arc::new(ConfigStore::open(&config_path)?));
            commands::handle_toggle(&controller)
        },
        cmd @ (Commands::Enable | Commands::Disable) => {
            let enabled = cmd == Commands::Enable;
            let controller = ToggleController::new(Arc::new(ConfigStore::open(&config_path)?));
            commands::handle_set_enabled(&controller, enabled)
        },
        Commands::Config(cmd) => {
            let store = ConfigStore::open(&config_path)?;
            commands::handle_config_command(&store, cmd)
        },
        Commands::Trigger => {
            let store = ConfigStore::open(&config_path)?;
            commands::handle_trigger(&store).await
        },
    }
}

async fn serve(config_path: &Path) -> Result<()> {
    info!("🚀 Hook Relay starting...");

    let store = Arc::new(ConfigStore::open(config_path)?);
    info!("📝 Config loaded from {}", store.path().display());

    let client = reqwest::Client::builder().build()?;
    let runner = ServiceRunner::new(RelayHandler::new(store.clone(), client));
    let addr = runner.start().await?;

    let controller = ToggleController::new(store.clone());
    info!("✅ {} on http://{}/trigger", controller.status_label(), addr);
    info!("🎯 Forwarding to {}", store.snapshot().target_url);

    let reason = signals::wait_for_shutdown().await?;
    info!("🛑 Received {}, shutting down...", reason);

    runner.stop().await?;
    Ok(())
}
