use anyhow::{Context, Result};
use colored::Colorize;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use hookrelay_core::relay::{RELAY_TIMEOUT, TRIGGER_PATH};
use hookrelay_core::{ConfigStore, ToggleController};

use crate::cli::ConfigCommands;
use crate::config_commands;

const PROBE_TIMEOUT: Duration = Duration::from_millis(500);

pub fn handle_config_command(store: &ConfigStore, cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Show { json } => config_commands::show_config(store, json),
        ConfigCommands::Get { key } => {
            println!("{}", config_commands::get_config_value(store, &key)?);
            Ok(())
        },
        ConfigCommands::Set { key, value } => {
            let value = config_commands::set_config_value(store, &key, &value)?;
            println!("{} Config updated: {} = {}", "✓".green(), key, value);
            Ok(())
        },
    }
}

pub async fn handle_status(store: Arc<ConfigStore>, json: bool) -> Result<()> {
    let controller = ToggleController::new(store.clone());
    let state = controller.get_state();
    let config = store.snapshot();
    let listening = is_listening(state.port).await;

    if json {
        let status = serde_json::json!({
            "enabled": state.enabled,
            "port": state.port,
            "target_url": config.target_url,
            "listening": listening,
            "config_path": store.path().display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    let label = controller.status_label();
    let label = if state.enabled { label.green().bold() } else { label.red().bold() };
    println!("{}", label);
    println!("  Port: {}", state.port);
    println!("  Target: {}", config.target_url);
    println!("  Listener: {}", if listening { "up".green() } else { "down".yellow() });
    println!("  Config: {}", store.path().display());
    println!("  Version: {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}

pub fn handle_toggle(controller: &ToggleController) -> Result<()> {
    let enabled = controller.toggle()?;
    print_switch(enabled);
    Ok(())
}

pub fn handle_set_enabled(controller: &ToggleController, enabled: bool) -> Result<()> {
    controller.set_enabled(enabled)?;
    print_switch(enabled);
    Ok(())
}

fn print_switch(enabled: bool) {
    if enabled {
        println!("{} Relay enabled", "✓".green());
    } else {
        println!("{} Relay disabled", "✓".red());
    }
}

pub async fn handle_trigger(store: &ConfigStore) -> Result<()> {
    let port = store.snapshot().port;
    let (status, body) = send_trigger(port).await?;
    let status_text = status.to_string();
    let status_text = if status < 400 { status_text.green() } else { status_text.red() };
    println!("[{}] {}", status_text, body);
    Ok(())
}

/// POST to the local trigger endpoint and return `(status, body)`.
pub async fn send_trigger(port: u16) -> Result<(u16, String)> {
    let client = reqwest::Client::builder()
        .timeout(RELAY_TIMEOUT + Duration::from_secs(5))
        .build()?;
    let url = format!("http://{}:{}{}", Ipv4Addr::LOCALHOST, port, TRIGGER_PATH);
    let response = client
        .post(&url)
        .send()
        .await
        .with_context(|| format!("No relay answering at {} (is `hookrelay serve` running?)", url))?;
    let status = response.status().as_u16();
    let body = response.text().await?;
    Ok((status, body))
}

async fn is_listening(port: u16) -> bool {
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    matches!(
        tokio::time::timeout(PROBE_TIMEOUT, tokio::net::TcpStream::connect(addr)).await,
        Ok(Ok(_))
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_helpers::test_store;
    use hookrelay_core::{RelayHandler, ServiceRunner};
    use hookrelay_types::{ConfigKey, ConfigValue};

    fn free_port() -> u16 {
        std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port()
    }

    #[tokio::test]
    async fn test_send_trigger_reaches_running_relay() {
        let (store, _tmp) = test_store();
        store.set(ConfigKey::Enabled, ConfigValue::Bool(false)).unwrap();
        store.set(ConfigKey::Port, ConfigValue::Port(free_port())).unwrap();

        let runner = ServiceRunner::new(RelayHandler::new(store.clone(), reqwest::Client::new()));
        let addr = runner.start().await.unwrap();
        assert!(is_listening(addr.port()).await);

        let (status, body) = send_trigger(addr.port()).await.unwrap();
        assert_eq!(status, 200);
        assert_eq!(body, "Service disabled");

        runner.stop().await.unwrap();
        assert!(!is_listening(addr.port()).await);
    }

    #[tokio::test]
    async fn test_send_trigger_without_relay_fails() {
        let err = send_trigger(free_port()).await.unwrap_err();
        assert!(err.to_string().contains("No relay answering"));
    }

    #[test]
    fn test_toggle_command_flips_state() {
        let (store, _tmp) = test_store();
        let controller = ToggleController::new(store.clone());

        handle_toggle(&controller).unwrap();
        assert!(!store.load().unwrap().enabled);

        handle_set_enabled(&controller, true).unwrap();
        assert!(store.load().unwrap().enabled);
    }
}
