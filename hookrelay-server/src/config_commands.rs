use anyhow::Result;
use colored::Colorize;

use hookrelay_core::modules::controller::status_word;
use hookrelay_core::ConfigStore;
use hookrelay_types::{ConfigKey, ConfigValue};

pub fn show_config(store: &ConfigStore, json: bool) -> Result<()> {
    let config = store.snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        println!("{}", "Relay Configuration:".cyan().bold());
        println!("  File: {}", store.path().display());
        println!("  Enabled: {}", status_word(config.enabled));
        println!("  Port: {}", config.port);
        println!("  Target URL: {}", config.target_url);
        if !config.extra.is_empty() {
            println!("  Other keys: {}", config.extra.len());
        }
    }
    Ok(())
}

pub fn get_config_value(store: &ConfigStore, key: &str) -> Result<String> {
    let key: ConfigKey = key.parse()?;
    Ok(store.get(key).to_string())
}

pub fn set_config_value(store: &ConfigStore, key: &str, value: &str) -> Result<ConfigValue> {
    let key: ConfigKey = key.parse()?;
    let value = ConfigValue::parse_for(key, value)?;
    store.set(key, value.clone())?;
    Ok(value)
}
