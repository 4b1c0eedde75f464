//! Persisted relay configuration.
//!
//! [`ConfigStore`] owns one JSON file and the in-memory copy of its record.
//! A single mutex guards both, so a toggle from the UI shell and a reload from
//! the relay handler never interleave a half-applied write.

use parking_lot::Mutex;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

use hookrelay_types::models::CONFIG_FILE;
use hookrelay_types::{ConfigError, ConfigKey, ConfigValue, RelayConfig};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Load the record at `path`, bootstrapping defaults when it is missing or unusable.
///
/// A file that is not a JSON object is logged and replaced by a fresh default
/// record. A file that parses keeps every valid field; fields with a wrong type
/// or an invalid value fall back to their defaults and the healed record is
/// written back. Only a failure to persist reaches the caller.
pub fn load_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    match read_config(path) {
        Ok(Some((config, healed))) if healed.is_empty() => Ok(config),
        Ok(Some((config, healed))) => {
            let keys: Vec<&str> = healed.iter().map(ConfigKey::as_str).collect();
            warn!("⚠️ Config at {} had invalid {:?}, using defaults", path.display(), keys);
            save_config(path, &config)?;
            Ok(config)
        },
        Ok(None) => {
            info!("📝 No config at {}, creating defaults", path.display());
            bootstrap(path)
        },
        Err(e) if e.is_recoverable() => {
            warn!("⚠️ Config at {} unusable ({}), regenerating defaults", path.display(), e);
            bootstrap(path)
        },
        Err(e) => Err(e),
    }
}

fn bootstrap(path: &Path) -> Result<RelayConfig, ConfigError> {
    let config = RelayConfig::default();
    save_config(path, &config)?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<Option<(RelayConfig, Vec<ConfigKey>)>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ConfigError::read_error(path.display().to_string(), &e)),
    };

    let value: Value =
        serde_json::from_str(&content).map_err(|e| ConfigError::from_json_error(&e))?;
    let Value::Object(fields) = value else {
        return Err(ConfigError::ParseError { message: "expected a JSON object".to_string() });
    };

    heal_record(fields).map(Some)
}

/// Drop known fields that fail to deserialize or validate so their defaults apply.
fn heal_record(
    mut fields: Map<String, Value>,
) -> Result<(RelayConfig, Vec<ConfigKey>), ConfigError> {
    let mut healed = Vec::new();
    for key in ConfigKey::ALL {
        let Some(value) = fields.get(key.as_str()) else { continue };

        let single = Map::from_iter([(key.as_str().to_string(), value.clone())]);
        let usable = serde_json::from_value::<RelayConfig>(Value::Object(single))
            .ok()
            .is_some_and(|candidate| candidate.validate_record().is_ok());
        if !usable {
            fields.remove(key.as_str());
            healed.push(key);
        }
    }

    let config: RelayConfig = serde_json::from_value(Value::Object(fields))
        .map_err(|e| ConfigError::from_json_error(&e))?;
    config.validate_record()?;
    Ok((config, healed))
}

/// Write the full record to `path`.
///
/// The content goes to a unique sibling temp file first and is renamed over the
/// target, so a concurrent loader sees either the old or the new record.
pub fn save_config(path: &Path, config: &RelayConfig) -> Result<(), ConfigError> {
    let path_str = path.display().to_string();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ConfigError::write_error(&path_str, &e))?;
    }

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| ConfigError::WriteError { path: path_str.clone(), message: e.to_string() })?;

    let temp_path = temp_path_for(path);
    fs::write(&temp_path, content).map_err(|e| ConfigError::write_error(&path_str, &e))?;
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(ConfigError::write_error(&path_str, &e));
    }

    debug!("Saved config to {}", path_str);
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| CONFIG_FILE.to_string());
    let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.with_file_name(format!(".{}.{}.{}.tmp", file_name, std::process::id(), n))
}

/// Shared handle to the persisted relay configuration.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    record: Mutex<RelayConfig>,
}

impl ConfigStore {
    /// Open the store at `path`, creating the file with defaults if needed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let record = load_config(&path)?;
        Ok(Self { path, record: Mutex::new(record) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted record without replacing the in-memory copy.
    ///
    /// Like [`load_config`], a missing or unusable file is rewritten on disk, so
    /// after such a heal the file may differ from [`snapshot`](Self::snapshot)
    /// until the next [`reload`](Self::reload).
    pub fn load(&self) -> Result<RelayConfig, ConfigError> {
        let _guard = self.record.lock();
        load_config(&self.path)
    }

    /// Persist `config` and make it the in-memory record.
    pub fn save(&self, config: &RelayConfig) -> Result<(), ConfigError> {
        let mut guard = self.record.lock();
        save_config(&self.path, config)?;
        *guard = config.clone();
        Ok(())
    }

    pub fn get(&self, key: ConfigKey) -> ConfigValue {
        self.record.lock().get(key)
    }

    /// Update one field and persist immediately.
    ///
    /// Memory is only updated once the write succeeded, so a failed save
    /// leaves the store exactly as it was.
    pub fn set(&self, key: ConfigKey, value: ConfigValue) -> Result<(), ConfigError> {
        self.update(|config| config.apply(key, value)).map(|_| ())
    }

    /// Apply several edits as one persisted write.
    pub fn update<F>(&self, updater: F) -> Result<RelayConfig, ConfigError>
    where
        F: FnOnce(&mut RelayConfig) -> Result<(), ConfigError>,
    {
        let mut guard = self.record.lock();
        let mut candidate = guard.clone();
        updater(&mut candidate)?;
        candidate.validate_record()?;
        save_config(&self.path, &candidate)?;
        *guard = candidate.clone();
        Ok(candidate)
    }

    /// Re-read the persisted record and replace in-memory state with it.
    pub fn reload(&self) -> Result<RelayConfig, ConfigError> {
        let mut guard = self.record.lock();
        let config = load_config(&self.path)?;
        *guard = config.clone();
        Ok(config)
    }

    /// Clone of the in-memory record.
    pub fn snapshot(&self) -> RelayConfig {
        self.record.lock().clone()
    }
}

/// `config.json` under the current working directory.
pub fn default_config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join(CONFIG_FILE)
}
