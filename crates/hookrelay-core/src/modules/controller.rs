//! Toggle surface for the tray/UI shell.
//!
//! The shell never touches the config file directly; it goes through
//! [`ToggleController`], which shares the same [`ConfigStore`] as the relay.

use std::sync::Arc;
use tracing::info;

use hookrelay_types::{ConfigError, ServiceState};

use super::config::ConfigStore;

/// Display name used in status labels.
pub const SERVICE_NAME: &str = "Hook Relay";

#[derive(Debug, Clone)]
pub struct ToggleController {
    store: Arc<ConfigStore>,
}

impl ToggleController {
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    pub fn get_state(&self) -> ServiceState {
        self.store.snapshot().service_state()
    }

    /// Flip the enabled flag and persist it. Returns the new state.
    pub fn toggle(&self) -> Result<bool, ConfigError> {
        let updated = self.store.update(|config| {
            config.enabled = !config.enabled;
            Ok(())
        })?;
        info!("🔀 Relay {}", status_word(updated.enabled));
        Ok(updated.enabled)
    }

    pub fn set_enabled(&self, enabled: bool) -> Result<(), ConfigError> {
        self.store.update(|config| {
            config.enabled = enabled;
            Ok(())
        })?;
        info!("🔀 Relay {}", status_word(enabled));
        Ok(())
    }

    /// Tooltip text, e.g. `Hook Relay (enabled)`.
    pub fn status_label(&self) -> String {
        format!("{} ({})", SERVICE_NAME, status_word(self.get_state().enabled))
    }
}

pub fn status_word(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use hookrelay_types::models::{CONFIG_FILE, DEFAULT_PORT};
    use tempfile::TempDir;

    fn controller() -> (ToggleController, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(ConfigStore::open(dir.path().join(CONFIG_FILE)).unwrap());
        (ToggleController::new(store), dir)
    }

    #[test]
    fn test_get_state_reports_defaults() {
        let (controller, _dir) = controller();
        assert_eq!(controller.get_state(), ServiceState { enabled: true, port: DEFAULT_PORT });
        assert_eq!(controller.status_label(), "Hook Relay (enabled)");
    }

    #[test]
    fn test_toggle_round_trips_and_persists() {
        let (controller, _dir) = controller();

        assert!(!controller.toggle().unwrap());
        assert!(!controller.store().load().unwrap().enabled);
        assert_eq!(controller.status_label(), "Hook Relay (disabled)");

        assert!(controller.toggle().unwrap());
        assert!(controller.store().load().unwrap().enabled);
    }

    #[test]
    fn test_set_enabled_is_visible_to_other_handles() {
        let (controller, dir) = controller();
        let other = ConfigStore::open(dir.path().join(CONFIG_FILE)).unwrap();

        controller.set_enabled(false).unwrap();
        assert!(!other.reload().unwrap().enabled);
    }
}
