//! Test helpers for hookrelay-server unit tests.

use std::sync::Arc;

use tempfile::TempDir;

use hookrelay_core::ConfigStore;
use hookrelay_types::models::CONFIG_FILE;

/// Open a `ConfigStore` in a fresh temp dir.
///
/// Returns `(store, TempDir)` — keep `TempDir` alive for the test duration.
pub fn test_store() -> (Arc<ConfigStore>, TempDir) {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let store = ConfigStore::open(temp_dir.path().join(CONFIG_FILE))
        .expect("failed to open test ConfigStore");
    (Arc::new(store), temp_dir)
}
