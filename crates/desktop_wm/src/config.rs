//! Runtime configuration for the window-manager context.

use platform_host::{load_json_with, KeyValueStore};
use serde::{Deserialize, Serialize};

use crate::{model::GridSettings, persistence::SESSION_STORAGE_KEY};

/// Preference key holding an optional JSON [`RuntimeConfig`] override.
pub const RUNTIME_CONFIG_KEY: &str = "desktop.wm.config.v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuntimeConfig {
    /// Storage key for the session document.
    pub storage_key: String,
    /// Write a session snapshot after every applied transition.
    pub persist_session: bool,
    /// Run the invariant checker after every transition and panic on violations.
    pub check_invariants: bool,
    /// Grid settings installed at startup, before any session restore.
    pub grid: GridSettings,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            storage_key: SESSION_STORAGE_KEY.to_string(),
            persist_session: true,
            check_invariants: cfg!(debug_assertions),
            grid: GridSettings::default(),
        }
    }
}

/// Loads the config override stored under [`RUNTIME_CONFIG_KEY`], falling back to defaults.
///
/// Missing fields take their default values; an unreadable or malformed override is logged and
/// ignored.
pub fn load_runtime_config<S: KeyValueStore + ?Sized>(store: &S) -> RuntimeConfig {
    match load_json_with::<S, RuntimeConfig>(store, RUNTIME_CONFIG_KEY) {
        Ok(Some(config)) => config,
        Ok(None) => RuntimeConfig::default(),
        Err(err) => {
            leptos::logging::warn!("runtime config load failed, using defaults: {err}");
            RuntimeConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use platform_host::MemoryKeyValueStore;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_override_uses_defaults() {
        let store = MemoryKeyValueStore::default();
        assert_eq!(load_runtime_config(&store), RuntimeConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let store = MemoryKeyValueStore::with_item(
            RUNTIME_CONFIG_KEY,
            r#"{"persistSession":false,"grid":{"snapEnabled":true,"gridSize":8}}"#,
        );
        let config = load_runtime_config(&store);
        assert!(!config.persist_session);
        assert_eq!(
            config.grid,
            GridSettings {
                snap_enabled: true,
                grid_size: 8
            }
        );
        assert_eq!(config.storage_key, SESSION_STORAGE_KEY);
    }

    #[test]
    fn malformed_override_falls_back() {
        let store = MemoryKeyValueStore::with_item(RUNTIME_CONFIG_KEY, "not json");
        assert_eq!(load_runtime_config(&store), RuntimeConfig::default());
    }
}
