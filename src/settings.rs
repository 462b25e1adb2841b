//! Engine settings
//!
//! Persisted separately from the session snapshot, under its own key.

use serde::{Deserialize, Serialize};

use crate::consts::{SESSION_KEY, SETTINGS_KEY};
use crate::platform::KeyValueStore;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Key the session snapshot is stored under
    pub storage_key: String,

    /// Hard cap on hints per puzzle. `None` means hints are limited only by
    /// the number of distinct vowels in the passage.
    pub max_hints: Option<u32>,

    /// Every puzzle is playable from the start. When off, only the first is,
    /// and solving a puzzle unlocks the next one.
    pub unlock_all: bool,

    /// Snapshot to the store after every mutation
    pub autosave: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_key: SESSION_KEY.to_string(),
            max_hints: None,
            unlock_all: true,
            autosave: true,
        }
    }
}

impl Settings {
    /// Load settings from the store, falling back to defaults
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(SETTINGS_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring malformed settings: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Could not read settings: {}", e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to the store (best-effort)
    pub fn save(&self, store: &impl KeyValueStore) {
        if let Ok(json) = serde_json::to_string(self) {
            match store.set(SETTINGS_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Could not save settings: {}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;

    #[test]
    fn test_defaults_when_absent_or_malformed() {
        let store = MemoryStore::new();
        assert_eq!(Settings::load(&store), Settings::default());

        store.set(SETTINGS_KEY, "not json").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        let settings = Settings {
            max_hints: Some(3),
            unlock_all: false,
            ..Default::default()
        };
        settings.save(&store);
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let store = MemoryStore::new();
        store.set(SETTINGS_KEY, r#"{"max_hints": 2}"#).unwrap();
        let settings = Settings::load(&store);
        assert_eq!(settings.max_hints, Some(2));
        assert_eq!(settings.storage_key, SESSION_KEY);
        assert!(settings.unlock_all);
    }
}
