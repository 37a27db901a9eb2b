//! Persistent settings storage for the Meridian client.
//!
//! Settings are grouped key-value pairs (`group -> key -> value`). The
//! account engine keeps its persisted tokens in the `accounts` group; other
//! client subsystems get their own groups. The `SettingsStore` trait is the
//! seam consumers depend on, so tests can swap in an in-memory store.

mod file;
mod traits;

pub use file::FileSettings;
pub use traits::SettingsStore;

use client_config_and_utils::Paths;
use std::sync::Arc;
use thiserror::Error;

/// Error type for settings operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The in-process lock guarding the store was poisoned
    #[error("Settings store lock poisoned")]
    Poisoned,
}

/// Result type for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Open the default file-backed settings store under the client base
/// directory.
pub fn create_settings(paths: &Paths) -> SettingsResult<Arc<dyn SettingsStore>> {
    let settings = FileSettings::open(paths.settings_file())?;
    Ok(Arc::new(settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory store exercising the trait's default methods.
    struct MemoryStore {
        data: Mutex<HashMap<(String, String), String>>,
    }

    impl MemoryStore {
        fn new() -> Self {
            Self {
                data: Mutex::new(HashMap::new()),
            }
        }
    }

    impl SettingsStore for MemoryStore {
        fn set(&self, group: &str, key: &str, value: &str) -> SettingsResult<()> {
            let mut data = self.data.lock().unwrap();
            data.insert((group.to_string(), key.to_string()), value.to_string());
            Ok(())
        }

        fn get(&self, group: &str, key: &str) -> SettingsResult<Option<String>> {
            let data = self.data.lock().unwrap();
            Ok(data.get(&(group.to_string(), key.to_string())).cloned())
        }

        fn remove(&self, group: &str, key: &str) -> SettingsResult<bool> {
            let mut data = self.data.lock().unwrap();
            Ok(data.remove(&(group.to_string(), key.to_string())).is_some())
        }

        fn keys(&self, group: &str) -> SettingsResult<Vec<String>> {
            let data = self.data.lock().unwrap();
            Ok(data
                .keys()
                .filter(|(g, _)| g == group)
                .map(|(_, k)| k.clone())
                .collect())
        }
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();

        store.set("accounts", "server-a", "token-a").unwrap();
        assert_eq!(
            store.get("accounts", "server-a").unwrap(),
            Some("token-a".to_string())
        );

        assert!(store.has("accounts", "server-a").unwrap());
        assert!(!store.has("accounts", "server-b").unwrap());

        assert!(store.remove("accounts", "server-a").unwrap());
        assert!(!store.remove("accounts", "server-a").unwrap());
        assert_eq!(store.get("accounts", "server-a").unwrap(), None);
    }

    #[test]
    fn test_memory_store_groups_are_isolated() {
        let store = MemoryStore::new();

        store.set("accounts", "key", "a").unwrap();
        store.set("interface", "key", "b").unwrap();

        assert_eq!(store.get("accounts", "key").unwrap(), Some("a".to_string()));
        assert_eq!(
            store.get("interface", "key").unwrap(),
            Some("b".to_string())
        );
        assert_eq!(store.keys("accounts").unwrap(), vec!["key".to_string()]);
    }
}
