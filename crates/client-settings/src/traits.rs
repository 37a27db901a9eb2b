//! Settings store trait definitions.

use crate::SettingsResult;

/// Trait for grouped key-value settings backends.
///
/// `set` must be durable before it returns: a value written here survives a
/// process restart.
pub trait SettingsStore: Send + Sync {
    /// Store a value under `group`/`key`, overwriting any previous value.
    fn set(&self, group: &str, key: &str, value: &str) -> SettingsResult<()>;

    /// Retrieve the value under `group`/`key`.
    fn get(&self, group: &str, key: &str) -> SettingsResult<Option<String>>;

    /// Delete the value under `group`/`key`. Returns whether it existed.
    fn remove(&self, group: &str, key: &str) -> SettingsResult<bool>;

    /// List every key currently stored in `group`.
    fn keys(&self, group: &str) -> SettingsResult<Vec<String>>;

    /// Check if a key exists in `group`.
    fn has(&self, group: &str, key: &str) -> SettingsResult<bool> {
        Ok(self.get(group, key)?.is_some())
    }
}
