//! JSON-file-backed settings store.

use crate::{SettingsError, SettingsResult, SettingsStore};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

type Groups = BTreeMap<String, BTreeMap<String, String>>;

/// Settings store persisted as a single JSON document on disk.
///
/// Every `set`/`remove` rewrites the document and replaces the file
/// atomically (write to a sibling temp file, then rename), so a crash
/// mid-write never leaves a truncated settings file behind.
pub struct FileSettings {
    path: PathBuf,
    groups: Mutex<Groups>,
}

impl FileSettings {
    /// Open the settings file at `path`, starting empty if it does not
    /// exist yet.
    pub fn open(path: PathBuf) -> SettingsResult<Self> {
        let groups = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            Groups::new()
        };

        debug!(path = %path.display(), groups = groups.len(), "Opened settings file");

        Ok(Self {
            path,
            groups: Mutex::new(groups),
        })
    }

    fn lock(&self) -> SettingsResult<MutexGuard<'_, Groups>> {
        self.groups.lock().map_err(|_| SettingsError::Poisoned)
    }

    fn persist(&self, groups: &Groups) -> SettingsResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(groups)?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, content)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl SettingsStore for FileSettings {
    fn set(&self, group: &str, key: &str, value: &str) -> SettingsResult<()> {
        let mut groups = self.lock()?;
        groups
            .entry(group.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        self.persist(&groups)
    }

    fn get(&self, group: &str, key: &str) -> SettingsResult<Option<String>> {
        let groups = self.lock()?;
        Ok(groups.get(group).and_then(|g| g.get(key)).cloned())
    }

    fn remove(&self, group: &str, key: &str) -> SettingsResult<bool> {
        let mut groups = self.lock()?;
        let removed = groups
            .get_mut(group)
            .map(|g| g.remove(key).is_some())
            .unwrap_or(false);
        if removed {
            self.persist(&groups)?;
        }
        Ok(removed)
    }

    fn keys(&self, group: &str) -> SettingsResult<Vec<String>> {
        let groups = self.lock()?;
        Ok(groups
            .get(group)
            .map(|g| g.keys().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_set_get_remove() {
        let dir = tempdir().unwrap();
        let settings = FileSettings::open(dir.path().join("settings.json")).unwrap();

        settings.set("accounts", "server", "value").unwrap();
        assert_eq!(
            settings.get("accounts", "server").unwrap(),
            Some("value".to_string())
        );

        assert!(settings.remove("accounts", "server").unwrap());
        assert!(!settings.remove("accounts", "server").unwrap());
        assert_eq!(settings.get("accounts", "server").unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");

        {
            let settings = FileSettings::open(path.clone()).unwrap();
            settings.set("accounts", "server-a", "token-a").unwrap();
            settings.set("accounts", "server-b", "token-b").unwrap();
        }

        let reopened = FileSettings::open(path).unwrap();
        assert_eq!(
            reopened.get("accounts", "server-a").unwrap(),
            Some("token-a".to_string())
        );
        assert_eq!(
            reopened.get("accounts", "server-b").unwrap(),
            Some("token-b".to_string())
        );
    }

    #[test]
    fn test_keys_lists_only_requested_group() {
        let dir = tempdir().unwrap();
        let settings = FileSettings::open(dir.path().join("settings.json")).unwrap();

        settings.set("accounts", "a", "1").unwrap();
        settings.set("accounts", "b", "2").unwrap();
        settings.set("interface", "c", "3").unwrap();

        let mut keys = settings.keys("accounts").unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);

        assert!(settings.keys("missing").unwrap().is_empty());
    }

    #[test]
    fn test_overwrite_replaces_value() {
        let dir = tempdir().unwrap();
        let settings = FileSettings::open(dir.path().join("settings.json")).unwrap();

        settings.set("accounts", "server", "old").unwrap();
        settings.set("accounts", "server", "new").unwrap();

        assert_eq!(
            settings.get("accounts", "server").unwrap(),
            Some("new".to_string())
        );
        assert_eq!(settings.keys("accounts").unwrap().len(), 1);
    }

    #[test]
    fn test_open_creates_missing_parent_on_first_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let settings = FileSettings::open(path.clone()).unwrap();
        settings.set("accounts", "server", "value").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_values_with_json_like_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let raw = r#"{"token":"abc","nested":{"a":1}}"#;
        {
            let settings = FileSettings::open(path.clone()).unwrap();
            settings.set("accounts", "server", raw).unwrap();
        }

        let reopened = FileSettings::open(path).unwrap();
        assert_eq!(
            reopened.get("accounts", "server").unwrap(),
            Some(raw.to_string())
        );
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            FileSettings::open(path),
            Err(SettingsError::Json(_))
        ));
    }
}
