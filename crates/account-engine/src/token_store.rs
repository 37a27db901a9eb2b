//! In-memory token mapping backed by the persistent settings store.

use crate::{AccountInfo, AccountResult};
use client_settings::SettingsStore;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Settings group that holds persisted accounts.
pub const ACCOUNTS_GROUP: &str = "accounts";

/// Sentinel that stands in for "//" in persisted keys. Scheme separators
/// collide with the settings path syntax, so the transform must round-trip
/// exactly.
const SLASH_SENTINEL: &str = "slashslash";

/// Turn a root address into its persisted settings key.
pub fn escape_root_address(address: &str) -> String {
    address.replace("//", SLASH_SENTINEL)
}

/// Recover a root address from its persisted settings key.
pub fn unescape_root_address(key: &str) -> String {
    key.replace(SLASH_SENTINEL, "//")
}

/// Maps account-server root addresses to their stored account info.
///
/// Writes persist synchronously: once `put` returns, the entry survives a
/// process restart.
pub struct TokenStore {
    accounts: HashMap<String, AccountInfo>,
    settings: Arc<dyn SettingsStore>,
}

impl TokenStore {
    /// Open the store and load every persisted account. Malformed entries
    /// are skipped, not fatal.
    pub fn load(settings: Arc<dyn SettingsStore>) -> AccountResult<Self> {
        let mut accounts = HashMap::new();

        for key in settings.keys(ACCOUNTS_GROUP)? {
            let root_address = unescape_root_address(&key);

            let Some(raw) = settings.get(ACCOUNTS_GROUP, &key)? else {
                continue;
            };

            match serde_json::from_str::<AccountInfo>(&raw) {
                Ok(info) => {
                    debug!(root = %root_address, "Found a stored access token");
                    accounts.insert(root_address, info);
                }
                Err(err) => {
                    warn!(root = %root_address, %err, "Skipping malformed stored account");
                }
            }
        }

        Ok(Self { accounts, settings })
    }

    /// The stored info for `root_address`, or the default (invalid) info
    /// when nothing is stored. Never fails.
    pub fn get(&self, root_address: &str) -> AccountInfo {
        self.accounts.get(root_address).cloned().unwrap_or_default()
    }

    /// Insert or overwrite the entry for `root_address`, then persist it
    /// immediately.
    ///
    /// The in-memory insert happens even when persistence fails, so an
    /// unwritable settings file degrades durability, not functionality.
    pub fn put(&mut self, root_address: &str, info: AccountInfo) -> AccountResult<()> {
        let serialized = serde_json::to_string(&info)?;
        self.accounts.insert(root_address.to_string(), info);
        self.settings.set(
            ACCOUNTS_GROUP,
            &escape_root_address(root_address),
            &serialized,
        )?;
        Ok(())
    }

    /// Whether the stored token for `root_address` is non-empty and
    /// unexpired.
    pub fn is_valid(&self, root_address: &str) -> bool {
        self.accounts
            .get(root_address)
            .map(AccountInfo::is_valid)
            .unwrap_or(false)
    }

    /// Number of accounts currently held.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether no accounts are held.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
