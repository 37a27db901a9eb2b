//! Configuration management for the client.

use crate::{CoreResult, Paths};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Default account server URL (can be overridden at compile time via
/// MERIDIAN_ACCOUNT_SERVER_URL env var).
pub const DEFAULT_ACCOUNT_SERVER_URL: &str = match option_env!("MERIDIAN_ACCOUNT_SERVER_URL") {
    Some(url) => url,
    None => "https://data.meridian.place",
};

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Main client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Account server the client authenticates against.
    #[serde(default = "default_account_server_url")]
    pub account_server_url: String,
}

fn default_account_server_url() -> String {
    DEFAULT_ACCOUNT_SERVER_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            account_server_url: DEFAULT_ACCOUNT_SERVER_URL.to_string(),
        }
    }
}

impl Config {
    /// Create a new Config with default values, then override from environment.
    pub fn new() -> Self {
        let mut config = Self::default();
        config.load_from_env();
        config
    }

    /// Load configuration from the config file, falling back to defaults.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.load_from_env();

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the config file.
    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        let config_path = paths.config_file();
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// Override configuration from environment variables.
    /// Only log_level can be overridden at runtime.
    fn load_from_env(&mut self) {
        if let Ok(log_level) = std::env::var("MERIDIAN_LOG_LEVEL") {
            self.log_level = log_level;
        }
    }

    /// Get the account server URL as a parsed URL.
    pub fn account_server_url(&self) -> CoreResult<Url> {
        Ok(Url::parse(&self.account_server_url)?)
    }
}
