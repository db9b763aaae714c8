//! Configuration types for editing sessions.

use crate::error::{EditError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the configuration file under the data root.
pub const CONFIG_FILE: &str = "planedit.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Autosave configuration.
    #[serde(default)]
    pub autosave: AutosaveConfig,

    /// Storage-related configuration.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Session behaviour.
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    /// Load configuration from `<root>/planedit.toml`, or defaults if absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| EditError::ConfigError(format!("failed to read config: {}", e)))?;
            toml::from_str(&content)
                .map_err(|e| EditError::ConfigError(format!("failed to parse config: {}", e)))
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to `<root>/planedit.toml`.
    pub fn save(&self, root: &Path) -> Result<()> {
        let path = root.join(CONFIG_FILE);
        let content = toml::to_string_pretty(self)
            .map_err(|e| EditError::ConfigError(format!("failed to serialize config: {}", e)))?;
        fs::write(&path, content)
            .map_err(|e| EditError::ConfigError(format!("failed to write config: {}", e)))?;
        Ok(())
    }

    /// Resolves the autosave database path against the data root.
    pub fn autosave_db_path(&self, root: &Path) -> PathBuf {
        root.join(&self.storage.autosave_db)
    }
}

/// Autosave configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AutosaveConfig {
    /// Write working copies at all (default: true).
    pub enabled: bool,

    /// Trailing throttle interval in milliseconds (default: 3000).
    pub interval_ms: u64,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: 3000,
        }
    }
}

impl AutosaveConfig {
    /// Returns the throttle interval as a Duration.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Storage-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Autosave database file, relative to the data root.
    pub autosave_db: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            autosave_db: "autosave.redb".to_string(),
        }
    }
}

/// Session behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Prefix marking identifiers of items not yet known to the server.
    pub temp_id_prefix: String,

    /// Always tear down on cancel, even for existing items (default: false).
    pub teardown_on_cancel: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            temp_id_prefix: "tempId-".to_string(),
            teardown_on_cancel: false,
        }
    }
}
