//! Configuration manager for loading and saving drawer configuration
//!
//! Loads and saves `$XDG_CONFIG_HOME/appdrawer/config.json` with atomic
//! writes to prevent corruption.

use crate::config::models::DrawerConfig;
use crate::error::{DrawerError, Result, StringError};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tracing::{info, warn};

/// Configuration manager
pub struct ConfigManager;

impl ConfigManager {
    /// Get the path to the configuration file
    ///
    /// Returns `$XDG_CONFIG_HOME/appdrawer/config.json`, falling back to
    /// `$HOME/.config` and finally the working directory.
    pub fn config_path() -> PathBuf {
        let base = std::env::var("XDG_CONFIG_HOME").map_or_else(
            |_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".config")
            },
            PathBuf::from,
        );
        base.join("appdrawer").join("config.json")
    }

    /// Ensure the configuration directory exists
    pub fn ensure_config_dir() -> Result<PathBuf> {
        let config_path = Self::config_path();
        let config_dir = config_path
            .parent()
            .ok_or_else(|| DrawerError::ConfigError(StringError::new("invalid config path")))?;

        std::fs::create_dir_all(config_dir)?;
        Ok(config_dir.to_path_buf())
    }

    /// Load configuration from disk
    ///
    /// If the configuration file doesn't exist or is corrupt, returns the
    /// default configuration.
    pub fn load() -> Result<DrawerConfig> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            info!("configuration file not found, using defaults");
            return Ok(DrawerConfig::default());
        }

        let json = std::fs::read_to_string(&config_path)?;

        match serde_json::from_str(&json) {
            Ok(config) => {
                info!("configuration loaded from {}", config_path.display());
                Ok(config)
            }
            Err(e) => {
                warn!("failed to parse configuration, using defaults: {e}");
                Ok(DrawerConfig::default())
            }
        }
    }

    /// Save configuration to disk with an atomic write
    ///
    /// Serializes into a temporary file in the config directory and persists
    /// it over the real path, so a crash mid-write never leaves a truncated
    /// config behind.
    pub fn save(config: &DrawerConfig) -> Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = Self::config_path();

        let json = serde_json::to_string_pretty(config)?;
        let mut temp = NamedTempFile::new_in(&config_dir)?;
        temp.write_all(json.as_bytes())?;
        temp.persist(&config_path)
            .map_err(|e| DrawerError::IoError(e.error))?;

        info!("configuration saved to {}", config_path.display());
        Ok(())
    }
}
