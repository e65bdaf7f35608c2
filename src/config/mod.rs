//! Configuration management module
//!
//! This module handles loading, saving, and managing drawer configuration.
//! Configuration is stored in `$XDG_CONFIG_HOME/appdrawer/config.json` with
//! atomic writes to prevent corruption. It carries the hidden-app exclusion
//! set, the user's label shorthands, and the list presentation preferences.

pub mod manager;
pub mod models;

pub use manager::ConfigManager;
pub use models::{DrawerConfig, ListPreferences};
