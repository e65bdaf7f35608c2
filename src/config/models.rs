//! Configuration data models
//!
//! This module defines the data structures persisted by the drawer engine.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::gestures::GestureSlot;

/// Top-level drawer configuration
///
/// Fields default individually, so a config file written by an older build
/// (or hand-edited down to a subset) still loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawerConfig {
    /// Wire keys the user has hidden from the app list
    pub hidden_apps: BTreeSet<String>,
    /// User-chosen label shorthands, keyed by component identifier
    ///
    /// Component-keyed rather than wire-key-keyed, so a rename follows the
    /// app across user profiles.
    pub label_overrides: BTreeMap<String, String>,
    /// List presentation preferences
    pub preferences: ListPreferences,
}

/// List presentation preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListPreferences {
    /// Sort Z to A instead of A to Z
    pub inverted_order: bool,
    /// Skip icon resolution entirely
    pub hide_icons: bool,
    /// Stored gesture action values per slot
    pub gestures: BTreeMap<GestureSlot, String>,
}

impl Default for DrawerConfig {
    fn default() -> Self {
        Self {
            hidden_apps: BTreeSet::new(),
            label_overrides: BTreeMap::new(),
            preferences: ListPreferences::default(),
        }
    }
}

impl Default for ListPreferences {
    fn default() -> Self {
        Self {
            inverted_order: false,
            hide_icons: false,
            gestures: BTreeMap::new(),
        }
    }
}

impl DrawerConfig {
    /// Whether a wire key is in the exclusion set
    pub fn is_hidden(&self, key: &str) -> bool {
        self.hidden_apps.contains(key)
    }

    /// Shorthand for a component, if one is set
    pub fn shorthand_for(&self, component: &str) -> Option<&str> {
        self.label_overrides.get(component).map(String::as_str)
    }

    /// Set or clear the shorthand for a component
    pub fn set_shorthand(&mut self, component: &str, shorthand: Option<&str>) {
        match shorthand {
            Some(value) => {
                self.label_overrides
                    .insert(component.to_string(), value.to_string());
            }
            None => {
                self.label_overrides.remove(component);
            }
        }
    }
}
