//! Gesture action catalog
//!
//! Typed form of the stored gesture bindings. Dispatching an action is the
//! shell's business; the engine only parses, stores, and summarizes them.
//! A stored value containing `/` is a component target and means "launch
//! that app"; every other value names one of the fixed actions.

use serde::{Deserialize, Serialize};

use crate::platform::PackageQuery;

/// Gesture slots a drawer shell can bind actions to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureSlot {
    /// Swipe up on the home screen
    SwipeUp,
    /// Swipe down on the home screen
    SwipeDown,
    /// Double tap on empty space
    DoubleTap,
    /// Pinch in on the home screen
    Pinch,
}

/// Action bound to a gesture slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureAction {
    /// No action bound
    Nothing,
    /// Open the configured gesture handler app
    Handler,
    /// Show the widget panel
    Widget,
    /// Expand the status bar
    StatusBar,
    /// Open the quick-settings panel
    Panel,
    /// Open the app list
    AppList,
    /// Launch a specific app by component identifier
    Launch(String),
}

impl GestureAction {
    /// Parse a stored gesture value
    ///
    /// Unknown values degrade to [`Self::Nothing`] rather than failing, so a
    /// config written by a newer build still loads.
    pub fn parse(value: &str) -> Self {
        if value.contains('/') {
            return Self::Launch(value.to_string());
        }
        match value {
            "handler" => Self::Handler,
            "widget" => Self::Widget,
            "status" => Self::StatusBar,
            "panel" => Self::Panel,
            "list" => Self::AppList,
            _ => Self::Nothing,
        }
    }

    /// Stored string form of the action
    pub fn value(&self) -> &str {
        match self {
            Self::Nothing => "none",
            Self::Handler => "handler",
            Self::Widget => "widget",
            Self::StatusBar => "status",
            Self::Panel => "panel",
            Self::AppList => "list",
            Self::Launch(component) => component,
        }
    }

    /// Human-readable summary of the action
    ///
    /// Launch targets resolve their current label through the platform,
    /// falling back to the raw component when the app is gone.
    pub fn summary(&self, query: &dyn PackageQuery) -> String {
        match self {
            Self::Nothing => "Do nothing".to_string(),
            Self::Handler => "Open gesture handler".to_string(),
            Self::Widget => "Show widgets".to_string(),
            Self::StatusBar => "Expand status bar".to_string(),
            Self::Panel => "Open quick settings".to_string(),
            Self::AppList => "Open app list".to_string(),
            Self::Launch(component) => query
                .display_label(component)
                .unwrap_or_else(|| component.clone()),
        }
    }
}

/// One row of the gesture app picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerEntry {
    /// Human label shown to the user
    pub label: String,
    /// Stored value for the selection
    pub value: String,
}

/// Entries for the gesture app picker
///
/// The fixed "do nothing" entry comes first, then every launchable app on
/// the current profile sorted case-insensitively by label. The launcher
/// itself is excluded.
pub fn app_picker_entries(query: &dyn PackageQuery, self_package: &str) -> Vec<PickerEntry> {
    let serial = query.current_serial();
    let mut apps: Vec<PickerEntry> = query
        .launchable_activities(serial)
        .into_iter()
        .filter(|component| !component.contains(self_package))
        .map(|component| {
            let label = query
                .display_label(&component)
                .unwrap_or_else(|| component.clone());
            PickerEntry {
                label,
                value: component,
            }
        })
        .collect();
    apps.sort_by_key(|e| e.label.to_lowercase());

    let mut entries = vec![PickerEntry {
        label: "Do nothing".to_string(),
        value: GestureAction::Nothing.value().to_string(),
    }];
    entries.append(&mut apps);
    entries
}
