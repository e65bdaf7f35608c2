//! In-memory platform backend
//!
//! A mutable fake of the package manager. Installs and uninstalls are plain
//! value mutations behind a mutex, so test scenarios (and the sandbox binary)
//! can change the installed set while the engine is running and then drive a
//! resync or a broadcast against the new state.

use parking_lot::Mutex;
use std::collections::BTreeMap;

use crate::platform::{IconHandle, LaunchTarget, PackageQuery, package_of};

/// One installed activity in the fake platform
#[derive(Debug, Clone)]
pub struct InstalledApp {
    /// Component identifier, `package/class`
    pub component: String,
    /// Label returned by `display_label`
    pub label: String,
    /// Whether the activity is a launcher-category entry point
    pub launcher_entry: bool,
    /// Encoded icon bytes, `None` for icon-less installs
    pub icon: Option<Vec<u8>>,
}

impl InstalledApp {
    /// New launcher-visible install with no icon
    pub fn new(component: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            label: label.into(),
            launcher_entry: true,
            icon: None,
        }
    }
}

#[derive(Debug)]
struct Inner {
    supports_profiles: bool,
    current_serial: u64,
    profiles: Vec<u64>,
    /// Installed activities per profile serial
    apps: BTreeMap<u64, Vec<InstalledApp>>,
}

/// In-memory [`PackageQuery`] implementation
///
/// Starts with profile support enabled and a single profile with serial 0.
/// Setting an empty profile list simulates a failed profile query.
#[derive(Debug)]
pub struct MemoryPlatform {
    inner: Mutex<Inner>,
}

impl Default for MemoryPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPlatform {
    /// Create an empty platform with one profile (serial 0)
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                supports_profiles: true,
                current_serial: 0,
                profiles: vec![0],
                apps: BTreeMap::new(),
            }),
        }
    }

    /// Toggle profile support
    pub fn set_supports_profiles(&self, value: bool) {
        self.inner.lock().supports_profiles = value;
    }

    /// Replace the known profile serials
    pub fn set_profiles(&self, serials: Vec<u64>) {
        self.inner.lock().profiles = serials;
    }

    /// Change the current (foreground) profile serial
    pub fn set_current_serial(&self, serial: u64) {
        self.inner.lock().current_serial = serial;
    }

    /// Install an activity for one profile
    ///
    /// Reinstalling a component replaces the existing entry, which is how an
    /// app update (new label, new icon) is simulated.
    pub fn install(&self, serial: u64, app: InstalledApp) {
        let mut inner = self.inner.lock();
        let apps = inner.apps.entry(serial).or_default();
        if let Some(existing) = apps.iter_mut().find(|a| a.component == app.component) {
            *existing = app;
        } else {
            apps.push(app);
        }
    }

    /// Remove every activity of a package from every profile
    pub fn uninstall(&self, package: &str) {
        let mut inner = self.inner.lock();
        for apps in inner.apps.values_mut() {
            apps.retain(|a| package_of(&a.component) != package);
        }
    }

    /// Remove every activity of a package from one profile
    pub fn uninstall_for(&self, serial: u64, package: &str) {
        let mut inner = self.inner.lock();
        if let Some(apps) = inner.apps.get_mut(&serial) {
            apps.retain(|a| package_of(&a.component) != package);
        }
    }

    /// Change the label of a component everywhere it is installed
    pub fn relabel(&self, component: &str, label: &str) {
        let mut inner = self.inner.lock();
        for apps in inner.apps.values_mut() {
            for app in apps.iter_mut().filter(|a| a.component == component) {
                app.label = label.to_string();
            }
        }
    }
}

impl PackageQuery for MemoryPlatform {
    fn supports_profiles(&self) -> bool {
        self.inner.lock().supports_profiles
    }

    fn user_profiles(&self) -> Vec<u64> {
        self.inner.lock().profiles.clone()
    }

    fn current_serial(&self) -> u64 {
        self.inner.lock().current_serial
    }

    fn launchable_activities(&self, serial: u64) -> Vec<String> {
        let inner = self.inner.lock();
        inner.apps.get(&serial).map_or_else(Vec::new, |apps| {
            apps.iter()
                .filter(|a| a.launcher_entry)
                .map(|a| a.component.clone())
                .collect()
        })
    }

    fn launch_target(&self, package: &str) -> Option<LaunchTarget> {
        let inner = self.inner.lock();
        // Launcher-category entry points win, matching how a real package
        // manager resolves a launch intent
        let mut fallback = None;
        for apps in inner.apps.values() {
            for app in apps.iter().filter(|a| package_of(&a.component) == package) {
                if app.launcher_entry {
                    return Some(LaunchTarget {
                        component: app.component.clone(),
                        launcher_entry: true,
                    });
                }
                if fallback.is_none() {
                    fallback = Some(LaunchTarget {
                        component: app.component.clone(),
                        launcher_entry: false,
                    });
                }
            }
        }
        fallback
    }

    fn display_label(&self, component: &str) -> Option<String> {
        let inner = self.inner.lock();
        inner
            .apps
            .values()
            .flatten()
            .find(|a| a.component == component)
            .map(|a| a.label.clone())
    }

    fn icon(&self, component: &str, serial: u64) -> Option<IconHandle> {
        let inner = self.inner.lock();
        inner
            .apps
            .get(&serial)?
            .iter()
            .find(|a| a.component == component)
            .and_then(|a| a.icon.as_ref())
            .map(|bytes| IconHandle::new(bytes.clone()))
    }
}
