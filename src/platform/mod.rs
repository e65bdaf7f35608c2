//! Platform query surface
//!
//! Everything the engine knows about installed packages arrives through the
//! [`PackageQuery`] trait. The engine never talks to an OS package manager
//! directly; a backend implements this trait and the reconciler treats its
//! answers as the ground truth of the moment.
//!
//! # Degradation contract
//!
//! Backends degrade instead of failing: a query that cannot be answered
//! returns an empty `Vec` or `None`, and callers treat that as "nothing
//! there right now". A transient failure therefore produces at worst a
//! temporarily empty list, which the next successful resync corrects.
//!
//! # Backends
//!
//! - [`MemoryPlatform`]: mutable in-memory backend used by tests, benches,
//!   fuzzing, and the sandbox binary.

pub mod memory;

pub use memory::{InstalledApp, MemoryPlatform};

use std::sync::Arc;

/// Opaque icon handle carried on list entries
///
/// The engine moves icons around without inspecting them; decoding and
/// caching happen on the rendering side of the adapter boundary. Cloning is
/// cheap because the bytes are shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconHandle(Arc<[u8]>);

impl IconHandle {
    /// Wrap raw encoded icon bytes
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    /// Borrow the raw encoded bytes
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Resolution of a package name to its launchable entry point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchTarget {
    /// Component identifier of the entry activity, `package/class`
    pub component: String,
    /// Whether the entry activity is a launcher-category entry point
    pub launcher_entry: bool,
}

/// Package part of a `package/class` component identifier
///
/// A component with no `/` separator is treated as a bare package name.
pub fn package_of(component: &str) -> &str {
    component
        .split_once('/')
        .map_or(component, |(package, _)| package)
}

/// Read-only view of the platform's installed packages
///
/// Implementations are shared between the controller thread and background
/// resync workers, so they must be callable concurrently.
pub trait PackageQuery: Send + Sync {
    /// Whether the platform exposes user profiles at all
    fn supports_profiles(&self) -> bool;

    /// Serials of every known user profile, empty on failure
    fn user_profiles(&self) -> Vec<u64>;

    /// Serial of the current (foreground) user profile
    fn current_serial(&self) -> u64;

    /// Component identifiers of launcher-visible activities for one profile
    fn launchable_activities(&self, serial: u64) -> Vec<String>;

    /// Resolve a package name to its launchable entry point, if any
    ///
    /// May succeed for packages whose entry point is not launcher-visible;
    /// [`LaunchTarget::launcher_entry`] distinguishes the two.
    fn launch_target(&self, package: &str) -> Option<LaunchTarget>;

    /// Human-readable label for a component
    fn display_label(&self, component: &str) -> Option<String>;

    /// Icon for a component as seen by one profile
    fn icon(&self, component: &str, serial: u64) -> Option<IconHandle>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_handle_shares_bytes() {
        let icon = IconHandle::new(vec![1u8, 2, 3]);
        let clone = icon.clone();
        assert_eq!(icon, clone);
        assert_eq!(clone.bytes(), &[1, 2, 3]);
    }

    #[test]
    fn test_package_of() {
        assert_eq!(package_of("com.example.mail/.Inbox"), "com.example.mail");
        assert_eq!(
            package_of("com.example.mail/com.example.mail.Inbox"),
            "com.example.mail"
        );
        // Bare package name passes through
        assert_eq!(package_of("com.example.mail"), "com.example.mail");
        // Only the first separator counts
        assert_eq!(package_of("a/b/c"), "a");
    }
}
