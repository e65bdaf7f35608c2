//! Installed-package snapshot and set-difference change detection

use std::collections::BTreeSet;

use crate::apps::entry::UserKey;
use crate::platform::PackageQuery;

/// Sorted snapshot of every launchable activity key across user profiles
///
/// Captured through pure reads of [`PackageQuery`]; taking a snapshot never
/// mutates list state. The launcher's own package is excluded at capture
/// time, so it can never appear in the diffable universe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageSnapshot {
    keys: BTreeSet<String>,
}

impl PackageSnapshot {
    /// Capture the currently installed set
    ///
    /// Covers every known user profile, or just the current one when the
    /// platform has no profile support. A failed profile query yields an
    /// empty snapshot; the spurious "everything removed" diff that causes is
    /// corrected by the next successful capture.
    pub fn capture(query: &dyn PackageQuery, self_package: &str) -> Self {
        use tracing::debug;

        let serials = if query.supports_profiles() {
            query.user_profiles()
        } else {
            vec![query.current_serial()]
        };

        let mut keys = BTreeSet::new();
        for serial in serials {
            for component in query.launchable_activities(serial) {
                if component.contains(self_package) {
                    continue;
                }
                keys.insert(UserKey::new(serial, component).to_string());
            }
        }
        debug!("captured {} installed activity keys", keys.len());
        Self { keys }
    }

    /// Build a snapshot from pre-formed wire keys
    pub fn from_keys(keys: impl IntoIterator<Item = String>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// Number of keys in the snapshot
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the snapshot holds no keys
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Whether the snapshot contains a wire key
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Iterate the wire keys in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Changes from `self` (the retained snapshot) to `new` (a fresh capture)
    ///
    /// `added` holds keys present only in `new`, `removed` keys present only
    /// in `self`. The two sets are disjoint by construction.
    pub fn diff(&self, new: &Self) -> SnapshotDiff {
        SnapshotDiff {
            added: new.keys.difference(&self.keys).cloned().collect(),
            removed: self.keys.difference(&new.keys).cloned().collect(),
        }
    }
}

/// Set difference between two snapshots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    /// Keys present only in the new snapshot
    pub added: BTreeSet<String>,
    /// Keys present only in the old snapshot
    pub removed: BTreeSet<String>,
}

impl SnapshotDiff {
    /// Whether the diff carries no changes
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Every changed key exactly once, in sorted order
    pub fn union_keys(&self) -> impl Iterator<Item = &str> {
        self.added.union(&self.removed).map(String::as_str)
    }
}
