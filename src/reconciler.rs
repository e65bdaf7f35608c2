//! Package reconciliation core
//!
//! Applies install-state changes to the live app list. Every change, whether
//! a single key from a broadcast or the whole union of a snapshot diff,
//! funnels through [`Reconciler::apply_change`]:
//!
//! 1. Own-package and hidden keys are ignored.
//! 2. The wire key is parsed once, falling back to the current profile's
//!    serial when the prefix is missing or malformed.
//! 3. The matching entry is removed unconditionally.
//! 4. The key's package is probed for a launch target. No target means the
//!    removal stands: a true uninstall.
//! 5. A target means the entry is rebuilt fresh (label, shorthand, icon),
//!    reinserted, and the list re-sorted.
//!
//! The unconditional remove-then-maybe-reinsert collapses install, update,
//! and uninstall into one path: an update is just a removal whose key still
//! resolves. The change kind therefore only matters for logging here, plus
//! the one broadcast branch where an unresolvable removal fans out to every
//! live entry of the package.

use parking_lot::Mutex;
use smallvec::SmallVec;
use std::sync::Arc;

use crate::apps::{AppEntry, PackageSnapshot, UserKey, sort_entries};
use crate::broadcast::{PackageAction, PackageChange};
use crate::config::DrawerConfig;
use crate::platform::{PackageQuery, package_of};

/// What applying one key change did to the live list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// Key belongs to the launcher itself or the exclusion set
    Ignored,
    /// Key was absent and does not resolve; nothing to do
    Unchanged,
    /// Entry removed and the key no longer resolves
    Removed,
    /// Key resolved to an entry that was not previously listed
    Inserted,
    /// Existing entry was rebuilt in place
    Refreshed,
}

/// What handling one broadcast did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastOutcome {
    /// Broadcast named the launcher's own package
    OwnPackage,
    /// A launcher-visible target resolved; the change was applied for it
    Applied(ChangeOutcome),
    /// Unresolvable removal; every live entry of the package was dropped
    PackageRemoved(usize),
    /// Nothing launcher-visible to do
    NotActionable,
}

/// Reconciliation core shared by the controller and resync workers
///
/// Cheap to clone: holds shared handles to the platform and the config plus
/// the launcher's own package identifier.
#[derive(Clone)]
pub struct Reconciler {
    query: Arc<dyn PackageQuery>,
    config: Arc<Mutex<DrawerConfig>>,
    self_package: String,
}

impl Reconciler {
    /// Create a reconciler over the given platform and config handles
    pub fn new(
        query: Arc<dyn PackageQuery>,
        config: Arc<Mutex<DrawerConfig>>,
        self_package: impl Into<String>,
    ) -> Self {
        Self {
            query,
            config,
            self_package: self_package.into(),
        }
    }

    /// Capture a snapshot of the currently installed set
    pub fn capture_snapshot(&self) -> PackageSnapshot {
        PackageSnapshot::capture(self.query.as_ref(), &self.self_package)
    }

    /// Apply one key change to the live list
    ///
    /// `action` describes the signal that carried the key and is used for
    /// logging only; the remove-then-maybe-reinsert path treats all kinds
    /// uniformly.
    pub fn apply_change(
        &self,
        live: &mut Vec<AppEntry>,
        raw_key: &str,
        action: PackageAction,
    ) -> ChangeOutcome {
        use tracing::{debug, info};

        // Clone config to minimize lock hold time
        let config = self.config.lock().clone();

        if raw_key.contains(&self.self_package) || config.is_hidden(raw_key) {
            debug!("ignoring {action:?} for {raw_key}: own package or hidden");
            return ChangeOutcome::Ignored;
        }

        let key = UserKey::parse_or_default(raw_key, self.query.current_serial());

        // Unconditional removal attempt; reinsert only if the key resolves
        let before = live.len();
        live.retain(|entry| entry.key != key);
        let found = live.len() != before;

        if self.query.launch_target(package_of(&key.component)).is_none() {
            if found {
                info!("removed {key}: no longer resolvable");
                return ChangeOutcome::Removed;
            }
            debug!("{action:?} for {key}: absent and unresolvable");
            return ChangeOutcome::Unchanged;
        }

        let entry = self.build_entry(&key, &config);
        // Duplicate keys are skipped, never doubled
        if live.iter().all(|existing| existing.key != entry.key) {
            live.push(entry);
        }
        sort_entries(live, config.preferences.inverted_order);

        if found {
            info!("refreshed {key}");
            ChangeOutcome::Refreshed
        } else {
            info!("inserted {key}");
            ChangeOutcome::Inserted
        }
    }

    /// Apply one package broadcast to the live list
    ///
    /// The add branch requires a launcher-visible entry point and keys it to
    /// the current profile. The removal branch runs only when the package no
    /// longer resolves at all, and then drops every live entry of that
    /// package across profiles.
    pub fn handle_change(
        &self,
        live: &mut Vec<AppEntry>,
        change: &PackageChange,
    ) -> BroadcastOutcome {
        use tracing::{debug, info};

        if change.package.contains(&self.self_package) {
            debug!("ignoring broadcast for own package");
            return BroadcastOutcome::OwnPackage;
        }

        match self.query.launch_target(&change.package) {
            Some(target) if target.launcher_entry => {
                let wire = UserKey::new(self.query.current_serial(), target.component).to_string();
                let outcome = self.apply_change(live, &wire, change.action);
                BroadcastOutcome::Applied(outcome)
            }
            Some(_) => {
                debug!(
                    "{} resolves but is not launcher-visible, leaving list alone",
                    change.package
                );
                BroadcastOutcome::NotActionable
            }
            None if change.action == PackageAction::Removed => {
                let doomed: SmallVec<[String; 4]> = live
                    .iter()
                    .filter(|entry| package_of(&entry.key.component) == change.package)
                    .map(|entry| entry.key.to_string())
                    .collect();
                for wire in &doomed {
                    self.apply_change(live, wire, PackageAction::Removed);
                }
                info!(
                    "removed {} entries for uninstalled package {}",
                    doomed.len(),
                    change.package
                );
                BroadcastOutcome::PackageRemoved(doomed.len())
            }
            None => {
                debug!(
                    "unresolvable {:?} for {}: not actionable",
                    change.action, change.package
                );
                BroadcastOutcome::NotActionable
            }
        }
    }

    /// Materialize a full sorted list from a snapshot
    ///
    /// Per-entry label and icon resolution is the slow part of a full build,
    /// so it runs in parallel; the sort at the end restores determinism.
    pub fn build_entries(&self, snapshot: &PackageSnapshot) -> Vec<AppEntry> {
        use rayon::prelude::*;
        use tracing::info;

        let config = self.config.lock().clone();
        let default_serial = self.query.current_serial();

        let keys: Vec<&str> = snapshot
            .iter()
            .filter(|key| !key.contains(&self.self_package) && !config.is_hidden(key))
            .collect();

        let mut entries: Vec<AppEntry> = keys
            .par_iter()
            .map(|raw| {
                let key = UserKey::parse_or_default(raw, default_serial);
                self.build_entry(&key, &config)
            })
            .collect();
        sort_entries(&mut entries, config.preferences.inverted_order);

        info!(
            "built {} entries from {} snapshot keys",
            entries.len(),
            snapshot.len()
        );
        entries
    }

    /// Resolve one entry fresh from the platform
    ///
    /// Label failures fall back to the raw component identifier; icon
    /// failures leave the icon unset. Neither aborts the entry.
    fn build_entry(&self, key: &UserKey, config: &DrawerConfig) -> AppEntry {
        let display_name = self
            .query
            .display_label(&key.component)
            .unwrap_or_else(|| key.component.clone());
        let display_override = config.shorthand_for(&key.component).map(ToString::to_string);
        let icon = if config.preferences.hide_icons {
            None
        } else {
            self.query.icon(&key.component, key.serial)
        };

        AppEntry {
            key: key.clone(),
            display_name,
            display_override,
            icon,
        }
    }
}
