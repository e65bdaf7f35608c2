//! Drawer controller implementation
//!
//! This module implements the controller that owns the live app list and
//! coordinates package broadcasts, background resyncs, and user edits.

use crate::adapter::ListAdapter;
use crate::apps::{AppEntry, PackageSnapshot, sort_entries};
use crate::broadcast::{GateRegistration, PackageAction, PackageChange};
use crate::config::{ConfigManager, DrawerConfig};
use crate::platform::PackageQuery;
use crate::reconciler::{BroadcastOutcome, ChangeOutcome, Reconciler};
use parking_lot::Mutex;
use std::sync::{Arc, mpsc};

/// Immutable product of one background resync
struct ResyncResult {
    /// Attach generation the resync was started under
    generation: u64,
    /// Reconciled list, ready to adopt
    entries: Vec<AppEntry>,
    /// Snapshot the list was reconciled against
    snapshot: PackageSnapshot,
}

/// Drawer logic controller
///
/// Owns the live list. Every mutation of it happens on the thread driving
/// [`DrawerController::run`], either directly (broadcasts, resync adoption)
/// or through the view calling an edit operation under the controller lock.
/// Background resyncs never touch the live list; they produce a
/// [`ResyncResult`] that the event loop adopts.
pub struct DrawerController {
    /// Drawer configuration (public for view access)
    pub config: Arc<Mutex<DrawerConfig>>,
    /// Reconciliation core shared with resync workers
    reconciler: Reconciler,
    /// View-facing list sink
    adapter: Arc<Mutex<dyn ListAdapter>>,
    /// Broadcast gate registration, held open while a view is attached
    gate: GateRegistration,
    /// Live app list in display order
    live: Vec<AppEntry>,
    /// Installed set the live list was last reconciled against
    snapshot: PackageSnapshot,
    /// Size of the retained snapshot
    package_count: usize,
    /// Whether a view is currently attached
    attached: bool,
    /// Bumped whenever a pending resync result must not be adopted: on
    /// detach, and on local edits landing while a worker is in flight
    generation: u64,
    /// Single-flight flag for background resyncs
    resync_in_flight: bool,
    /// Package change receiver (taken when event loop starts)
    package_receiver: Option<mpsc::Receiver<PackageChange>>,
    /// Resync result receiver (taken when event loop starts)
    resync_receiver: Option<mpsc::Receiver<ResyncResult>>,
    /// Sender handed to each resync worker
    resync_sender: mpsc::SyncSender<ResyncResult>,
}

impl DrawerController {
    /// Create a controller over the given platform, adapter, and gate
    ///
    /// Starts with an empty list; the first attach populates it.
    pub fn new(
        config: DrawerConfig,
        query: Arc<dyn PackageQuery>,
        adapter: Arc<Mutex<dyn ListAdapter>>,
        gate: GateRegistration,
        package_receiver: mpsc::Receiver<PackageChange>,
        self_package: impl Into<String>,
    ) -> Self {
        let config = Arc::new(Mutex::new(config));
        let reconciler = Reconciler::new(query, config.clone(), self_package);
        let (resync_sender, resync_receiver) = mpsc::sync_channel(32);

        Self {
            config,
            reconciler,
            adapter,
            gate,
            live: Vec::new(),
            snapshot: PackageSnapshot::default(),
            package_count: 0,
            attached: false,
            generation: 0,
            resync_in_flight: false,
            package_receiver: Some(package_receiver),
            resync_receiver: Some(resync_receiver),
            resync_sender,
        }
    }

    /// Current live list in display order
    pub fn entries(&self) -> &[AppEntry] {
        &self.live
    }

    /// Entry at an adapter position, if in range
    pub fn entry_at(&self, position: usize) -> Option<&AppEntry> {
        self.live.get(position)
    }

    /// Size of the installed set at the last reconciliation
    pub fn package_count(&self) -> usize {
        self.package_count
    }

    /// Attach a view: open the broadcast gate and start populating
    pub fn attach(&mut self) {
        use tracing::info;

        info!("view attached");
        self.gate.register();
        self.attached = true;
        self.push_list(true);
        self.request_resync();
    }

    /// Detach the view: close the gate and invalidate in-flight resyncs
    pub fn detach(&mut self) {
        use tracing::info;

        info!("view detached");
        self.gate.unregister();
        self.attached = false;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Start a background resync unless one is already running
    ///
    /// The worker never touches the live list. It reconciles a clone against
    /// a fresh snapshot and sends the result back for the event loop to
    /// adopt. A first resync (empty retained snapshot) builds the whole list
    /// instead of replaying a diff key by key.
    pub fn request_resync(&mut self) {
        use tracing::{debug, info, warn};

        if self.resync_in_flight {
            debug!("resync already in flight, coalescing request");
            return;
        }
        self.resync_in_flight = true;

        let reconciler = self.reconciler.clone();
        let old_snapshot = self.snapshot.clone();
        let live = self.live.clone();
        let generation = self.generation;
        let sender = self.resync_sender.clone();

        std::thread::spawn(move || {
            let snapshot = reconciler.capture_snapshot();
            let entries = if old_snapshot.is_empty() {
                reconciler.build_entries(&snapshot)
            } else {
                let diff = old_snapshot.diff(&snapshot);
                let mut entries = live;
                if diff.is_empty() {
                    debug!("resync found no package changes");
                } else {
                    info!(
                        "resync reconciling {} added and {} removed keys",
                        diff.added.len(),
                        diff.removed.len()
                    );
                    for key in diff.union_keys() {
                        reconciler.apply_change(&mut entries, key, PackageAction::Unknown);
                    }
                }
                entries
            };

            let result = ResyncResult {
                generation,
                entries,
                snapshot,
            };
            if sender.send(result).is_err() {
                warn!("resync result dropped: controller receiver disconnected");
            }
        });
    }

    /// Adopt a finished resync, or discard it if the world moved on
    ///
    /// Adoption re-filters through the current exclusion set so a hide that
    /// raced the resync can never resurrect a hidden entry.
    fn adopt_resync(&mut self, result: ResyncResult) {
        use tracing::{debug, info};

        self.resync_in_flight = false;

        if result.generation != self.generation {
            debug!(
                "discarding resync result from generation {} (now {})",
                result.generation, self.generation
            );
            if self.attached {
                self.request_resync();
            }
            return;
        }
        if !self.attached {
            debug!("discarding resync result: view detached");
            return;
        }

        let mut entries = result.entries;
        {
            let config = self.config.lock();
            entries.retain(|entry| !config.is_hidden(&entry.key.to_string()));
        }

        info!("resync adopted: {} entries", entries.len());
        self.live = entries;
        self.snapshot = result.snapshot;
        self.package_count = self.snapshot.len();
        self.push_list(false);
    }

    /// Apply one package broadcast
    ///
    /// The retained snapshot and package counter are refreshed on every
    /// outcome, actionable or not, so the next resync diffs against reality.
    fn handle_package_change(&mut self, change: PackageChange) {
        use tracing::debug;

        let outcome = self.reconciler.handle_change(&mut self.live, &change);
        debug!("broadcast for {}: {outcome:?}", change.package);

        self.snapshot = self.reconciler.capture_snapshot();
        self.package_count = self.snapshot.len();

        let list_changed = matches!(
            outcome,
            BroadcastOutcome::Applied(
                ChangeOutcome::Inserted | ChangeOutcome::Refreshed | ChangeOutcome::Removed
            ) | BroadcastOutcome::PackageRemoved(1..)
        );
        if list_changed {
            self.push_list(false);
        }
    }

    /// Hide the app at an adapter position
    ///
    /// Adds its wire key to the exclusion set, persists, and removes the row.
    pub fn hide_app(&mut self, position: usize) {
        use tracing::{info, warn};

        let Some(entry) = self.live.get(position) else {
            warn!("hide request for out-of-range position {position}");
            return;
        };
        let wire = entry.key.to_string();
        info!("hiding {wire}");
        self.invalidate_pending_resync();

        {
            let mut config = self.config.lock();
            config.hidden_apps.insert(wire);
        }
        self.persist_config();

        self.live.remove(position);
        if self.attached {
            self.adapter.lock().remove_item(position);
        }
    }

    /// Remove a wire key from the exclusion set and rematerialize its entry
    pub fn unhide_app(&mut self, raw_key: &str) {
        use tracing::{debug, info};

        self.invalidate_pending_resync();
        let was_hidden = { self.config.lock().hidden_apps.remove(raw_key) };
        if !was_hidden {
            debug!("unhide for {raw_key}: was not hidden");
        }
        self.persist_config();

        let outcome = self
            .reconciler
            .apply_change(&mut self.live, raw_key, PackageAction::Added);
        info!("unhide {raw_key}: {outcome:?}");
        if matches!(
            outcome,
            ChangeOutcome::Inserted | ChangeOutcome::Refreshed | ChangeOutcome::Removed
        ) {
            self.push_list(false);
        }
    }

    /// Set or clear the label shorthand for the app at an adapter position
    ///
    /// Input is sanitized: `|` characters are stripped and the result is
    /// trimmed. An empty result clears the override.
    pub fn set_shorthand(&mut self, position: usize, raw: &str) {
        use tracing::{debug, warn};

        let Some(entry) = self.live.get(position) else {
            warn!("shorthand request for out-of-range position {position}");
            return;
        };
        let component = entry.key.component.clone();
        let wire = entry.key.to_string();
        self.invalidate_pending_resync();

        let cleaned = raw.replace('|', "");
        let cleaned = cleaned.trim();
        {
            let mut config = self.config.lock();
            let value = if cleaned.is_empty() {
                None
            } else {
                Some(cleaned)
            };
            config.set_shorthand(&component, value);
        }
        self.persist_config();

        // Rebuilding the entry picks up the override and re-sorts
        let outcome = self
            .reconciler
            .apply_change(&mut self.live, &wire, PackageAction::Changed);
        debug!("shorthand update for {component}: {outcome:?}");
        self.push_list(true);
    }

    /// Flip the list ordering preference
    pub fn set_inverted(&mut self, inverted: bool) {
        use tracing::info;

        info!("list order inverted: {inverted}");
        self.invalidate_pending_resync();
        {
            self.config.lock().preferences.inverted_order = inverted;
        }
        self.persist_config();

        sort_entries(&mut self.live, inverted);
        self.push_list(true);
    }

    /// Invalidate any in-flight resync after a local edit
    ///
    /// A pending result was cloned from the pre-edit list, so adopting it
    /// would revert the edit. The generation bump routes it through the
    /// stale-discard path, which re-requests against the edited state.
    fn invalidate_pending_resync(&mut self) {
        if self.resync_in_flight {
            self.generation = self.generation.wrapping_add(1);
        }
    }

    /// Save the config, continuing with the in-memory copy on failure
    fn persist_config(&self) {
        use tracing::warn;

        let config = self.config.lock();
        if let Err(e) = ConfigManager::save(&config) {
            warn!(
                "Failed to save configuration to disk: {e}. Continuing with in-memory config. \
                 Changes will be lost on restart."
            );
        }
    }

    /// Push the live list to the adapter if a view is attached
    fn push_list(&self, force_refresh: bool) {
        use tracing::debug;

        if !self.attached {
            debug!("list update while detached, adapter untouched");
            return;
        }
        self.adapter.lock().update_list(self.live.clone(), force_refresh);
    }

    /// Take ownership of the package change receiver if it hasn't been taken
    /// yet. Returns None if already taken. Caller should treat None as a
    /// no-op.
    fn take_package_receiver(&mut self) -> Option<mpsc::Receiver<PackageChange>> {
        self.package_receiver.take()
    }

    /// Take ownership of the resync result receiver if it hasn't been taken
    /// yet. Returns None if already taken. Caller should treat None as a
    /// no-op.
    fn take_resync_receiver(&mut self) -> Option<mpsc::Receiver<ResyncResult>> {
        self.resync_receiver.take()
    }

    /// Run the event loop, receiving package changes and resync results.
    /// Uses a 100ms timeout so resync completions are adopted promptly.
    pub fn run(&mut self) {
        use std::sync::mpsc::{RecvTimeoutError, TryRecvError};
        use std::time::Duration;
        use tracing::{info, warn};

        let Some(package_receiver) = self.take_package_receiver() else {
            warn!("Event loop already running; run() call ignored");
            return;
        };
        let Some(resync_receiver) = self.take_resync_receiver() else {
            warn!("Event loop already running; run() call ignored");
            return;
        };

        info!("Entering event loop (package changes + resync results)");
        loop {
            match package_receiver.recv_timeout(Duration::from_millis(100)) {
                Ok(change) => {
                    self.handle_package_change(change);
                }
                Err(RecvTimeoutError::Timeout) => {
                    // Timeout is normal, fall through to drain resync results
                }
                Err(RecvTimeoutError::Disconnected) => {
                    warn!("Package change channel disconnected. Exiting event loop.");
                    break;
                }
            }

            // Drain all available resync results without blocking
            loop {
                match resync_receiver.try_recv() {
                    Ok(result) => {
                        self.adopt_resync(result);
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        warn!("Resync result channel disconnected.");
                        break;
                    }
                }
            }
        }

        info!("Event loop exited");
    }

    /// Spawn the event loop in a background thread. Only locks the
    /// controller while handling individual events, so view calls are never
    /// blocked for long.
    pub fn spawn_event_loop(
        controller: Arc<Mutex<DrawerController>>,
    ) -> std::thread::JoinHandle<()> {
        let (package_receiver, resync_receiver) = {
            let mut guard = controller.lock();
            (
                guard
                    .take_package_receiver()
                    .expect("DrawerController package receiver already taken"),
                guard
                    .take_resync_receiver()
                    .expect("DrawerController resync receiver already taken"),
            )
        };

        std::thread::spawn(move || {
            use std::sync::mpsc::{RecvTimeoutError, TryRecvError};
            use std::time::Duration;
            use tracing::{info, warn};

            info!("Entering event loop (package changes + resync results)");
            loop {
                match package_receiver.recv_timeout(Duration::from_millis(100)) {
                    Ok(change) => {
                        controller.lock().handle_package_change(change);
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        // Timeout is normal, fall through to drain resync results
                    }
                    Err(RecvTimeoutError::Disconnected) => {
                        warn!("Package change channel disconnected. Exiting event loop.");
                        break;
                    }
                }

                // Drain all available resync results without blocking
                loop {
                    match resync_receiver.try_recv() {
                        Ok(result) => {
                            controller.lock().adopt_resync(result);
                        }
                        Err(TryRecvError::Empty) => break,
                        Err(TryRecvError::Disconnected) => {
                            warn!("Resync result channel disconnected.");
                            break;
                        }
                    }
                }
            }
            info!("Event loop exited");
        })
    }
}
