//! Package change broadcast plumbing
//!
//! Platform broadcasts arrive on whatever thread the host delivers them on.
//! [`BroadcastGate`] is the delivery side: it forwards changes into the
//! controller's channel, but only while a [`GateRegistration`] holds the gate
//! open. Events delivered while closed are counted and dropped, mirroring an
//! unregistered receiver.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::SyncSender;

/// Kind of package change a broadcast carries
///
/// Wire codes follow the host convention: 1 added, 2 changed, 3 removed.
/// Anything else, including the codeless default 42, maps to [`Self::Unknown`]
/// and is treated like any other change by the reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageAction {
    /// Package was installed
    Added,
    /// Package was updated or otherwise changed
    Changed,
    /// Package was uninstalled
    Removed,
    /// Unrecognized or missing change code
    Unknown,
}

impl PackageAction {
    /// Decode a wire change code
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Added,
            2 => Self::Changed,
            3 => Self::Removed,
            _ => Self::Unknown,
        }
    }
}

/// One package change broadcast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageChange {
    /// Raw package name the broadcast names
    pub package: String,
    /// What happened to it
    pub action: PackageAction,
}

impl PackageChange {
    /// Create a change for a package
    pub fn new(package: impl Into<String>, action: PackageAction) -> Self {
        Self {
            package: package.into(),
            action,
        }
    }
}

/// Registration handle controlling whether broadcasts pass the gate
///
/// Held by the controller and toggled on attach and detach. Cheap to clone;
/// clones share the flag.
#[derive(Clone)]
pub struct GateRegistration {
    registered: Arc<AtomicBool>,
}

impl GateRegistration {
    /// Open the gate
    pub fn register(&self) {
        use tracing::debug;

        self.registered.store(true, Ordering::SeqCst);
        debug!("broadcast gate registered");
    }

    /// Close the gate
    pub fn unregister(&self) {
        use tracing::debug;

        self.registered.store(false, Ordering::SeqCst);
        debug!("broadcast gate unregistered");
    }

    /// Whether the gate is currently open
    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::SeqCst)
    }
}

/// Delivery side of the broadcast gate
///
/// Owned by whatever receives host broadcasts. Holds the channel sender, so
/// the controller's event loop sees a disconnect once every gate clone is
/// gone.
#[derive(Clone)]
pub struct BroadcastGate {
    sender: SyncSender<PackageChange>,
    registered: Arc<AtomicBool>,
    dropped: Arc<AtomicU64>,
}

impl BroadcastGate {
    /// Create a closed gate forwarding into the given channel
    pub fn new(sender: SyncSender<PackageChange>) -> Self {
        Self {
            sender,
            registered: Arc::new(AtomicBool::new(false)),
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Registration handle sharing this gate's flag
    pub fn registration(&self) -> GateRegistration {
        GateRegistration {
            registered: self.registered.clone(),
        }
    }

    /// Whether the gate is currently open
    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::SeqCst)
    }

    /// Forward a change if the gate is open
    ///
    /// Returns whether the change entered the channel. Changes arriving while
    /// closed, or after the receiver is gone, are dropped and counted.
    pub fn deliver(&self, change: PackageChange) -> bool {
        use tracing::{debug, warn};

        if !self.is_registered() {
            self.dropped.fetch_add(1, Ordering::SeqCst);
            debug!(
                "dropping {:?} broadcast for {}: gate not registered",
                change.action, change.package
            );
            return false;
        }

        if let Err(e) = self.sender.send(change) {
            self.dropped.fetch_add(1, Ordering::SeqCst);
            warn!("failed to forward package broadcast: {e}");
            return false;
        }
        true
    }

    /// How many changes have been dropped at the gate
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::SeqCst)
    }
}
