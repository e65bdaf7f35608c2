//! `appdrawer` - Package reconciliation for a launcher app drawer
//!
//! Keeps a sorted, profile-aware app list in sync with the installed package
//! set. Uses an event-driven architecture with `BroadcastGate` forwarding
//! package change broadcasts, `DrawerController` serializing all list
//! mutations onto one thread, and `Reconciler` collapsing install, update,
//! and uninstall into a single remove-then-reinsert path.
//!
//! # Wire keys
//!
//! List state is keyed by `"{serial}-{package}/{activity}"` strings, pairing
//! a user profile serial with a component identifier. Keys missing the
//! serial prefix fall back to the current profile.

// Module declarations
pub mod adapter;
pub mod apps;
pub mod broadcast;
pub mod config;
pub mod controller;
pub mod error;
pub mod gestures;
pub mod platform;
pub mod reconciler;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use error::{DrawerError, Result};
