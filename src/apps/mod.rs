//! App list model module
//!
//! Defines the data the reconciler works over: user-qualified activity keys,
//! visible list entries, label ordering, and the installed-package snapshot.
//!
//! # Key format
//!
//! Every installed activity is identified by a wire key
//! `"{serial}-{component}"`, pairing the owning user profile's serial with a
//! `package/class` component identifier. The same component installed for two
//! profiles yields two distinct keys and two distinct list entries. Keys are
//! parsed into [`UserKey`] exactly once, at the boundary where a raw string
//! enters the engine.
//!
//! # Change detection
//!
//! [`PackageSnapshot`] is the sorted set of wire keys visible at one moment.
//! Reconciliation diffs a retained snapshot against a fresh capture:
//! - **added** = `new - old` (keys that appeared)
//! - **removed** = `old - new` (keys that vanished)
//!
//! The union of both sets is replayed through the reconciler, which decides
//! per key what the list mutation actually is.

pub mod entry;
pub mod snapshot;

pub use entry::{AppEntry, UserKey, sort_entries};
pub use snapshot::{PackageSnapshot, SnapshotDiff};
