//! Drawer logic controller module
//!
//! This module coordinates between package broadcasts, background resyncs,
//! and the view-facing list adapter, implementing the core drawer logic.
//!
//! # Overview
//!
//! The drawer controller is the central coordinator that:
//! - **Receives package changes** forwarded through the broadcast gate
//! - **Owns the live app list** and applies every mutation to it
//! - **Runs background resyncs** that reconcile against a fresh snapshot
//! - **Pushes sorted lists** to the adapter for display
//! - **Handles user edits** (hide, unhide, rename, ordering)
//!
//! # Architecture
//!
//! - `DrawerController`: Main controller owning the live list and snapshot
//! - **Event-driven design**: Reacts to package changes from the gate
//! - **Single-threaded apply**: Only the event-loop thread mutates the list;
//!   resync workers produce immutable results over a channel
//!
//! # Event Flow
//!
//! ```text
//! BroadcastGate → PackageChange → DrawerController → Reconciler
//!                                        ↓
//!                                 sorted entries → ListAdapter
//! ```
//!
//! # Resync Lifecycle
//!
//! Attaching a view opens the gate and starts a resync; detaching closes the
//! gate and bumps a generation counter so any in-flight resync result is
//! discarded when it arrives. Local edits landing while a resync is in
//! flight bump the counter the same way, since the pending result predates
//! the edit; the discard re-requests against the edited state. Resyncs are
//! single-flight: requests made while one is running coalesce into it.

pub mod drawer_controller;

pub use drawer_controller::DrawerController;
