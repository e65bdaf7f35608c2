#![expect(
    clippy::unwrap_used,
    reason = "Test utilities use .unwrap() for brevity"
)]

//! Shared test utilities for `appdrawer` unit tests.
//!
//! Only compiled during testing (`#[cfg(test)]`).

use std::sync::Mutex;
use tempfile::TempDir;

/// Global mutex to serialize tests that modify the `XDG_CONFIG_HOME`
/// environment variable. Prevents races when parallel tests point the config
/// store at different temp directories.
static CONFIG_ENV_LOCK: Mutex<()> = Mutex::new(());

/// Helper function to create a temporary test directory using tempfile.
/// Returns a `TempDir` that automatically cleans up when dropped.
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// RAII guard that points `XDG_CONFIG_HOME` at a test-owned directory and
/// restores the original value when dropped.
///
/// # Safety Considerations
///
/// `std::env::set_var` / `remove_var` are unsafe because concurrent readers
/// of the environment race with writers. This guard keeps that sound:
///
/// 1. `CONFIG_ENV_LOCK` serializes all modifications across parallel tests
/// 2. Each test gets its own unique `TempDir`, so no paths are shared
/// 3. The guard is RAII-based and restores the original value on drop,
///    preventing environment pollution between tests, even on panic
pub struct ConfigDirGuard {
    original: Option<String>,
    // Held for the guard's lifetime so env modification stays exclusive
    _lock: std::sync::MutexGuard<'static, ()>,
}

#[expect(
    unsafe_code,
    reason = "Test-only environment variable mutation, serialized by CONFIG_ENV_LOCK"
)]
impl ConfigDirGuard {
    /// Set `XDG_CONFIG_HOME` to the given temp directory path.
    pub fn new(temp_dir: &TempDir) -> Self {
        let lock = CONFIG_ENV_LOCK.lock().unwrap();

        let original = std::env::var("XDG_CONFIG_HOME").ok();
        // SAFETY: serialized by CONFIG_ENV_LOCK and restored on drop; each
        // test owns a unique TempDir path. See struct-level documentation.
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        }
        Self {
            original,
            _lock: lock,
        }
    }
}

#[expect(
    unsafe_code,
    reason = "Test-only environment variable restoration, serialized by CONFIG_ENV_LOCK"
)]
impl Drop for ConfigDirGuard {
    fn drop(&mut self) {
        // SAFETY: restoring the pre-test state while still holding the lock
        // through self._lock; no other test can observe the intermediate value.
        if let Some(ref original) = self.original {
            unsafe {
                std::env::set_var("XDG_CONFIG_HOME", original);
            }
        } else {
            unsafe {
                std::env::remove_var("XDG_CONFIG_HOME");
            }
        }
    }
}
