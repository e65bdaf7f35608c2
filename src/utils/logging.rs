//! Logging system initialization
//!
//! Sets up tracing-based logging with file output to the drawer config
//! directory and automatic rotation on startup keeping the last 10 sessions.

use crate::config::ConfigManager;
use crate::error::{DrawerError, Result, StringError};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt};

/// Maximum number of historical log files to keep (app.log.1 through app.log.9)
const MAX_LOG_FILES: u8 = 9;

/// Initialize the logging system
///
/// Log level defaults to INFO but can be configured via the `RUST_LOG`
/// environment variable. Rotates existing logs on startup to maintain a
/// history of the last 10 sessions.
pub fn init_logging() -> Result<()> {
    let log_dir = ConfigManager::ensure_config_dir()?;

    // Rotate existing log files on startup
    let log_path = log_dir.join("app.log");
    rotate_logs_on_startup(&log_path)?;

    // tracing_appender's RollingFileAppender has no startup-based rotation,
    // so rotation is handled manually above
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("app")
        .filename_suffix("log")
        .build(log_dir)
        .map_err(|e| DrawerError::LoggingError(Box::new(e)))?;

    // Build the subscriber with file output
    let subscriber = fmt()
        .with_writer(file_appender)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false) // Disable ANSI colors for file output
        .with_target(true) // Include target module
        .with_thread_ids(true) // Include thread IDs
        .with_file(true) // Include file names
        .with_line_number(true) // Include line numbers
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| DrawerError::LoggingError(Box::new(e)))?;

    tracing::info!("appdrawer v{} started", env!("CARGO_PKG_VERSION"));

    Ok(())
}

/// Rotate log files on application startup
///
/// Maintains a history of the last 10 sessions:
/// - app.log.9 is deleted (oldest log)
/// - app.log.8 -> app.log.9, ..., app.log.1 -> app.log.2
/// - app.log -> app.log.1
/// - A fresh app.log will be created by the logger
///
/// Called unconditionally on every startup, regardless of log file size, so
/// each session's logs are preserved separately.
fn rotate_logs_on_startup(log_path: &PathBuf) -> Result<()> {
    // If the current log doesn't exist, nothing to rotate
    if !log_path.exists() {
        return Ok(());
    }

    let log_dir = log_path
        .parent()
        .ok_or_else(|| DrawerError::LoggingError(StringError::new("Invalid log path")))?;

    let log_name = log_path
        .file_name()
        .ok_or_else(|| DrawerError::LoggingError(StringError::new("Invalid log filename")))?
        .to_string_lossy();

    // Delete the oldest log file if it exists
    let oldest_log = log_dir.join(format!("{log_name}.{MAX_LOG_FILES}"));
    if oldest_log.exists() {
        std::fs::remove_file(&oldest_log)?;
    }

    // Rotate log files from 8 down to 1
    for i in (1..MAX_LOG_FILES).rev() {
        let current_log = log_dir.join(format!("{log_name}.{i}"));
        let next_log = log_dir.join(format!("{log_name}.{}", i + 1));

        if current_log.exists() {
            std::fs::rename(&current_log, &next_log)?;
        }
    }

    // Rotate the current log file (app.log -> app.log.1)
    let log_1 = log_dir.join(format!("{log_name}.1"));
    std::fs::rename(log_path, &log_1)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_dir;
    use std::fs;
    use std::io::Write;

    /// Helper to create a test log file with specific content
    fn create_test_log(path: &PathBuf, content: &str) {
        let mut file = fs::File::create(path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_rotate_logs_on_startup_basic() {
        let temp_dir = create_test_dir();
        let log_path = temp_dir.path().join("app.log");

        create_test_log(&log_path, "Session 1 log content");
        rotate_logs_on_startup(&log_path).unwrap();

        let log_1 = temp_dir.path().join("app.log.1");
        assert!(log_1.exists(), "app.log.1 should exist after rotation");
        assert!(
            !log_path.exists(),
            "app.log should not exist after rotation (will be created fresh by logger)"
        );
        assert_eq!(fs::read_to_string(&log_1).unwrap(), "Session 1 log content");
    }

    #[test]
    fn test_rotate_logs_on_startup_multiple_rotations() {
        let temp_dir = create_test_dir();
        let log_path = temp_dir.path().join("app.log");

        // Simulate multiple application startups
        for i in 1..=5 {
            create_test_log(&log_path, &format!("Session {i} log content"));
            rotate_logs_on_startup(&log_path).unwrap();
        }

        // Most recent session is in .1, oldest in .5
        for i in 1..=5 {
            let log_i = temp_dir.path().join(format!("app.log.{i}"));
            assert!(log_i.exists(), "app.log.{i} should exist");
            let expected_session = 6 - i;
            assert_eq!(
                fs::read_to_string(&log_i).unwrap(),
                format!("Session {expected_session} log content"),
                "app.log.{i} should contain Session {expected_session}"
            );
        }
        assert!(!log_path.exists(), "app.log should not exist after rotation");
    }

    #[test]
    fn test_rotate_logs_on_startup_respects_max_files() {
        let temp_dir = create_test_dir();
        let log_path = temp_dir.path().join("app.log");

        // Simulate more than MAX_LOG_FILES startups
        for i in 1..=12 {
            create_test_log(&log_path, &format!("Session {i} log content"));
            rotate_logs_on_startup(&log_path).unwrap();
        }

        for i in 1..=MAX_LOG_FILES {
            assert!(
                temp_dir.path().join(format!("app.log.{i}")).exists(),
                "app.log.{i} should exist (within MAX_LOG_FILES)"
            );
        }
        assert!(
            !temp_dir.path().join("app.log.10").exists(),
            "app.log.10 should not exist (beyond MAX_LOG_FILES)"
        );

        // Sessions 1-3 were deleted; session 4 is the oldest retained
        let content = fs::read_to_string(temp_dir.path().join("app.log.9")).unwrap();
        assert_eq!(content, "Session 4 log content");
        let content = fs::read_to_string(temp_dir.path().join("app.log.1")).unwrap();
        assert_eq!(content, "Session 12 log content");
    }

    #[test]
    fn test_rotate_logs_on_startup_no_existing_log() {
        let temp_dir = create_test_dir();
        let log_path = temp_dir.path().join("app.log");

        let result = rotate_logs_on_startup(&log_path);
        assert!(
            result.is_ok(),
            "Rotation should succeed when log doesn't exist"
        );
        assert!(!log_path.exists());
        assert!(!temp_dir.path().join("app.log.1").exists());
    }

    #[test]
    fn test_rotate_logs_on_startup_partial_history() {
        let temp_dir = create_test_dir();
        let log_path = temp_dir.path().join("app.log");

        // Current log plus a gapped history
        create_test_log(&log_path, "Current session");
        create_test_log(&temp_dir.path().join("app.log.1"), "Previous session");
        create_test_log(&temp_dir.path().join("app.log.5"), "Very old session");

        rotate_logs_on_startup(&log_path).unwrap();

        let content_1 = fs::read_to_string(temp_dir.path().join("app.log.1")).unwrap();
        let content_2 = fs::read_to_string(temp_dir.path().join("app.log.2")).unwrap();
        let content_6 = fs::read_to_string(temp_dir.path().join("app.log.6")).unwrap();

        assert_eq!(content_1, "Current session");
        assert_eq!(content_2, "Previous session");
        assert_eq!(content_6, "Very old session");
    }
}
