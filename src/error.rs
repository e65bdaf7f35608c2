//! Error types for the `appdrawer` engine
//!
//! This module defines all error types used throughout the crate,
//! providing clear error messages and proper error propagation.
//!
//! Error variants use `#[source]` to preserve error chains for better
//! observability and debugging. Note that the reconciliation core itself
//! absorbs per-item resolution failures locally (an app that cannot be
//! resolved is simply absent from the list); the types here surface only
//! from the config store, logging setup, and binary wiring.

use thiserror::Error;

/// Simple error type for wrapping string messages while implementing `std::error::Error`
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StringError(pub String);

impl StringError {
    /// Create a new `StringError` from a string message
    pub fn new(msg: impl Into<String>) -> Box<Self> {
        Box::new(Self(msg.into()))
    }
}

/// Main error type for the `appdrawer` engine
#[derive(Debug, Error)]
pub enum DrawerError {
    /// Configuration error
    /// Preserves the underlying error source for full error chain transparency
    #[error("Configuration error: {0}")]
    ConfigError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Logging setup error
    /// Preserves the underlying error source for full error chain transparency
    #[error("Logging setup error: {0}")]
    LoggingError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for `appdrawer` operations
pub type Result<T> = std::result::Result<T, DrawerError>;

/// Reasons a wire-format user key (`"{serial}-{component}"`) fails to parse
///
/// Parsing never aborts listing; callers fall back to a default serial and
/// treat the whole string as the component identifier. The two variants are
/// kept distinct so the fallback can be logged at different levels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    /// The key contains no `-` separator at all
    #[error("key has no serial prefix: {0}")]
    MissingSerial(String),

    /// A prefix is present before the first `-` but is not a valid serial
    #[error("key has a non-numeric serial prefix: {0}")]
    InvalidSerial(String),
}
