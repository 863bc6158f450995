//! Unified error types for Pink Tower with fail-open recovery.
//!
//! Infrastructure failures never escalate past the layer that can
//! recover them: the session router degrades to the sign-in route, the
//! My Day aggregator substitutes empty results, and CLI mutations reduce
//! to a plain message. The `FailOpen` trait implements that policy: log
//! a warning and return a safe default.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Pink Tower operations.
#[derive(Error, Debug)]
pub enum PinkTowerError {
    /// A record lookup came up empty (e.g. invite code invalid or
    /// already redeemed).
    #[error("not found: {what}")]
    NotFound { what: String },

    /// I/O errors from record file operations.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON parsing/serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },

    /// Rejected caller input (empty names, malformed ids).
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

/// A specialized Result type for Pink Tower operations.
pub type Result<T> = std::result::Result<T, PinkTowerError>;

impl PinkTowerError {
    /// Create a not-found error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Whether this error indicates a missing record rather than an
    /// infrastructure failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<io::Error> for PinkTowerError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for PinkTowerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

/// Trait for fail-open error handling.
///
/// Recovers a failed `Result` by logging a warning and substituting a
/// safe value. Used where degradation is required instead of
/// propagation (route recomputation, aggregation sub-queries).
pub trait FailOpen<T> {
    /// Handle an error by logging a warning and returning the default value.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;

    /// Handle an error by logging a warning and returning the provided fallback.
    fn fail_open_with(self, context: &str, fallback: T) -> T;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using default)", context, err);
                T::default()
            }
        }
    }

    fn fail_open_with(self, context: &str, fallback: T) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using fallback)", context, err);
                fallback
            }
        }
    }
}
