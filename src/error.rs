//! Error types for overlay derivation.
//!
//! Nothing in the per-tick engine is fatal: a missing session block degrades to
//! an unknown context, and a fault while deriving the context is logged and
//! retried on the next tick. The errors in this module describe the faults that
//! *are* reported to callers: context derivation faults (consumed internally by
//! the engine), malformed session strings and replay files, configuration
//! problems, and failures of providers and background feeds.
//!
//! ```rust
//! use pitboard::OverlayError;
//!
//! let error = OverlayError::context("session 3 not listed in SessionInfo");
//! assert!(error.is_retryable());
//! for suggestion in error.recovery_suggestions() {
//!     println!("  - {}", suggestion);
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for overlay operations.
pub type Result<T, E = OverlayError> = std::result::Result<T, E>;

/// Main error type for overlay operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum OverlayError {
    #[error("Session context could not be derived: {reason}")]
    Context { reason: String },

    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },

    #[error("File error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    #[error("Snapshot provider failed: {reason}")]
    Provider {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Background feed failed: {reason}")]
    Feed {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl OverlayError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            OverlayError::Context { .. } => true,
            OverlayError::Provider { .. } => true,
            OverlayError::Feed { .. } => true,
            OverlayError::Parse { .. } => false,
            OverlayError::File { .. } => false,
            OverlayError::Config { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            OverlayError::Context { .. } => vec![
                "Wait for the simulator to publish complete session info",
                "Check that the session number exists in SessionInfo.Sessions",
            ],
            OverlayError::Parse { .. } => vec![
                "Check the session string or replay file is well-formed YAML",
                "Verify numeric fields carry their expected units",
            ],
            OverlayError::File { .. } => vec![
                "Check the file exists and is readable",
                "Check file permissions",
            ],
            OverlayError::Config { .. } => vec![
                "Compare the settings file against the documented defaults",
                "Remove the offending key to fall back to its default",
            ],
            OverlayError::Provider { .. } => vec![
                "Ensure the telemetry source is still running",
                "Restart the overlay once the source is available",
            ],
            OverlayError::Feed { .. } => vec![
                "Check network connectivity to the feed endpoint",
                "Verify credentials used by the feed source",
            ],
        }
    }

    /// Helper constructor for context derivation faults.
    pub fn context(reason: impl Into<String>) -> Self {
        OverlayError::Context { reason: reason.into() }
    }

    /// Helper constructor for parse errors.
    pub fn parse(context: impl Into<String>, details: impl Into<String>) -> Self {
        OverlayError::Parse { context: context.into(), details: details.into() }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        OverlayError::File { path, source }
    }

    /// Helper constructor for configuration errors.
    pub fn config(reason: impl Into<String>) -> Self {
        OverlayError::Config { reason: reason.into() }
    }

    /// Helper constructor for provider failures.
    pub fn provider_failed(reason: impl Into<String>) -> Self {
        OverlayError::Provider { reason: reason.into(), source: None }
    }

    /// Helper constructor for provider failures with an underlying cause.
    pub fn provider_failed_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        OverlayError::Provider { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for feed failures with an underlying cause.
    pub fn feed_failed_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        OverlayError::Feed { reason: reason.into(), source: Some(source) }
    }
}

impl From<std::io::Error> for OverlayError {
    fn from(err: std::io::Error) -> Self {
        OverlayError::File { path: PathBuf::from("<unknown>"), source: err }
    }
}

impl From<serde_yaml_ng::Error> for OverlayError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        OverlayError::Parse { context: "YAML deserialization".to_string(), details: err.to_string() }
    }
}
