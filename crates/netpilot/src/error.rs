//! Error types for QoS operations.

use std::io;

use crate::util::rate::ParseError;

/// Result type for QoS operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while applying, reading or removing a rule.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested algorithm tag is not one we can install.
    #[error("unsupported QoS algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// A setting required by the algorithm was not supplied.
    #[error("setting '{key}' is required for {algorithm}")]
    MissingSetting {
        /// Algorithm that needs the setting.
        algorithm: &'static str,
        /// Name of the missing setting.
        key: &'static str,
    },

    /// A setting was supplied but its value is unusable.
    #[error("setting '{key}' for {algorithm} {reason}")]
    InvalidSetting {
        /// Algorithm the setting belongs to.
        algorithm: &'static str,
        /// Name of the setting.
        key: &'static str,
        /// What is wrong with the value.
        reason: String,
    },

    /// The external program could not be started at all.
    #[error("failed to execute {program}: {source}")]
    Spawn {
        /// Program that was being executed.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The external program ran but exited unsuccessfully.
    #[error("failed to {operation}: {status}, output: {output}")]
    CommandFailed {
        /// What we were trying to do (e.g. "apply cake qdisc").
        operation: String,
        /// Exit status description.
        status: String,
        /// Stdout of the program followed by its stderr.
        output: String,
    },

    /// A unit-suffixed value could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Configuration file could not be loaded.
    #[error("invalid configuration {path}: {message}")]
    Config {
        /// Path of the configuration file.
        path: String,
        /// Reason the file was rejected.
        message: String,
    },

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a command failure from an exit description and captured output.
    pub fn command_failed(
        operation: impl Into<String>,
        status: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            operation: operation.into(),
            status: status.into(),
            output: output.into(),
        }
    }

    /// Check if this error was caused by the request itself.
    ///
    /// These are raised before any external command runs; callers usually
    /// map them to a client error.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedAlgorithm(_) | Self::MissingSetting { .. } | Self::InvalidSetting { .. }
        )
    }

    /// Check if this error came from executing the external program.
    pub fn is_command_failure(&self) -> bool {
        matches!(self, Self::Spawn { .. } | Self::CommandFailed { .. })
    }

    /// Get the captured program output, if this is a command failure.
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::CommandFailed { output, .. } => Some(output),
            _ => None,
        }
    }
}
