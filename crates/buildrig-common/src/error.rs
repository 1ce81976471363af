//! Unified error type for the buildrig workspace.
//!
//! Every failure is returned to the immediate caller. Variants that stem
//! from an external command carry the rendered command line so a failing
//! test stays diagnosable without re-running at a higher verbosity.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The executable could not be started (missing or not executable).
    #[error("failed to launch `{command}`: {source}")]
    Launch {
        /// Rendered command line.
        command: String,
        /// Underlying I/O error from the spawn attempt.
        source: std::io::Error,
    },

    /// The process ran and exited unsuccessfully.
    #[error("`{command}` exited with {status}")]
    Execution {
        /// Rendered command line.
        command: String,
        /// Exit status as reported by the OS.
        status: std::process::ExitStatus,
    },

    /// Captured output violated an invariant.
    #[error("unexpected output from `{command}`: {message}")]
    OutputValidation {
        /// Rendered command line.
        command: String,
        /// Description of the violated invariant.
        message: String,
    },

    /// Forwarding child output to the sink or console failed.
    #[error("failed to forward output of `{command}`: {source}")]
    OutputStream {
        /// Rendered command line.
        command: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A fixture directory or file could not be created or written.
    #[error("filesystem error at {path}: {source}")]
    Filesystem {
        /// Path where the error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A required external tool or setting could not be resolved.
    #[error("invalid configuration: {message}")]
    Configuration {
        /// Description of the problem.
        message: String,
    },

    /// Configuration serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

impl HarnessError {
    /// Builds a [`HarnessError::Filesystem`] for an invalid fixture path.
    #[must_use]
    pub fn invalid_path(path: impl Into<PathBuf>, reason: &str) -> Self {
        Self::Filesystem {
            path: path.into(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, reason.to_string()),
        }
    }

    /// Returns the command line associated with this error, if any.
    #[must_use]
    pub fn command(&self) -> Option<&str> {
        match self {
            Self::Launch { command, .. }
            | Self::Execution { command, .. }
            | Self::OutputValidation { command, .. }
            | Self::OutputStream { command, .. } => Some(command),
            Self::Filesystem { .. } | Self::Configuration { .. } | Self::Serialization { .. } => {
                None
            }
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, HarnessError>;
