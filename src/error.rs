//! Error types for conversion operations.
//!
//! Every filesystem failure carries the operation and the path it touched so
//! a failed run can be diagnosed from the message alone.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for conversion operations
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Main error type for all conversion operations
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The bundle path does not exist or is not a directory
    #[error("OCI bundle not found: {}", path.display())]
    InputNotFound {
        /// Path that was supplied
        path: PathBuf,
    },

    /// Directory creation, file write or copy failed
    #[error("failed {operation} at {}: {source}", path.display())]
    Filesystem {
        /// What was being done
        operation: String,
        /// Path involved in the failure
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// A descriptor value cannot be embedded in the Dockerfile template
    #[error("cannot render Dockerfile: {reason}")]
    Template {
        /// Why the value was rejected
        reason: String,
    },

    /// Configuration file could not be read or parsed
    #[error("invalid configuration {}: {reason}", path.display())]
    Config {
        /// Configuration file path
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Writing to the terminal failed
    #[error("Output failed: {0}")]
    Output(#[from] std::io::Error),
}

impl ConvertError {
    /// Builds a [`ConvertError::Template`] from anything printable.
    pub fn template(reason: impl Into<String>) -> Self {
        Self::Template {
            reason: reason.into(),
        }
    }

    /// Whether this error should be answered with usage text instead of a failure.
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::InputNotFound { .. } | Self::Cli(_))
    }
}

/// Attaches operation and path context to IO results.
pub trait ErrorExt<T> {
    /// Converts an IO error into [`ConvertError::Filesystem`].
    fn fs_context(self, operation: &str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::io::Result<T> {
    fn fs_context(self, operation: &str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| ConvertError::Filesystem {
            operation: operation.to_string(),
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_context_keeps_operation_and_path() {
        let io: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = io.fs_context("creating rootfs", "/tmp/ctx/rootfs").unwrap_err();

        let message = err.to_string();
        assert!(message.contains("creating rootfs"));
        assert!(message.contains("/tmp/ctx/rootfs"));
        assert!(matches!(err, ConvertError::Filesystem { .. }));
    }

    #[test]
    fn missing_input_is_a_usage_condition() {
        let err = ConvertError::InputNotFound {
            path: PathBuf::from("/does/not/exist"),
        };
        assert!(err.is_usage());
        assert!(!ConvertError::template("bad").is_usage());
    }
}
