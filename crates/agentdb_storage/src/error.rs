//! Error types for storage operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The file does not exist.
    #[error("file not found: {}", path.display())]
    NotFound {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// An I/O error occurred.
    #[error("I/O error while {operation} {}: {source}", path.display())]
    Io {
        /// What the backend was doing when the error occurred.
        operation: &'static str,
        /// The path involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// A failure injected by a test backend.
    #[error("injected failure while {operation} {}", path.display())]
    Injected {
        /// The operation that was made to fail.
        operation: &'static str,
        /// The path involved.
        path: PathBuf,
    },
}

impl StorageError {
    /// Creates an I/O error for a failed step.
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Creates an error for a failed read of `path`.
    ///
    /// A missing file becomes [`StorageError::NotFound`]; every other kind
    /// stays an [`StorageError::Io`].
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            return Self::NotFound { path };
        }
        Self::io("reading", path, source)
    }

    /// Returns true if this error reports a missing file.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
