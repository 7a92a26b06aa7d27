//! Error types for AgentDB core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// A document or record failed schema validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The content does not have the required fields or shapes.
    #[error("malformed document: {message}")]
    Malformed {
        /// Description of what was wrong.
        message: String,
    },

    /// A record has an empty role.
    #[error("record role must not be empty")]
    EmptyRole,

    /// The document carries a version this build does not recognize.
    #[error("unsupported schema version {found}; supported: {supported:?}")]
    UnsupportedVersion {
        /// The version found.
        found: u32,
        /// The versions this build can load.
        supported: &'static [u32],
    },

    /// An `id` or `api_key` value is neither a string nor a finite number.
    #[error("invalid {field}: expected a string or a finite number")]
    InvalidScalar {
        /// Which field was invalid.
        field: &'static str,
    },
}

impl SchemaError {
    /// Creates a malformed document error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

/// Errors that can occur in AgentDB core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Schema validation failed.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// The database file does not exist.
    #[error("database not found: {}", path.display())]
    NotFound {
        /// The bound path.
        path: PathBuf,
    },

    /// `setup` was called on a path that already holds a valid document.
    #[error("database already set up: {}", path.display())]
    AlreadySetup {
        /// The bound path.
        path: PathBuf,
    },

    /// A session operation needs a bound path but none is bound.
    #[error("no database bound; call use_database first")]
    NotBound,

    /// An operation was attempted on a connection that was never opened.
    #[error("connection is not bound to a database: cannot {operation}")]
    UnboundConnection {
        /// The rejected operation.
        operation: &'static str,
    },

    /// Filesystem error.
    #[error("storage error: {0}")]
    Storage(#[source] agentdb_storage::StorageError),

    /// Encoding error while writing a document.
    #[error("codec error: {0}")]
    Codec(#[from] agentdb_codec::CodecError),
}

impl From<agentdb_storage::StorageError> for CoreError {
    fn from(err: agentdb_storage::StorageError) -> Self {
        match err {
            agentdb_storage::StorageError::NotFound { path } => Self::NotFound { path },
            other => Self::Storage(other),
        }
    }
}

impl CoreError {
    /// Creates an unbound connection error.
    pub fn unbound_connection(operation: &'static str) -> Self {
        Self::UnboundConnection { operation }
    }

    /// Returns the schema error if this is one.
    #[must_use]
    pub fn as_schema(&self) -> Option<&SchemaError> {
        match self {
            Self::Schema(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_not_found_becomes_not_found() {
        let err: CoreError = agentdb_storage::StorageError::NotFound {
            path: PathBuf::from("db.json"),
        }
        .into();
        assert!(matches!(err, CoreError::NotFound { path } if path == PathBuf::from("db.json")));
    }

    #[test]
    fn unbound_connection_names_operation() {
        let err = CoreError::unbound_connection("commit");
        assert_eq!(
            err.to_string(),
            "connection is not bound to a database: cannot commit"
        );
    }

    #[test]
    fn as_schema() {
        let err = CoreError::from(SchemaError::EmptyRole);
        assert_eq!(err.as_schema(), Some(&SchemaError::EmptyRole));
        assert!(CoreError::NotBound.as_schema().is_none());
    }
}
