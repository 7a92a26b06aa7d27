//! Filesystem trait definition.

use crate::error::StorageResult;
use std::fmt::Debug;
use std::path::Path;

/// A whole-file storage backend for AgentDB.
///
/// Backends are **opaque byte stores** keyed by path. AgentDB owns the
/// interpretation of the bytes.
///
/// # Invariants
///
/// - `read_file` returns exactly the bytes of the last successful `write_atomic`
/// - `write_atomic` either fully replaces the content or leaves it untouched
/// - No file handle outlives a single call
///
/// # Implementors
///
/// - [`super::OsFileSystem`] - For persistent storage
/// - [`super::InMemoryFileSystem`] - For testing
pub trait FileSystem: Send + Sync + Debug {
    /// Reads the full content of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StorageError::NotFound`] if the file does not exist,
    /// or an I/O error if it cannot be read.
    fn read_file(&self, path: &Path) -> StorageResult<Vec<u8>>;

    /// Atomically replaces the content of the file at `path` with `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if any step of the write fails. The previous content
    /// (if any) is still in place in that case.
    fn write_atomic(&self, path: &Path, data: &[u8]) -> StorageResult<()>;

    /// Returns whether a file exists at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if existence cannot be determined.
    fn exists(&self, path: &Path) -> StorageResult<bool>;
}
