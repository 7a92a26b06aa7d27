//! In-memory filesystem backend for testing.

use crate::error::{StorageError, StorageResult};
use crate::filesystem::FileSystem;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// An in-memory filesystem backend.
///
/// Files live in a map keyed by path. Writes replace a whole entry at once,
/// which gives the same atomicity contract as [`super::OsFileSystem`].
///
/// Writes can be made to fail with [`InMemoryFileSystem::fail_writes`] to
/// exercise commit failure paths.
///
/// # Example
///
/// ```rust
/// use agentdb_storage::{FileSystem, InMemoryFileSystem};
/// use std::path::Path;
///
/// let fs = InMemoryFileSystem::new();
/// fs.fail_writes(true);
/// assert!(fs.write_atomic(Path::new("db.json"), b"{}").is_err());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryFileSystem {
    files: RwLock<HashMap<PathBuf, Vec<u8>>>,
    fail_writes: AtomicBool,
}

impl InMemoryFileSystem {
    /// Creates a new empty in-memory filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a filesystem holding one pre-existing file.
    ///
    /// Useful for loading hand-written documents.
    #[must_use]
    pub fn with_file(path: impl Into<PathBuf>, data: Vec<u8>) -> Self {
        let fs = Self::new();
        fs.files.write().insert(path.into(), data);
        fs
    }

    /// Makes every subsequent write fail (or succeed again).
    pub fn fail_writes(&self, value: bool) {
        self.fail_writes.store(value, Ordering::SeqCst);
    }

    /// Removes a file, returning its content if it existed.
    pub fn remove(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.write().remove(path)
    }

    /// Returns the number of files held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    /// Returns true if no files are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }
}

impl FileSystem for InMemoryFileSystem {
    fn read_file(&self, path: &Path) -> StorageResult<Vec<u8>> {
        self.files
            .read()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                path: path.to_path_buf(),
            })
    }

    fn write_atomic(&self, path: &Path, data: &[u8]) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Injected {
                operation: "writing",
                path: path.to_path_buf(),
            });
        }
        self.files.write().insert(path.to_path_buf(), data.to_vec());
        Ok(())
    }

    fn exists(&self, path: &Path) -> StorageResult<bool> {
        Ok(self.files.read().contains_key(path))
    }
}
