//! OS filesystem backend for persistent storage.

use crate::error::{StorageError, StorageResult};
use crate::filesystem::FileSystem;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A filesystem backend using OS file APIs.
///
/// # Atomic writes
///
/// `write_atomic` uses the write-then-rename pattern:
/// 1. Write to a uniquely named temporary file next to the target
/// 2. Sync the temporary file to disk
/// 3. Rename the temporary file over the target
/// 4. Fsync the parent directory so the rename is durable
///
/// Steps 2 and 4 are skipped when syncing is disabled.
///
/// # Example
///
/// ```no_run
/// use agentdb_storage::{FileSystem, OsFileSystem};
/// use std::path::Path;
///
/// let fs = OsFileSystem::new();
/// fs.write_atomic(Path::new("db.json"), b"{}").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct OsFileSystem {
    sync: bool,
    create_parent_dirs: bool,
}

impl Default for OsFileSystem {
    fn default() -> Self {
        Self {
            sync: true,
            create_parent_dirs: true,
        }
    }
}

impl OsFileSystem {
    /// Creates a backend that syncs every write and creates missing parents.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether writes are fsynced before returning.
    #[must_use]
    pub const fn sync(mut self, value: bool) -> Self {
        self.sync = value;
        self
    }

    /// Sets whether missing parent directories are created on write.
    #[must_use]
    pub const fn create_parent_dirs(mut self, value: bool) -> Self {
        self.create_parent_dirs = value;
        self
    }

    fn write_temp(&self, path: &Path, temp_path: &Path, data: &[u8]) -> StorageResult<()> {
        let mut file = File::create(temp_path)
            .map_err(|e| StorageError::io("creating temp file for", path, e))?;
        file.write_all(data)
            .map_err(|e| StorageError::io("writing temp file for", path, e))?;
        if self.sync {
            file.sync_all()
                .map_err(|e| StorageError::io("syncing temp file for", path, e))?;
        }
        Ok(())
    }
}

impl FileSystem for OsFileSystem {
    fn read_file(&self, path: &Path) -> StorageResult<Vec<u8>> {
        fs::read(path).map_err(|e| StorageError::read(path, e))
    }

    fn write_atomic(&self, path: &Path, data: &[u8]) -> StorageResult<()> {
        let parent = parent_dir(path);
        if self.create_parent_dirs {
            fs::create_dir_all(&parent)
                .map_err(|e| StorageError::io("creating directory", &parent, e))?;
        }

        let temp_path = temp_path_for(path);
        if let Err(e) = self.write_temp(path, &temp_path, data) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        if let Err(e) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return Err(StorageError::io("renaming temp file onto", path, e));
        }

        if self.sync {
            sync_directory(&parent)?;
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> StorageResult<bool> {
        path.try_exists()
            .map_err(|e| StorageError::io("checking existence of", path, e))
    }
}

/// Returns the directory holding `path`, using `.` for bare file names.
fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Builds a hidden, unique sibling path such as `.db.json.<uuid>.tmp`.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(format!(".{}.tmp", Uuid::new_v4().simple()));
    parent_dir(path).join(name)
}

#[cfg(unix)]
fn sync_directory(dir: &Path) -> StorageResult<()> {
    let handle = File::open(dir).map_err(|e| StorageError::io("opening directory", dir, e))?;
    handle
        .sync_all()
        .map_err(|e| StorageError::io("syncing directory", dir, e))
}

#[cfg(not(unix))]
fn sync_directory(_dir: &Path) -> StorageResult<()> {
    // NTFS journaling covers rename durability
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn read_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let fs = OsFileSystem::new();

        let result = fs.read_file(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(StorageError::NotFound { .. })));
    }

    #[test]
    fn write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");
        let fs = OsFileSystem::new();

        fs.write_atomic(&path, b"hello").unwrap();
        assert_eq!(fs.read_file(&path).unwrap(), b"hello");
    }

    #[test]
    fn write_replaces_previous_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");
        let fs = OsFileSystem::new();

        fs.write_atomic(&path, b"a much longer first version").unwrap();
        fs.write_atomic(&path, b"short").unwrap();
        assert_eq!(fs.read_file(&path).unwrap(), b"short");
    }

    #[test]
    fn write_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");
        let fs = OsFileSystem::new();

        fs.write_atomic(&path, b"one").unwrap();
        fs.write_atomic(&path, b"two").unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![OsString::from("db.json")]);
    }

    #[test]
    fn write_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("path").join("db.json");
        let fs = OsFileSystem::new();

        fs.write_atomic(&path, b"{}").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn write_without_parent_creation_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("db.json");
        let fs = OsFileSystem::new().create_parent_dirs(false);

        let result = fs.write_atomic(&path, b"{}");
        assert!(matches!(result, Err(StorageError::Io { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn write_into_removed_dir_is_io_error_naming_target() {
        let dir = tempdir().unwrap();
        let parent = dir.path().join("sub");
        let path = parent.join("db.json");
        let fs = OsFileSystem::new().create_parent_dirs(false);

        std::fs::create_dir(&parent).unwrap();
        fs.write_atomic(&path, b"{}").unwrap();
        std::fs::remove_dir_all(&parent).unwrap();

        let err = fs.write_atomic(&path, b"{}").unwrap_err();
        assert!(!err.is_not_found());
        match err {
            StorageError::Io { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn write_without_sync() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");
        let fs = OsFileSystem::new().sync(false);

        fs.write_atomic(&path, b"fast").unwrap();
        assert_eq!(fs.read_file(&path).unwrap(), b"fast");
    }

    #[test]
    fn exists_reports_presence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");
        let fs = OsFileSystem::new();

        assert!(!fs.exists(&path).unwrap());
        fs.write_atomic(&path, b"{}").unwrap();
        assert!(fs.exists(&path).unwrap());
    }

    #[test]
    fn temp_path_is_hidden_sibling() {
        let temp = temp_path_for(Path::new("/data/db.json"));
        assert_eq!(temp.parent(), Some(Path::new("/data")));
        let name = temp.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".db.json."));
        assert!(name.ends_with(".tmp"));
    }

    #[test]
    fn bare_file_name_uses_current_dir() {
        assert_eq!(parent_dir(Path::new("db.json")), PathBuf::from("."));
    }
}
