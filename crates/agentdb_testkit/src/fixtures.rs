//! Test fixtures and database helpers.
//!
//! Provides temporary databases bound to a fresh session, so every test works
//! against its own file and no binding leaks between tests.

use agentdb_codec::JsonCodec;
use agentdb_core::{Config, Document, Metadata, Scalar, Session, Store};
use agentdb_storage::InMemoryFileSystem;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// File name used for fixture databases.
pub const DB_FILE_NAME: &str = "db.json";

/// A session bound to a database file in a temporary directory.
///
/// The directory is removed when the fixture is dropped.
pub struct TestDatabase {
    /// The bound session.
    pub session: Session,
    metadata: Option<Metadata>,
    path: PathBuf,
    _temp_dir: TempDir,
}

impl TestDatabase {
    /// Creates a bound session whose database has not been set up.
    pub fn empty() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(DB_FILE_NAME);
        let mut session = Session::with_config(&Config::new().sync_on_write(false));
        session.use_database(&path);

        Self {
            session,
            metadata: None,
            path,
            _temp_dir: temp_dir,
        }
    }

    /// Creates a database set up with random id and api_key.
    pub fn new() -> Self {
        Self::with_metadata(random_metadata())
    }

    /// Creates a database set up with the given metadata.
    pub fn with_metadata(metadata: Metadata) -> Self {
        let mut db = Self::empty();
        db.session
            .setup(&metadata)
            .expect("Failed to set up test database");
        db.metadata = Some(metadata);
        db
    }

    /// Returns the database file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the metadata used for setup, if any.
    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    /// Reads the document straight from disk with a separate store.
    pub fn read_back(&self) -> Document {
        Store::os()
            .read(&self.path)
            .expect("Failed to read back test database")
    }

    /// Returns the raw bytes on disk.
    pub fn raw(&self) -> Vec<u8> {
        std::fs::read(&self.path).expect("Failed to read test database file")
    }

    /// Overwrites the file with raw bytes, bypassing the store.
    pub fn write_raw(&self, bytes: &[u8]) {
        std::fs::write(&self.path, bytes).expect("Failed to write test database file");
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestDatabase {
    type Target = Session;

    fn deref(&self) -> &Self::Target {
        &self.session
    }
}

impl std::ops::DerefMut for TestDatabase {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.session
    }
}

/// Returns metadata with random numeric id and api_key.
pub fn random_metadata() -> Metadata {
    let id = Scalar::try_from(rand::random::<f64>()).expect("random f64 is finite");
    let api_key = Scalar::try_from(rand::random::<f64>()).expect("random f64 is finite");
    Metadata::latest(id, api_key)
}

/// Runs a test with a set-up temporary database.
///
/// # Example
///
/// ```rust
/// use agentdb_testkit::with_temp_session;
///
/// with_temp_session(|session| {
///     assert!(session.is_setup().unwrap());
/// });
/// ```
pub fn with_temp_session<F, R>(f: F) -> R
where
    F: FnOnce(&Session) -> R,
{
    let db = TestDatabase::new();
    f(&db.session)
}

/// Returns a session bound to `db.json` on an in-memory filesystem.
///
/// The filesystem handle allows fault injection and raw inspection.
pub fn memory_session() -> (Session, Arc<InMemoryFileSystem>) {
    let fs = Arc::new(InMemoryFileSystem::new());
    let mut session = Session::with_store(Store::new(fs.clone(), JsonCodec::pretty()));
    session.use_database(DB_FILE_NAME);
    (session, fs)
}
