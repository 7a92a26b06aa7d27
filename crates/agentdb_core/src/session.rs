//! Session: the binding to one database file.

use crate::config::Config;
use crate::connection::Connection;
use crate::error::{CoreError, CoreResult};
use crate::schema::{Document, Metadata};
use crate::store::Store;
use agentdb_codec::{Codec, JsonCodec, JsonStyle};
use agentdb_storage::OsFileSystem;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Binds one database file and hands out transaction scopes over it.
///
/// The embedding application creates a session once and passes it by
/// reference to whatever needs the database. At most one path is bound at a
/// time; binding again replaces the previous path.
///
/// Open connections borrow the session, so the binding cannot change while
/// any connection from it is still alive.
///
/// # Example
///
/// ```rust
/// use agentdb_core::{CoreResult, Metadata, Record, Session};
///
/// # fn main() -> CoreResult<()> {
/// # let dir = tempfile::tempdir().unwrap();
/// let mut session = Session::new();
/// session.use_database(dir.path().join("db.json"));
/// session.setup(&Metadata::latest("agent-1", "sk-test"))?;
///
/// session.transaction(|conn| -> CoreResult<()> {
///     conn.add(Record::new("system", "You are helpful."))?;
///     conn.commit()
/// })?;
///
/// assert_eq!(session.read()?.records().len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Session<C: Codec = JsonCodec> {
    store: Store<C>,
    db_path: Option<PathBuf>,
}

impl Session<JsonCodec> {
    /// Creates an unbound session over the OS filesystem with default
    /// configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    /// Creates an unbound session over the OS filesystem.
    #[must_use]
    pub fn with_config(config: &Config) -> Self {
        let fs = OsFileSystem::new()
            .sync(config.sync_on_write)
            .create_parent_dirs(config.create_parent_dirs);
        let style = if config.pretty {
            JsonStyle::Pretty
        } else {
            JsonStyle::Compact
        };
        Self::with_store(Store::new(Arc::new(fs), JsonCodec::new(style)))
    }

    /// Creates a session already bound to `path`.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut session = Self::new();
        session.use_database(path);
        session
    }
}

impl Default for Session<JsonCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Codec> Session<C> {
    /// Creates an unbound session over a custom store.
    pub fn with_store(store: Store<C>) -> Self {
        Self {
            store,
            db_path: None,
        }
    }

    /// Binds the session to `path`, replacing any previous binding.
    pub fn use_database(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        let path = path.into();
        debug!(
            path = %path.display(),
            previous = ?self.db_path,
            "binding database"
        );
        self.db_path = Some(path);
        self
    }

    /// Drops the binding, returning the previously bound path.
    pub fn clear(&mut self) -> Option<PathBuf> {
        self.db_path.take()
    }

    /// Returns true if a path is bound.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.db_path.is_some()
    }

    /// Returns the bound path.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotBound`] if no path is bound.
    pub fn db_path(&self) -> CoreResult<&Path> {
        self.db_path.as_deref().ok_or(CoreError::NotBound)
    }

    /// Returns true if the bound path holds a valid document.
    ///
    /// A missing file or a file that fails validation both count as not set
    /// up.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotBound`] if no path is bound
    /// - [`CoreError::Storage`] if the file exists but cannot be read
    pub fn is_setup(&self) -> CoreResult<bool> {
        match self.store.read(self.db_path()?) {
            Ok(_) => Ok(true),
            Err(CoreError::NotFound { .. } | CoreError::Schema(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Creates the database: writes an empty document built from `metadata`.
    ///
    /// Existing content is never overwritten.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotBound`] if no path is bound
    /// - [`CoreError::AlreadySetup`] if a valid document already exists
    /// - [`CoreError::Schema`] if a file exists that is not a valid document
    /// - [`CoreError::Storage`] if the write fails
    pub fn setup(&self, metadata: &Metadata) -> CoreResult<Document> {
        let path = self.db_path()?;
        match self.store.read(path) {
            Ok(_) => {
                return Err(CoreError::AlreadySetup {
                    path: path.to_path_buf(),
                })
            }
            Err(CoreError::NotFound { .. }) => {}
            Err(err) => return Err(err),
        }

        let document = Document::new(metadata);
        self.store.write(path, &document)?;
        debug!(
            path = %path.display(),
            version = document.version(),
            "set up database"
        );
        Ok(document)
    }

    /// Reads a snapshot of the current on-disk document.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotBound`] if no path is bound
    /// - any error of [`Store::read`]
    pub fn read(&self) -> CoreResult<Document> {
        self.store.read(self.db_path()?)
    }

    /// Opens a connection over the current document.
    ///
    /// The connection discards its working copy when dropped unless
    /// [`Connection::commit`] was called.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotBound`] if no path is bound
    /// - any error of [`Store::read`]
    pub fn connect(&self) -> CoreResult<Connection<'_, C>> {
        Connection::open(&self.store, self.db_path()?.to_path_buf())
    }

    /// Runs `f` with a freshly opened connection.
    ///
    /// The connection is closed on every exit path. Nothing is written unless
    /// `f` calls [`Connection::commit`]; returning an error after a commit
    /// does not undo it.
    ///
    /// # Errors
    ///
    /// Returns the error of `f`, or the [`CoreError`] from opening the
    /// connection converted into `E`.
    pub fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Connection<'_, C>) -> Result<T, E>,
        E: From<CoreError>,
    {
        let mut conn = self.connect()?;
        let result = f(&mut conn);
        conn.close();
        result
    }

    /// Wraps `f` so that every call runs inside its own [`Self::transaction`].
    ///
    /// The returned closure takes the caller's arguments and injects the
    /// connection as the second parameter of `f`.
    ///
    /// ```rust
    /// use agentdb_core::{Connection, CoreResult, Metadata, Record, Session};
    ///
    /// # fn main() -> CoreResult<()> {
    /// # let dir = tempfile::tempdir().unwrap();
    /// let session = Session::open(dir.path().join("db.json"));
    /// session.setup(&Metadata::latest(1_i64, 2_i64))?;
    ///
    /// let mut log = session.wrap(|text: &str, conn: &mut Connection<'_>| -> CoreResult<usize> {
    ///     conn.add(Record::new("user", text))?;
    ///     conn.commit()?;
    ///     Ok(conn.records()?.len())
    /// });
    ///
    /// assert_eq!(log("hello")?, 1);
    /// assert_eq!(log("again")?, 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn wrap<'a, A, T, E, F>(&'a self, mut f: F) -> impl FnMut(A) -> Result<T, E> + 'a
    where
        F: FnMut(A, &mut Connection<'_, C>) -> Result<T, E> + 'a,
        E: From<CoreError>,
    {
        move |args| self.transaction(|conn| f(args, conn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;
    use crate::schema::{Record, Scalar, LATEST_VERSION};
    use agentdb_storage::{FileSystem, InMemoryFileSystem};
    use tempfile::tempdir;

    fn memory_session(fs: &Arc<InMemoryFileSystem>) -> Session {
        let mut session = Session::with_store(Store::new(fs.clone(), JsonCodec::pretty()));
        session.use_database("db.json");
        session
    }

    #[test]
    fn unbound_session_rejects_operations() {
        let session = Session::new();

        assert!(!session.is_bound());
        assert!(matches!(session.db_path(), Err(CoreError::NotBound)));
        assert!(matches!(session.is_setup(), Err(CoreError::NotBound)));
        assert!(matches!(
            session.setup(&Metadata::latest("a", "b")),
            Err(CoreError::NotBound)
        ));
        assert!(matches!(session.connect(), Err(CoreError::NotBound)));
        assert!(matches!(session.read(), Err(CoreError::NotBound)));
    }

    #[test]
    fn use_database_rebinds() {
        let mut session = Session::new();
        session.use_database("first.json");
        session.use_database("second.json");
        assert_eq!(session.db_path().unwrap(), Path::new("second.json"));

        assert_eq!(session.clear(), Some(PathBuf::from("second.json")));
        assert!(!session.is_bound());
    }

    #[test]
    fn setup_on_disk() {
        let dir = tempdir().unwrap();
        let session = Session::open(dir.path().join("db.json"));
        assert!(!session.is_setup().unwrap());

        let metadata = Metadata::latest(Scalar::try_from(0.42).unwrap(), "key");
        let created = session.setup(&metadata).unwrap();

        assert!(session.is_setup().unwrap());
        assert_eq!(session.read().unwrap(), created);
        assert_eq!(created.version(), LATEST_VERSION);
        assert_eq!(created.id().as_f64(), Some(0.42));
        assert!(created.records().is_empty());
    }

    #[test]
    fn second_setup_fails_and_keeps_data() {
        let fs = Arc::new(InMemoryFileSystem::new());
        let session = memory_session(&fs);
        session.setup(&Metadata::latest("a", "b")).unwrap();

        session
            .transaction(|conn| -> CoreResult<()> {
                conn.add(Record::new("system", 1))?;
                conn.commit()
            })
            .unwrap();

        let result = session.setup(&Metadata::latest("c", "d"));
        assert!(matches!(result, Err(CoreError::AlreadySetup { .. })));

        let document = session.read().unwrap();
        assert_eq!(document.id(), &Scalar::from("a"));
        assert_eq!(document.records().len(), 1);
    }

    #[test]
    fn setup_refuses_to_clobber_invalid_file() {
        let fs = Arc::new(InMemoryFileSystem::with_file("db.json", b"{oops".to_vec()));
        let session = memory_session(&fs);

        assert!(!session.is_setup().unwrap());
        let result = session.setup(&Metadata::latest("a", "b"));
        assert!(matches!(
            result,
            Err(CoreError::Schema(SchemaError::Malformed { .. }))
        ));
        assert_eq!(fs.read_file(Path::new("db.json")).unwrap(), b"{oops");
    }

    #[test]
    fn connect_before_setup_is_not_found() {
        let fs = Arc::new(InMemoryFileSystem::new());
        let session = memory_session(&fs);
        assert!(matches!(session.connect(), Err(CoreError::NotFound { .. })));
    }

    #[test]
    fn is_setup_passes_through_read_failures() {
        let dir = tempdir().unwrap();
        let session = Session::open(dir.path());

        assert!(matches!(session.is_setup(), Err(CoreError::Storage(_))));
    }

    #[test]
    fn commit_into_removed_directory_is_storage_error() {
        let dir = tempdir().unwrap();
        let parent = dir.path().join("sub");
        let path = parent.join("db.json");
        let mut session = Session::with_config(&Config::new().create_parent_dirs(false));
        session.use_database(&path);

        std::fs::create_dir(&parent).unwrap();
        session.setup(&Metadata::latest("a", "b")).unwrap();
        let mut conn = session.connect().unwrap();
        conn.add(Record::new("system", "x")).unwrap();
        std::fs::remove_dir_all(&parent).unwrap();

        match conn.commit() {
            Err(CoreError::Storage(err)) => assert!(err.to_string().contains("db.json")),
            other => panic!("expected storage error, got {other:?}"),
        }
        assert_eq!(conn.pending().unwrap(), 1);
    }

    #[test]
    fn transaction_without_commit_discards() {
        let fs = Arc::new(InMemoryFileSystem::new());
        let session = memory_session(&fs);
        session.setup(&Metadata::latest("a", "b")).unwrap();

        let seen = session
            .transaction(|conn| -> CoreResult<usize> {
                conn.add(Record::new("system", "x"))?;
                Ok(conn.records()?.len())
            })
            .unwrap();

        assert_eq!(seen, 1);
        assert!(session.read().unwrap().records().is_empty());
    }

    #[test]
    fn transaction_error_discards_uncommitted() {
        let fs = Arc::new(InMemoryFileSystem::new());
        let session = memory_session(&fs);
        session.setup(&Metadata::latest("a", "b")).unwrap();

        let result = session.transaction(|conn| -> CoreResult<()> {
            conn.add(Record::new("system", "kept"))?;
            conn.commit()?;
            conn.add(Record::new("system", "dropped"))?;
            conn.add(Record::new("", "invalid"))
        });

        assert!(matches!(
            result,
            Err(CoreError::Schema(SchemaError::EmptyRole))
        ));
        let records = session.read().unwrap().records().to_vec();
        assert_eq!(records, vec![Record::new("system", "kept")]);
    }

    #[test]
    fn transaction_converts_open_errors() {
        #[derive(Debug)]
        enum AppError {
            Db(CoreError),
        }
        impl From<CoreError> for AppError {
            fn from(err: CoreError) -> Self {
                Self::Db(err)
            }
        }

        let session = Session::new();
        let result = session.transaction(|_conn| Ok::<_, AppError>(()));
        assert!(matches!(result, Err(AppError::Db(CoreError::NotBound))));
    }

    #[test]
    fn wrap_opens_fresh_connection_per_call() {
        let fs = Arc::new(InMemoryFileSystem::new());
        let session = memory_session(&fs);
        session.setup(&Metadata::latest("a", "b")).unwrap();

        let mut append = session.wrap(|n: i64, conn: &mut Connection<'_>| -> CoreResult<usize> {
            conn.add(Record::new("system", n))?;
            if n % 2 == 0 {
                conn.commit()?;
            }
            Ok(conn.records()?.len())
        });

        assert_eq!(append(0).unwrap(), 1);
        assert_eq!(append(1).unwrap(), 2);
        assert_eq!(append(2).unwrap(), 2);

        let contents: Vec<_> = session
            .read()
            .unwrap()
            .records()
            .iter()
            .map(|r| r.content.clone())
            .collect();
        assert_eq!(contents, vec![serde_json::json!(0), serde_json::json!(2)]);
    }

    #[test]
    fn compact_config_writes_single_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");
        let mut session = Session::with_config(&Config::new().pretty(false).sync_on_write(false));
        session.use_database(&path);
        session.setup(&Metadata::latest("a", "b")).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains('\n'));
    }
}
