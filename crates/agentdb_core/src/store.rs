//! Translation between documents and persisted bytes.

use crate::error::{CoreError, CoreResult, SchemaError};
use crate::schema::{Document, RawDocument};
use agentdb_codec::{Codec, CodecError, JsonCodec};
use agentdb_storage::{FileSystem, OsFileSystem};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Reads and writes whole documents at a path.
///
/// The store holds no per-database state: it pairs a [`FileSystem`] with a
/// [`Codec`] and is handed the path on every call.
///
/// # Example
///
/// ```rust
/// use agentdb_core::{Document, Metadata, Store};
/// use agentdb_storage::InMemoryFileSystem;
/// use agentdb_codec::JsonCodec;
/// use std::path::Path;
/// use std::sync::Arc;
///
/// let store = Store::new(Arc::new(InMemoryFileSystem::new()), JsonCodec::pretty());
/// let path = Path::new("db.json");
/// let document = Document::new(&Metadata::latest("agent", "key"));
///
/// store.write(path, &document).unwrap();
/// assert_eq!(store.read(path).unwrap(), document);
/// ```
pub struct Store<C: Codec = JsonCodec> {
    fs: Arc<dyn FileSystem>,
    codec: C,
}

impl Store<JsonCodec> {
    /// Creates a store over the OS filesystem with pretty JSON.
    #[must_use]
    pub fn os() -> Self {
        Self::new(Arc::new(OsFileSystem::new()), JsonCodec::pretty())
    }
}

impl<C: Codec> Store<C> {
    /// Creates a store from a filesystem and a codec.
    pub fn new(fs: Arc<dyn FileSystem>, codec: C) -> Self {
        Self { fs, codec }
    }

    /// Reads and validates the document at `path`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if no file exists at `path`
    /// - [`CoreError::Schema`] if the content is not a valid document
    /// - [`CoreError::Storage`] on other filesystem failures
    pub fn read(&self, path: &Path) -> CoreResult<Document> {
        let bytes = self.fs.read_file(path)?;
        let raw: RawDocument = self.codec.decode(&bytes).map_err(decode_error)?;
        let document = Document::try_from(raw)?;
        debug!(
            path = %path.display(),
            records = document.records().len(),
            "read document"
        );
        Ok(document)
    }

    /// Atomically replaces the file at `path` with `document`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::Schema`] if the document fails validation
    /// - [`CoreError::Codec`] if the document cannot be encoded
    /// - [`CoreError::Storage`] on filesystem failure
    pub fn write(&self, path: &Path, document: &Document) -> CoreResult<()> {
        document.validate()?;
        let bytes = self.codec.encode(document)?;
        self.fs.write_atomic(path, &bytes)?;
        debug!(
            path = %path.display(),
            records = document.records().len(),
            bytes = bytes.len(),
            "wrote document"
        );
        Ok(())
    }

    /// Returns whether a file exists at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] if existence cannot be determined.
    pub fn exists(&self, path: &Path) -> CoreResult<bool> {
        Ok(self.fs.exists(path)?)
    }
}

impl<C: Codec> fmt::Debug for Store<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("fs", &self.fs)
            .field("codec", &self.codec.name())
            .finish()
    }
}

fn decode_error(err: CodecError) -> CoreError {
    match err {
        CodecError::DecodingFailed { message, .. } | CodecError::EncodingFailed { message } => {
            SchemaError::malformed(message).into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Metadata, Record, Scalar};
    use agentdb_storage::InMemoryFileSystem;
    use serde_json::json;
    use tempfile::tempdir;

    fn memory_store(fs: Arc<InMemoryFileSystem>) -> Store {
        Store::new(fs, JsonCodec::pretty())
    }

    fn sample_document() -> Document {
        Document::from_parts(
            1,
            Scalar::try_from(0.42).unwrap(),
            Scalar::from("sk-test"),
            vec![
                Record::new("system", "You are helpful."),
                Record::new("user", json!({"text": "hi", "n": [1, 2.5, null]})),
            ],
        )
        .unwrap()
    }

    #[test]
    fn write_read_roundtrip_on_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");
        let store = Store::os();

        let document = sample_document();
        store.write(&path, &document).unwrap();

        assert_eq!(store.read(&path).unwrap(), document);
    }

    #[test]
    fn read_missing_is_not_found() {
        let store = memory_store(Arc::new(InMemoryFileSystem::new()));
        let result = store.read(Path::new("db.json"));
        assert!(matches!(result, Err(CoreError::NotFound { .. })));
    }

    #[test]
    fn read_garbage_is_schema_error() {
        let fs = Arc::new(InMemoryFileSystem::with_file("db.json", b"not json".to_vec()));
        let store = memory_store(fs);

        let result = store.read(Path::new("db.json"));
        assert!(matches!(
            result,
            Err(CoreError::Schema(SchemaError::Malformed { .. }))
        ));
    }

    #[test]
    fn read_wrong_version_is_schema_error() {
        let bytes = br#"{"version": 3, "id": 1, "api_key": 2, "records": []}"#.to_vec();
        let fs = Arc::new(InMemoryFileSystem::with_file("db.json", bytes));
        let store = memory_store(fs);

        let result = store.read(Path::new("db.json"));
        assert!(matches!(
            result,
            Err(CoreError::Schema(SchemaError::UnsupportedVersion { found: 3, .. }))
        ));
    }

    #[test]
    fn write_failure_is_storage_error_and_keeps_old_content() {
        let fs = Arc::new(InMemoryFileSystem::new());
        let store = memory_store(Arc::clone(&fs));
        let path = Path::new("db.json");

        let original = Document::new(&Metadata::latest("a", "b"));
        store.write(path, &original).unwrap();

        fs.fail_writes(true);
        let result = store.write(path, &sample_document());
        assert!(matches!(result, Err(CoreError::Storage(_))));

        fs.fail_writes(false);
        assert_eq!(store.read(path).unwrap(), original);
    }

    #[test]
    fn compact_output_reads_back() {
        let fs = Arc::new(InMemoryFileSystem::new());
        let store = Store::new(fs.clone(), JsonCodec::compact());
        let path = Path::new("db.json");

        store.write(path, &sample_document()).unwrap();
        let bytes = fs.read_file(path).unwrap();
        assert!(!bytes.contains(&b'\n'));
        assert_eq!(store.read(path).unwrap(), sample_document());
    }

    #[test]
    fn exists_tracks_writes() {
        let store = memory_store(Arc::new(InMemoryFileSystem::new()));
        let path = Path::new("db.json");

        assert!(!store.exists(path).unwrap());
        store
            .write(path, &Document::new(&Metadata::latest("a", "b")))
            .unwrap();
        assert!(store.exists(path).unwrap());
    }

    #[test]
    fn debug_names_codec() {
        let store = memory_store(Arc::new(InMemoryFileSystem::new()));
        assert!(format!("{store:?}").contains("json"));
    }
}
