//! In-memory transaction scope over one document.

use crate::error::{CoreError, CoreResult};
use crate::schema::{Document, Record, Scalar};
use crate::store::Store;
use agentdb_codec::{Codec, JsonCodec};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A mutable working copy of a document for the duration of one scope.
///
/// Connections are opened by [`crate::Session::connect`] (or the
/// `transaction` / `wrap` helpers), which read the current document from the
/// store. Mutations stay in memory until [`Connection::commit`] writes the
/// whole working copy back. Anything not committed is discarded when the
/// connection is closed or dropped.
///
/// A connection built with [`Connection::unbound`] was never opened against
/// a document and rejects every operation with
/// [`CoreError::UnboundConnection`].
///
/// # States
///
/// ```text
/// Unbound ──(rejects everything)
/// Open ──add/commit──> Open ──close/drop──> Closed
/// ```
///
/// Closing consumes the connection, so a closed connection cannot be reused.
pub struct Connection<'s, C: Codec = JsonCodec> {
    state: State<'s, C>,
}

enum State<'s, C: Codec> {
    Unbound,
    Open(OpenConnection<'s, C>),
}

struct OpenConnection<'s, C: Codec> {
    store: &'s Store<C>,
    path: PathBuf,
    document: Document,
    /// Records added since the last commit.
    pending: usize,
}

impl<'s, C: Codec> Connection<'s, C> {
    /// Opens a connection by reading the document at `path`.
    pub(crate) fn open(store: &'s Store<C>, path: PathBuf) -> CoreResult<Self> {
        let document = store.read(&path)?;
        debug!(
            path = %path.display(),
            records = document.records().len(),
            "opened connection"
        );
        Ok(Self {
            state: State::Open(OpenConnection {
                store,
                path,
                document,
                pending: 0,
            }),
        })
    }

    /// Creates a connection that is not bound to any document.
    #[must_use]
    pub fn unbound() -> Self {
        Self {
            state: State::Unbound,
        }
    }

    /// Returns true if the connection holds a working copy.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Open(_))
    }

    /// Validates `record` and appends it to the working copy.
    ///
    /// Nothing is written to disk.
    ///
    /// # Errors
    ///
    /// - [`CoreError::UnboundConnection`] if the connection is unbound
    /// - [`CoreError::Schema`] if the record is invalid
    pub fn add(&mut self, record: Record) -> CoreResult<()> {
        let open = self.open_mut("add")?;
        record.validate()?;
        open.document.push(record);
        open.pending += 1;
        Ok(())
    }

    /// Parses an untyped JSON value as a record and appends it.
    ///
    /// # Errors
    ///
    /// - [`CoreError::UnboundConnection`] if the connection is unbound
    /// - [`CoreError::Schema`] if the value is not a valid record
    pub fn add_value(&mut self, value: Value) -> CoreResult<()> {
        self.open_mut("add")?;
        self.add(Record::from_value(value)?)
    }

    /// Persists the full working copy through the store.
    ///
    /// May be called any number of times; each call writes the latest state.
    ///
    /// # Errors
    ///
    /// - [`CoreError::UnboundConnection`] if the connection is unbound
    /// - [`CoreError::Storage`] or [`CoreError::Codec`] if the write fails,
    ///   in which case the file keeps its previous content and the working
    ///   copy is left untouched
    pub fn commit(&mut self) -> CoreResult<()> {
        let open = self.open_mut("commit")?;
        open.store.write(&open.path, &open.document)?;
        debug!(
            path = %open.path.display(),
            records = open.document.records().len(),
            newly_committed = open.pending,
            "committed"
        );
        open.pending = 0;
        Ok(())
    }

    /// Returns the working copy.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnboundConnection`] if the connection is unbound.
    pub fn document(&self) -> CoreResult<&Document> {
        Ok(&self.open_ref("read document")?.document)
    }

    /// Returns the records of the working copy in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnboundConnection`] if the connection is unbound.
    pub fn records(&self) -> CoreResult<&[Record]> {
        Ok(self.open_ref("read records")?.document.records())
    }

    /// Returns the document identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnboundConnection`] if the connection is unbound.
    pub fn id(&self) -> CoreResult<&Scalar> {
        Ok(self.open_ref("read id")?.document.id())
    }

    /// Returns the document API key.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnboundConnection`] if the connection is unbound.
    pub fn api_key(&self) -> CoreResult<&Scalar> {
        Ok(self.open_ref("read api_key")?.document.api_key())
    }

    /// Returns the document schema version.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnboundConnection`] if the connection is unbound.
    pub fn version(&self) -> CoreResult<u32> {
        Ok(self.open_ref("read version")?.document.version())
    }

    /// Returns the path the connection was opened against.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnboundConnection`] if the connection is unbound.
    pub fn path(&self) -> CoreResult<&Path> {
        Ok(&self.open_ref("read path")?.path)
    }

    /// Returns how many records were added since the last commit.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnboundConnection`] if the connection is unbound.
    pub fn pending(&self) -> CoreResult<usize> {
        Ok(self.open_ref("read pending count")?.pending)
    }

    /// Closes the connection, discarding any uncommitted records.
    pub fn close(self) {
        drop(self);
    }

    fn open_ref(&self, operation: &'static str) -> CoreResult<&OpenConnection<'s, C>> {
        match &self.state {
            State::Open(open) => Ok(open),
            State::Unbound => Err(CoreError::unbound_connection(operation)),
        }
    }

    fn open_mut(&mut self, operation: &'static str) -> CoreResult<&mut OpenConnection<'s, C>> {
        match &mut self.state {
            State::Open(open) => Ok(open),
            State::Unbound => Err(CoreError::unbound_connection(operation)),
        }
    }
}

impl<C: Codec> Default for Connection<'_, C> {
    fn default() -> Self {
        Self::unbound()
    }
}

impl<C: Codec> Drop for Connection<'_, C> {
    fn drop(&mut self) {
        if let State::Open(open) = &self.state {
            if open.pending > 0 {
                debug!(
                    path = %open.path.display(),
                    discarded = open.pending,
                    "closing connection with uncommitted records"
                );
            }
        }
    }
}

impl<C: Codec> fmt::Debug for Connection<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            State::Unbound => f.debug_struct("Connection").field("state", &"unbound").finish(),
            State::Open(open) => f
                .debug_struct("Connection")
                .field("state", &"open")
                .field("path", &open.path)
                .field("records", &open.document.records().len())
                .field("pending", &open.pending)
                .finish(),
        }
    }
}
