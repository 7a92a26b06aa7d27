//! # AgentDB Core
//!
//! A file-backed, versioned store for ordered records such as agent
//! conversation messages.
//!
//! This crate provides:
//! - The document schema ([`Document`], [`Record`], [`Metadata`]) and its
//!   version check
//! - The [`Store`], which reads and atomically writes whole documents
//! - The [`Session`], which binds one database file and opens transaction
//!   scopes over it
//! - The [`Connection`], an in-memory working copy that only reaches disk on
//!   an explicit [`Connection::commit`]
//!
//! ## Transaction model
//!
//! Every scope reads the full document into memory. `add` only touches the
//! working copy. `commit` writes the whole working copy back, and may be
//! called any number of times. Leaving the scope without committing
//! discards everything added since the last commit; that is the only form
//! of rollback.
//!
//! ```rust
//! use agentdb_core::{CoreResult, Metadata, Record, Session};
//!
//! # fn main() -> CoreResult<()> {
//! # let dir = tempfile::tempdir().unwrap();
//! let session = Session::open(dir.path().join("db.json"));
//! session.setup(&Metadata::latest("agent", "sk-test"))?;
//!
//! {
//!     let mut conn = session.connect()?;
//!     conn.add(Record::new("system", "not committed"))?;
//! }
//! assert!(session.read()?.records().is_empty());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod connection;
mod error;
mod schema;
mod session;
mod store;

pub use config::Config;
pub use connection::Connection;
pub use error::{CoreError, CoreResult, SchemaError};
pub use schema::{
    check_version, Document, Metadata, Record, Scalar, LATEST_VERSION, SUPPORTED_VERSIONS,
};
pub use session::Session;
pub use store::Store;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
