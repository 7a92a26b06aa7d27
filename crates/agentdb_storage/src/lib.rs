//! # AgentDB Storage
//!
//! Filesystem abstraction for AgentDB.
//!
//! This crate is the only place where AgentDB touches the filesystem.
//! Backends are **opaque whole-file stores**: they read a file fully,
//! replace a file atomically, and answer whether a file exists. They know
//! nothing about the document format stored inside.
//!
//! ## Design Principles
//!
//! - Whole-file operations only (no offsets, no appends)
//! - Writes are atomic: readers observe either the old or the new content
//! - No handle is held between calls
//! - Must be `Send + Sync` so a backend can be shared behind an `Arc`
//!
//! ## Available Backends
//!
//! - [`OsFileSystem`] - For persistent storage using OS file APIs
//! - [`InMemoryFileSystem`] - For testing, with write fault injection
//!
//! ## Example
//!
//! ```rust
//! use agentdb_storage::{FileSystem, InMemoryFileSystem};
//! use std::path::Path;
//!
//! let fs = InMemoryFileSystem::new();
//! let path = Path::new("db.json");
//! fs.write_atomic(path, b"{}").unwrap();
//! assert_eq!(fs.read_file(path).unwrap(), b"{}");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod filesystem;
mod memory;
mod os;

pub use error::{StorageError, StorageResult};
pub use filesystem::FileSystem;
pub use memory::InMemoryFileSystem;
pub use os::OsFileSystem;
