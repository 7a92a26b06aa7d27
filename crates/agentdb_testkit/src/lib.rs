//! # AgentDB Testkit
//!
//! Test utilities for AgentDB.
//!
//! This crate provides:
//! - Test fixtures: temporary databases bound to a fresh [`agentdb_core::Session`]
//! - Property-based test generators using proptest
//! - A reference model of the commit-only transaction semantics
//!
//! ## Usage
//!
//! ```rust
//! use agentdb_testkit::prelude::*;
//! use agentdb_core::{CoreResult, Record};
//!
//! let db = TestDatabase::new();
//! db.transaction(|conn| -> CoreResult<()> {
//!     conn.add(Record::new("system", 0))?;
//!     conn.commit()
//! })
//! .unwrap();
//! assert_eq!(db.read_back().records().len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod model;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::model::*;
}

pub use fixtures::*;
pub use generators::*;
pub use model::*;
