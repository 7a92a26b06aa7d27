//! Reference model of the commit-only transaction semantics.
//!
//! The model tracks what the working copy and the file should contain after
//! each [`TransactionOp`], so property tests can compare a real connection
//! against it step by step.

use crate::generators::TransactionOp;
use agentdb_core::{Connection, CoreError, Record, SchemaError};

/// Expected state of one connection scope.
#[derive(Debug, Clone, Default)]
pub struct CommitModel {
    persisted: Vec<Record>,
    working: Vec<Record>,
}

impl CommitModel {
    /// Starts a model from the records already on disk.
    pub fn new(persisted: Vec<Record>) -> Self {
        Self {
            working: persisted.clone(),
            persisted,
        }
    }

    /// Applies one step to the model.
    pub fn apply(&mut self, op: &TransactionOp) {
        match op {
            TransactionOp::Add(record) => self.working.push(record.clone()),
            TransactionOp::AddInvalid => {}
            TransactionOp::Commit => self.persisted = self.working.clone(),
        }
    }

    /// Records the file should hold.
    pub fn persisted(&self) -> &[Record] {
        &self.persisted
    }

    /// Records the working copy should hold.
    pub fn working(&self) -> &[Record] {
        &self.working
    }

    /// Applies `ops` to both the model and `conn`, checking each result.
    pub fn run(&mut self, conn: &mut Connection<'_>, ops: &[TransactionOp]) {
        for op in ops {
            match op {
                TransactionOp::Add(record) => {
                    conn.add(record.clone()).expect("valid record accepted");
                }
                TransactionOp::AddInvalid => {
                    let result = conn.add(Record::new("", "invalid"));
                    assert!(
                        matches!(result, Err(CoreError::Schema(SchemaError::EmptyRole))),
                        "empty role must be rejected, got {result:?}"
                    );
                }
                TransactionOp::Commit => conn.commit().expect("commit succeeds"),
            }
            self.apply(op);
            assert_eq!(conn.records().expect("connection is open"), self.working());
        }
    }
}
