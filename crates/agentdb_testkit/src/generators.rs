//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random schema values that satisfy the
//! document invariants, plus operation sequences for transaction tests.

use agentdb_core::{Document, Metadata, Record, Scalar, LATEST_VERSION};
use proptest::prelude::*;
use serde_json::{Number, Value};

/// Strategy for finite floats that stay readable in a JSON file.
fn finite_f64_strategy() -> impl Strategy<Value = f64> {
    -1.0e9f64..1.0e9f64
}

/// Strategy for `id` / `api_key` values.
pub fn scalar_strategy() -> impl Strategy<Value = Scalar> {
    prop_oneof![
        prop::string::string_regex("[a-zA-Z0-9_-]{0,24}")
            .expect("Invalid regex")
            .prop_map(Scalar::from),
        any::<i64>().prop_map(Scalar::from),
        finite_f64_strategy()
            .prop_map(|f| Scalar::try_from(f).expect("finite float is a valid scalar")),
    ]
}

/// Strategy for arbitrary JSON record content, nested up to three levels.
pub fn json_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        finite_f64_strategy().prop_filter_map("finite float", |f| {
            Number::from_f64(f).map(Value::Number)
        }),
        prop::string::string_regex("[ -~]{0,16}")
            .expect("Invalid regex")
            .prop_map(Value::String),
    ];

    leaf.prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

/// Strategy for valid (non-empty) roles.
pub fn role_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("system".to_string()),
        Just("user".to_string()),
        Just("assistant".to_string()),
        Just("tool".to_string()),
        prop::string::string_regex("[a-z]{1,12}").expect("Invalid regex"),
    ]
}

/// Strategy for valid records.
pub fn record_strategy() -> impl Strategy<Value = Record> {
    (role_strategy(), json_value_strategy()).prop_map(|(role, content)| Record::new(role, content))
}

/// Strategy for setup metadata at the latest version.
pub fn metadata_strategy() -> impl Strategy<Value = Metadata> {
    (scalar_strategy(), scalar_strategy()).prop_map(|(id, api_key)| Metadata::latest(id, api_key))
}

/// Strategy for valid documents with up to `max_records` records.
pub fn document_strategy(max_records: usize) -> impl Strategy<Value = Document> {
    (
        scalar_strategy(),
        scalar_strategy(),
        prop::collection::vec(record_strategy(), 0..=max_records),
    )
        .prop_map(|(id, api_key, records)| {
            Document::from_parts(LATEST_VERSION, id, api_key, records)
                .expect("generated document is valid")
        })
}

/// One step applied to an open connection.
#[derive(Debug, Clone)]
pub enum TransactionOp {
    /// Add a valid record.
    Add(Record),
    /// Add a record with an empty role; must be rejected.
    AddInvalid,
    /// Commit the working copy.
    Commit,
}

/// Strategy for a single transaction step.
pub fn transaction_op_strategy() -> impl Strategy<Value = TransactionOp> {
    prop_oneof![
        6 => record_strategy().prop_map(TransactionOp::Add),
        1 => Just(TransactionOp::AddInvalid),
        2 => Just(TransactionOp::Commit),
    ]
}

/// Strategy for a sequence of transaction steps.
pub fn transaction_ops_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<TransactionOp>> {
    prop::collection::vec(transaction_op_strategy(), min_ops..max_ops)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
