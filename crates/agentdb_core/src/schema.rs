//! Document, record, and metadata schema.
//!
//! The persisted document looks like:
//!
//! ```json
//! {
//!   "version": 1,
//!   "id": "agent-7",
//!   "api_key": 0.17,
//!   "records": [{"role": "system", "content": "You are helpful."}]
//! }
//! ```
//!
//! Loading goes through a permissive raw shape first and then through
//! validation, so every failure surfaces as a [`SchemaError`] that names what
//! was wrong.

use crate::error::SchemaError;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Number, Value};
use std::fmt;

/// Schema version written by this build.
pub const LATEST_VERSION: u32 = 1;

/// Schema versions this build can load.
pub const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Checks that `version` is one this build recognizes.
///
/// # Errors
///
/// Returns [`SchemaError::UnsupportedVersion`] otherwise.
pub fn check_version(version: u32) -> Result<(), SchemaError> {
    if SUPPORTED_VERSIONS.contains(&version) {
        Ok(())
    } else {
        Err(SchemaError::UnsupportedVersion {
            found: version,
            supported: SUPPORTED_VERSIONS,
        })
    }
}

/// An opaque `id` or `api_key` value: a JSON string or a finite JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub enum Scalar {
    /// A string value.
    Text(String),
    /// A numeric value.
    Number(Number),
}

impl Scalar {
    /// Validates an untyped JSON value as the scalar field `field`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidScalar`] for anything other than a
    /// string or number.
    pub fn from_value(field: &'static str, value: Value) -> Result<Self, SchemaError> {
        match value {
            Value::String(text) => Ok(Self::Text(text)),
            Value::Number(number) => Ok(Self::Number(number)),
            _ => Err(SchemaError::InvalidScalar { field }),
        }
    }

    /// Returns the string value, if this is text.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Number(_) => None,
        }
    }

    /// Returns the value as a float, if this is a number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Text(_) => None,
            Self::Number(number) => number.as_f64(),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(text) => serializer.serialize_str(text),
            Self::Number(number) => number.serialize(serializer),
        }
    }
}

impl TryFrom<Value> for Scalar {
    type Error = SchemaError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value("scalar", value)
    }
}

impl TryFrom<f64> for Scalar {
    type Error = SchemaError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Number::from_f64(value)
            .map(Self::Number)
            .ok_or(SchemaError::InvalidScalar { field: "scalar" })
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

/// One stored entry, such as a conversation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRecord")]
pub struct Record {
    /// Who produced the entry, e.g. `"system"` or `"user"`.
    pub role: String,
    /// Arbitrary JSON payload.
    pub content: Value,
}

#[derive(Deserialize)]
struct RawRecord {
    role: String,
    content: Value,
}

impl TryFrom<RawRecord> for Record {
    type Error = SchemaError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let record = Self {
            role: raw.role,
            content: raw.content,
        };
        record.validate()?;
        Ok(record)
    }
}

impl Record {
    /// Creates a record. Validation happens when it is added to a connection.
    pub fn new(role: impl Into<String>, content: impl Into<Value>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Parses an untyped JSON value as a record.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Malformed`] if `role` or `content` is missing
    /// or `role` is not a string, and [`SchemaError::EmptyRole`] if the role
    /// is empty.
    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        let raw: RawRecord = serde_json::from_value(value)
            .map_err(|e| SchemaError::malformed(format!("invalid record: {e}")))?;
        Self::try_from(raw)
    }

    /// Checks the record's invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::EmptyRole`] if the role is empty.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.role.is_empty() {
            return Err(SchemaError::EmptyRole);
        }
        Ok(())
    }
}

/// Input to `setup`: the fields needed to create a new database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    id: Scalar,
    api_key: Scalar,
    version: u32,
}

impl Metadata {
    /// Creates metadata stamped with [`LATEST_VERSION`].
    pub fn latest(id: impl Into<Scalar>, api_key: impl Into<Scalar>) -> Self {
        Self {
            id: id.into(),
            api_key: api_key.into(),
            version: LATEST_VERSION,
        }
    }

    /// Creates metadata with an explicit schema version.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnsupportedVersion`] if the version is not
    /// recognized.
    pub fn with_version(
        id: impl Into<Scalar>,
        api_key: impl Into<Scalar>,
        version: u32,
    ) -> Result<Self, SchemaError> {
        check_version(version)?;
        Ok(Self {
            id: id.into(),
            api_key: api_key.into(),
            version,
        })
    }

    /// Returns the identifier.
    #[must_use]
    pub fn id(&self) -> &Scalar {
        &self.id
    }

    /// Returns the API key.
    #[must_use]
    pub fn api_key(&self) -> &Scalar {
        &self.api_key
    }

    /// Returns the schema version.
    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }
}

/// The full persisted database state.
///
/// `id` and `api_key` are fixed once the document exists; only the record
/// list can grow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDocument")]
pub struct Document {
    version: u32,
    id: Scalar,
    api_key: Scalar,
    records: Vec<Record>,
}

/// Permissive shape used before validation.
#[derive(Deserialize)]
pub(crate) struct RawDocument {
    version: u32,
    id: Value,
    api_key: Value,
    #[serde(alias = "agents")]
    records: Vec<Value>,
}

impl TryFrom<RawDocument> for Document {
    type Error = SchemaError;

    fn try_from(raw: RawDocument) -> Result<Self, Self::Error> {
        check_version(raw.version)?;
        let records = raw
            .records
            .into_iter()
            .map(Record::from_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            version: raw.version,
            id: Scalar::from_value("id", raw.id)?,
            api_key: Scalar::from_value("api_key", raw.api_key)?,
            records,
        })
    }
}

impl Document {
    /// Creates an empty document from setup metadata.
    #[must_use]
    pub fn new(metadata: &Metadata) -> Self {
        Self {
            version: metadata.version,
            id: metadata.id.clone(),
            api_key: metadata.api_key.clone(),
            records: Vec::new(),
        }
    }

    /// Builds a document from its parts, validating each.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if the version is unknown or a record is
    /// invalid.
    pub fn from_parts(
        version: u32,
        id: Scalar,
        api_key: Scalar,
        records: Vec<Record>,
    ) -> Result<Self, SchemaError> {
        let document = Self {
            version,
            id,
            api_key,
            records,
        };
        document.validate()?;
        Ok(document)
    }

    /// Checks the document's invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if the version is unknown or a record is
    /// invalid.
    pub fn validate(&self) -> Result<(), SchemaError> {
        check_version(self.version)?;
        self.records.iter().try_for_each(Record::validate)
    }

    /// Returns the schema version.
    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Returns the identifier.
    #[must_use]
    pub fn id(&self) -> &Scalar {
        &self.id
    }

    /// Returns the API key.
    #[must_use]
    pub fn api_key(&self) -> &Scalar {
        &self.api_key
    }

    /// Returns the records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub(crate) fn push(&mut self, record: Record) {
        self.records.push(record);
    }
}
