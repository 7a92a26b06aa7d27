//! # AgentDB Codec
//!
//! Encoding abstraction for AgentDB documents.
//!
//! The store never formats bytes itself: it hands a serde-serializable value
//! to a [`Codec`] and gets bytes back, and the reverse on load. The shipped
//! codec is [`JsonCodec`], which produces human-readable JSON that
//! round-trips every finite number exactly.
//!
//! ## Usage
//!
//! ```
//! use agentdb_codec::{Codec, JsonCodec};
//! use serde_json::json;
//!
//! let codec = JsonCodec::compact();
//! let bytes = codec.encode(&json!({"role": "system"})).unwrap();
//! assert_eq!(bytes, br#"{"role":"system"}"#);
//!
//! let decoded: serde_json::Value = codec.decode(&bytes).unwrap();
//! assert_eq!(decoded["role"], "system");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod json;

pub use error::{CodecError, CodecResult};
pub use json::{JsonCodec, JsonStyle};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A structured encoding used to persist documents.
///
/// Implementations must satisfy `decode(encode(x)) == x` for every value
/// they accept.
pub trait Codec: Send + Sync {
    /// Short name of the encoding, e.g. `"json"`.
    fn name(&self) -> &'static str;

    /// Encodes a value to bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::EncodingFailed`] if the value cannot be
    /// represented in this encoding.
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> CodecResult<Vec<u8>>;

    /// Decodes bytes into a value.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::DecodingFailed`] if the bytes are not valid in
    /// this encoding or do not match the shape of `T`.
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> CodecResult<T>;
}
