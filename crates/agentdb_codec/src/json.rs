//! JSON codec.

use crate::error::{CodecError, CodecResult};
use crate::Codec;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Output layout for [`JsonCodec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// Indented, one field per line, with a trailing newline.
    #[default]
    Pretty,
    /// Single line without whitespace.
    Compact,
}

/// Codec producing human-readable JSON.
///
/// Decoding accepts either style regardless of how the codec is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    style: JsonStyle,
}

impl JsonCodec {
    /// Creates a codec with the given output style.
    #[must_use]
    pub const fn new(style: JsonStyle) -> Self {
        Self { style }
    }

    /// Creates a pretty-printing codec.
    #[must_use]
    pub const fn pretty() -> Self {
        Self::new(JsonStyle::Pretty)
    }

    /// Creates a compact codec.
    #[must_use]
    pub const fn compact() -> Self {
        Self::new(JsonStyle::Compact)
    }

    /// Returns the output style.
    #[must_use]
    pub const fn style(&self) -> JsonStyle {
        self.style
    }
}

impl Codec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> CodecResult<Vec<u8>> {
        let encoded = match self.style {
            JsonStyle::Pretty => serde_json::to_vec_pretty(value).map(|mut bytes| {
                bytes.push(b'\n');
                bytes
            }),
            JsonStyle::Compact => serde_json::to_vec(value),
        };
        encoded.map_err(|e| CodecError::encoding_failed(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> CodecResult<T> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::DecodingFailed {
            message: e.to_string(),
            line: e.line(),
            column: e.column(),
        })
    }
}
