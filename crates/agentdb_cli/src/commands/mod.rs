//! CLI command implementations.

pub mod append;
pub mod init;
pub mod inspect;
pub mod verify;

use agentdb_core::Scalar;
use serde_json::{Number, Value};

/// Parses a scalar argument: a JSON number when it reads as one, else text.
pub fn parse_scalar(arg: &str) -> Scalar {
    match serde_json::from_str::<Number>(arg.trim()) {
        Ok(number) => Scalar::Number(number),
        Err(_) => Scalar::from(arg),
    }
}

/// Parses record content: JSON when it parses, else a plain string.
pub fn parse_content(arg: &str) -> Value {
    serde_json::from_str(arg).unwrap_or_else(|_| Value::String(arg.to_string()))
}
