//! JSON interchange codec for whole collections.
//!
//! # Responsibility
//! - Encode a collection as a pretty-printed JSON array (2-space indent).
//! - Decode text into a typed collection, all-or-nothing.
//!
//! # Invariants
//! - Decoding never yields a partial collection: one bad record rejects all.
//! - Only a top-level JSON array is accepted.
//! - Every decode failure reports `is_invalid_format() == true`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CodecResult<T> = Result<T, CodecError>;

/// Import/export failure.
#[derive(Debug)]
pub enum CodecError {
    /// Text is not JSON at all.
    Malformed(serde_json::Error),
    /// Valid JSON whose top-level value is not an array.
    NotAnArray { found: &'static str },
    /// Array element that does not match the record shape.
    InvalidRecord {
        index: usize,
        source: serde_json::Error,
    },
    /// Serialization failure on export.
    Encode(serde_json::Error),
}

impl CodecError {
    /// Whether the error means "the provided text is not a valid collection".
    pub fn is_invalid_format(&self) -> bool {
        !matches!(self, Self::Encode(_))
    }
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(err) => write!(f, "invalid format: not valid JSON ({err})"),
            Self::NotAnArray { found } => {
                write!(f, "invalid format: expected a JSON array, found {found}")
            }
            Self::InvalidRecord { index, source } => {
                write!(f, "invalid format: record #{index} is invalid ({source})")
            }
            Self::Encode(err) => write!(f, "failed to encode collection: {err}"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(err) | Self::Encode(err) => Some(err),
            Self::InvalidRecord { source, .. } => Some(source),
            Self::NotAnArray { .. } => None,
        }
    }
}

/// Encodes records as a pretty JSON array.
pub fn encode_collection<T: Serialize>(records: &[T]) -> CodecResult<String> {
    serde_json::to_string_pretty(records).map_err(CodecError::Encode)
}

/// Encodes records as compact JSON, the form kept in the blob store.
pub fn encode_compact<T: Serialize>(records: &[T]) -> CodecResult<String> {
    serde_json::to_string(records).map_err(CodecError::Encode)
}

/// Decodes a JSON array into records, rejecting the whole input on any error.
pub fn decode_collection<T: DeserializeOwned>(text: &str) -> CodecResult<Vec<T>> {
    let value: Value = serde_json::from_str(text).map_err(CodecError::Malformed)?;
    let Value::Array(elements) = value else {
        return Err(CodecError::NotAnArray {
            found: json_kind(&value),
        });
    };

    elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            serde_json::from_value(element)
                .map_err(|source| CodecError::InvalidRecord { index, source })
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
