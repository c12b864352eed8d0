// Error taxonomy for the encode/decode pipeline.
//
// Exactly two kinds of failure exist: a value could not be turned into bytes
// (`Serialize`) or bytes could not be turned back into a value
// (`Deserialize`). Each carries a human-readable message and nothing else.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = CodecError> = std::result::Result<T, E>;

// ---------------------------------------------------------------------------
// CodecError
// ---------------------------------------------------------------------------

/// A pipeline failure.
///
/// The message always carries enough context (a bounded display of the
/// offending value or buffer, or the underlying parser diagnostic) to
/// diagnose the failure without a debugger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Encoding direction: stringify or compress failed.
    #[error("{0}")]
    Serialize(String),
    /// Decoding direction: decompress or parse failed.
    #[error("{0}")]
    Deserialize(String),
}

impl CodecError {
    /// Which direction failed.
    pub fn kind(&self) -> ErrorType {
        match self {
            Self::Serialize(_) => ErrorType::Serialize,
            Self::Deserialize(_) => ErrorType::Deserialize,
        }
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        match self {
            Self::Serialize(msg) | Self::Deserialize(msg) => msg,
        }
    }

    /// Build the tagged `{ error, errorType }` report for this failure.
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            error: self.message().to_owned(),
            error_type: self.kind(),
        }
    }
}

// ---------------------------------------------------------------------------
// ErrorType
// ---------------------------------------------------------------------------

/// Discriminant of a [`CodecError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    Serialize,
    Deserialize,
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serialize => f.write_str("serialize"),
            Self::Deserialize => f.write_str("deserialize"),
        }
    }
}

/// Interchange form of a failure: `{"error": "...", "errorType": "serialize"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub error: String,
    pub error_type: ErrorType,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_and_message() {
        let err = CodecError::Serialize("boom".into());
        assert_eq!(err.kind(), ErrorType::Serialize);
        assert_eq!(err.message(), "boom");
        assert_eq!(err.to_string(), "boom");

        let err = CodecError::Deserialize("bad".into());
        assert_eq!(err.kind(), ErrorType::Deserialize);
        assert_eq!(err.kind().to_string(), "deserialize");
    }

    #[test]
    fn report_uses_interchange_field_names() {
        let report = CodecError::Deserialize("could not parse".into()).report();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "error": "could not parse", "errorType": "deserialize" })
        );
    }
}
