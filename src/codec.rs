// Structural codec: typed value <-> canonical JSON text.
//
// Both directions are pure and synchronous. Non-finite floats (NaN,
// +/-Infinity) have no JSON form and are written as `null`.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{CodecError, Result};

/// Convert `value` to canonical JSON text.
///
/// Fails with [`CodecError::Serialize`] when the value has no JSON form,
/// e.g. a map whose keys do not serialize as strings, or a `Serialize` impl
/// that reports an error.
pub fn stringify<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|e| CodecError::Serialize(format!("could not stringify data: {e}")))
}

/// Parse JSON text back into a `T`.
///
/// Syntax errors, truncated input, invalid escapes, trailing characters and
/// shape mismatches against `T` all yield [`CodecError::Deserialize`].
pub fn parse<T: DeserializeOwned>(text: &str) -> Result<T> {
    serde_json::from_str(text)
        .map_err(|e| CodecError::Deserialize(format!("could not parse data: {e}")))
}
