//! Jsonflate: value <-> JSON <-> raw deflate, and back.
//!
//! The crate provides:
//! - A structural codec to canonical JSON text (`codec`)
//! - A compression adapter over a pluggable raw deflate backend (`compress`)
//! - The two-stage pipeline with its error taxonomy (`pipeline`, `error`)
//!
//! An absent value (`None`) is encoded as a zero-length buffer, and a
//! zero-length buffer decodes to `None`. Every other value round-trips
//! through JSON and raw deflate.
//!
//! # Quick Start
//!
//! ```
//! use jsonflate::{DeserializeOptions, SerializeOptions, deserialize, serialize};
//! use serde_json::{Value, json};
//!
//! let value = json!({ "a": 1, "b": [true, null, "x"] });
//! let bytes = serialize(Some(&value), &SerializeOptions::default()).unwrap();
//! let back: Option<Value> = deserialize(&bytes, &DeserializeOptions::default()).unwrap();
//! assert_eq!(back, Some(value));
//!
//! let nothing = serialize::<Value>(None, &SerializeOptions::default()).unwrap();
//! assert!(nothing.is_empty());
//! ```

pub mod codec;
pub mod compress;
pub mod display;
pub mod error;
pub mod pipeline;

pub use codec::{parse, stringify};
pub use compress::{CompressionOptions, DecompressionOptions, DeflateBackend, Flate2Backend};
pub use error::{CodecError, ErrorReport, ErrorType, Result};
pub use pipeline::{DeserializeOptions, Pipeline, SerializeOptions, deserialize, serialize};
