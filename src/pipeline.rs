// Serialize/deserialize orchestration.
//
// Encode: value -> stringify -> compress -> bytes.
// Decode: bytes -> decompress -> parse -> value.
//
// An absent value (`None`) is encoded as a zero-length buffer without
// touching either stage, and a zero-length buffer always decodes to `None`.
// Each call is an independent transaction: no retries, no partial output.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::codec;
use crate::compress::{
    self, CompressionOptions, DecompressionOptions, DeflateBackend, Flate2Backend,
};
use crate::display;
use crate::error::{CodecError, Result};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Options for [`serialize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Compressor options; `None` uses backend defaults.
    pub zlib: Option<CompressionOptions>,
}

impl SerializeOptions {
    pub fn with_zlib(zlib: CompressionOptions) -> Self {
        Self { zlib: Some(zlib) }
    }

    /// The decode-side options that pair with these.
    pub fn matching_deserialize(&self) -> DeserializeOptions {
        DeserializeOptions {
            zlib: self.zlib.as_ref().map(CompressionOptions::matching_decompression),
        }
    }
}

/// Options for [`deserialize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeserializeOptions {
    /// Decompressor options; must agree with the encode side on
    /// `window_bits` and `dictionary`.
    pub zlib: Option<DecompressionOptions>,
}

impl DeserializeOptions {
    pub fn with_zlib(zlib: DecompressionOptions) -> Self {
        Self { zlib: Some(zlib) }
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// The two-stage pipeline over a compression backend.
///
/// Holds no per-call state, so one instance can be shared across threads.
///
/// # Example
/// ```
/// use jsonflate::pipeline::{DeserializeOptions, Pipeline, SerializeOptions};
/// use serde_json::{Value, json};
///
/// let pipeline: Pipeline = Pipeline::default();
/// let value = json!({ "a": 1, "b": [true, null, "x"] });
/// let bytes = pipeline.serialize(Some(&value), &SerializeOptions::default()).unwrap();
/// let back: Option<Value> = pipeline.deserialize(&bytes, &DeserializeOptions::default()).unwrap();
/// assert_eq!(back, Some(value));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipeline<B = Flate2Backend> {
    backend: B,
}

impl<B: DeflateBackend> Pipeline<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Encode `value` to a raw deflate buffer of its JSON text.
    ///
    /// `None` yields an empty buffer. Stringify errors are returned
    /// unchanged; a compressor failure becomes a [`CodecError::Serialize`]
    /// naming the value.
    pub fn serialize<T: Serialize + ?Sized>(
        &self,
        value: Option<&T>,
        options: &SerializeOptions,
    ) -> Result<Vec<u8>> {
        let Some(value) = value else {
            log::trace!("serialize: absent value, emitting empty buffer");
            return Ok(Vec::new());
        };

        let text = codec::stringify(value)?;
        match compress::compress(&self.backend, &text, options.zlib.as_ref()) {
            Some(bytes) => {
                log::trace!("serialize: {} text bytes -> {} bytes", text.len(), bytes.len());
                Ok(bytes)
            }
            None => Err(CodecError::Serialize(format!(
                "could not serialize data {}",
                display::display_text(&text)
            ))),
        }
    }

    /// Decode a buffer produced by [`Pipeline::serialize`].
    ///
    /// An empty buffer yields `Ok(None)`. A compressor failure becomes a
    /// [`CodecError::Deserialize`] naming the buffer; parse errors are
    /// returned unchanged.
    pub fn deserialize<T: DeserializeOwned>(
        &self,
        bytes: &[u8],
        options: &DeserializeOptions,
    ) -> Result<Option<T>> {
        if bytes.is_empty() {
            log::trace!("deserialize: empty buffer, absent value");
            return Ok(None);
        }

        let Some(text) = compress::decompress(&self.backend, bytes, options.zlib.as_ref()) else {
            return Err(CodecError::Deserialize(format!(
                "could not deserialize data '{}'",
                display::display_bytes(bytes)
            )));
        };
        log::trace!("deserialize: {} bytes -> {} text bytes", bytes.len(), text.len());
        codec::parse(&text).map(Some)
    }
}

#[cfg(feature = "parallel")]
impl<B: DeflateBackend> Pipeline<B> {
    /// Serialize every value concurrently. Results keep input order.
    pub fn serialize_batch<T: Serialize + Sync>(
        &self,
        values: &[Option<T>],
        options: &SerializeOptions,
    ) -> Vec<Result<Vec<u8>>> {
        values
            .par_iter()
            .map(|value| self.serialize(value.as_ref(), options))
            .collect()
    }

    /// Deserialize every buffer concurrently. Results keep input order.
    pub fn deserialize_batch<T: DeserializeOwned + Send, I: AsRef<[u8]> + Sync>(
        &self,
        buffers: &[I],
        options: &DeserializeOptions,
    ) -> Vec<Result<Option<T>>> {
        buffers
            .par_iter()
            .map(|bytes| self.deserialize(bytes.as_ref(), options))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Convenience functions
// ---------------------------------------------------------------------------

/// [`Pipeline::serialize`] with the default flate2 backend.
pub fn serialize<T: Serialize + ?Sized>(
    value: Option<&T>,
    options: &SerializeOptions,
) -> Result<Vec<u8>> {
    Pipeline::<Flate2Backend>::default().serialize(value, options)
}

/// [`Pipeline::deserialize`] with the default flate2 backend.
pub fn deserialize<T: DeserializeOwned>(
    bytes: &[u8],
    options: &DeserializeOptions,
) -> Result<Option<T>> {
    Pipeline::<Flate2Backend>::default().deserialize(bytes, options)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
