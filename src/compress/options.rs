// Compressor configuration and its resolution into concrete parameters.
//
// Caller-facing option structs keep every field optional. Before a backend
// is invoked they are resolved against zlib's defaults and range-checked,
// producing `DeflateParams` / `InflateParams` with no optional fields left.

use std::sync::Arc;

use thiserror::Error;

/// Default compression level (zlib `Z_DEFAULT_COMPRESSION`).
pub const DEFAULT_LEVEL: u32 = 6;

/// Highest compression level.
pub const MAX_LEVEL: u32 = 9;

/// Default log2 window size (32 KiB window).
pub const DEFAULT_WINDOW_BITS: u8 = 15;

/// Smallest window accepted from callers.
pub const MIN_WINDOW_BITS: u8 = 8;

/// Smallest window raw deflate actually uses; 8 is promoted to this.
pub const MIN_RAW_WINDOW_BITS: u8 = 9;

/// Largest window.
pub const MAX_WINDOW_BITS: u8 = 15;

/// Default output buffer growth step (16 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 16 * 1024;

/// Smallest accepted chunk size.
pub const MIN_CHUNK_SIZE: usize = 64;

/// Largest accepted chunk size (64 MiB).
pub const MAX_CHUNK_SIZE: usize = 64 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Caller-facing options
// ---------------------------------------------------------------------------

/// Encode-side compressor options. `None` means "backend default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompressionOptions {
    /// Compression level (0-9). Level 0 = stored blocks only.
    pub level: Option<u32>,
    /// log2 of the sliding window (8-15).
    pub window_bits: Option<u8>,
    /// Output buffer growth step in bytes (64 B to 64 MiB). Never affects the output.
    pub chunk_size: Option<usize>,
    /// Preset dictionary shared with the decoder.
    pub dictionary: Option<Arc<[u8]>>,
}

impl CompressionOptions {
    /// Set the compression level (0-9).
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }

    /// Set log2 of the sliding window (8-15).
    pub fn with_window_bits(mut self, window_bits: u8) -> Self {
        self.window_bits = Some(window_bits);
        self
    }

    /// Set the output buffer growth step in bytes (64 B to 64 MiB).
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size);
        self
    }

    /// Set the preset dictionary shared by encoder and decoder.
    pub fn with_dictionary(mut self, dictionary: impl Into<Arc<[u8]>>) -> Self {
        self.dictionary = Some(dictionary.into());
        self
    }

    /// The decode-side options that pair with these.
    pub fn matching_decompression(&self) -> DecompressionOptions {
        DecompressionOptions {
            window_bits: self.window_bits,
            chunk_size: self.chunk_size,
            dictionary: self.dictionary.clone(),
        }
    }
}

/// Decode-side compressor options.
///
/// `window_bits` and `dictionary` must agree with the values used to encode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecompressionOptions {
    /// log2 of the sliding window (8-15).
    pub window_bits: Option<u8>,
    /// Output buffer growth step in bytes.
    pub chunk_size: Option<usize>,
    /// Preset dictionary used at encode time.
    pub dictionary: Option<Arc<[u8]>>,
}

impl DecompressionOptions {
    /// Set log2 of the sliding window; must match the encode side.
    pub fn with_window_bits(mut self, window_bits: u8) -> Self {
        self.window_bits = Some(window_bits);
        self
    }

    /// Set the output buffer growth step in bytes (64 B to 64 MiB).
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size);
        self
    }

    /// Set the preset dictionary shared by encoder and decoder.
    pub fn with_dictionary(mut self, dictionary: impl Into<Arc<[u8]>>) -> Self {
        self.dictionary = Some(dictionary.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Resolved parameters
// ---------------------------------------------------------------------------

/// Why a set of options could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("compression level {0} out of range 0..={max}", max = MAX_LEVEL)]
    Level(u32),
    #[error("window bits {0} out of range {min}..={max}", min = MIN_WINDOW_BITS, max = MAX_WINDOW_BITS)]
    WindowBits(u8),
    #[error("chunk size {0} out of range {min}..={max}", min = MIN_CHUNK_SIZE, max = MAX_CHUNK_SIZE)]
    ChunkSize(usize),
}

/// Fully resolved raw-deflate parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeflateParams {
    pub level: u32,
    /// Always within `MIN_RAW_WINDOW_BITS..=MAX_WINDOW_BITS`.
    pub window_bits: u8,
    pub chunk_size: usize,
    /// Empty dictionaries are dropped.
    pub dictionary: Option<Arc<[u8]>>,
}

impl DeflateParams {
    pub fn resolve(opts: Option<&CompressionOptions>) -> Result<Self, OptionsError> {
        let Some(opts) = opts else {
            return Ok(Self::default());
        };
        let level = opts.level.unwrap_or(DEFAULT_LEVEL);
        if level > MAX_LEVEL {
            return Err(OptionsError::Level(level));
        }
        Ok(Self {
            level,
            window_bits: resolve_window_bits(opts.window_bits)?,
            chunk_size: resolve_chunk_size(opts.chunk_size)?,
            dictionary: non_empty(&opts.dictionary),
        })
    }
}

impl Default for DeflateParams {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL,
            window_bits: DEFAULT_WINDOW_BITS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            dictionary: None,
        }
    }
}

/// Fully resolved raw-inflate parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InflateParams {
    pub window_bits: u8,
    pub chunk_size: usize,
    pub dictionary: Option<Arc<[u8]>>,
}

impl InflateParams {
    pub fn resolve(opts: Option<&DecompressionOptions>) -> Result<Self, OptionsError> {
        let Some(opts) = opts else {
            return Ok(Self::default());
        };
        Ok(Self {
            window_bits: resolve_window_bits(opts.window_bits)?,
            chunk_size: resolve_chunk_size(opts.chunk_size)?,
            dictionary: non_empty(&opts.dictionary),
        })
    }
}

impl Default for InflateParams {
    fn default() -> Self {
        Self {
            window_bits: DEFAULT_WINDOW_BITS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            dictionary: None,
        }
    }
}

fn resolve_window_bits(bits: Option<u8>) -> Result<u8, OptionsError> {
    match bits.unwrap_or(DEFAULT_WINDOW_BITS) {
        // zlib refuses an 8-bit raw window and silently uses 9 instead.
        MIN_WINDOW_BITS => Ok(MIN_RAW_WINDOW_BITS),
        b @ MIN_RAW_WINDOW_BITS..=MAX_WINDOW_BITS => Ok(b),
        b => Err(OptionsError::WindowBits(b)),
    }
}

fn resolve_chunk_size(size: Option<usize>) -> Result<usize, OptionsError> {
    match size.unwrap_or(DEFAULT_CHUNK_SIZE) {
        s @ MIN_CHUNK_SIZE..=MAX_CHUNK_SIZE => Ok(s),
        s => Err(OptionsError::ChunkSize(s)),
    }
}

fn non_empty(dictionary: &Option<Arc<[u8]>>) -> Option<Arc<[u8]>> {
    dictionary.as_ref().filter(|d| !d.is_empty()).cloned()
}
