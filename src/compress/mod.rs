// Compression adapter.
//
// Normalizes a raw deflate compressor into one optional-result contract per
// direction:
//
// - `options`: caller-facing options and their resolution into params
// - `backend`: DeflateBackend trait and the flate2 implementation
// - `adapter`: compress/decompress returning `Option`, absorbing failures

pub mod adapter;
pub mod backend;
pub mod options;

pub use adapter::{compress, decompress};
pub use backend::{DeflateBackend, Flate2Backend};
pub use options::{CompressionOptions, DecompressionOptions, DeflateParams, InflateParams};
