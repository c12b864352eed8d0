use std::io;
use std::io::{Read, Write};

use jsonflate::compress::{DeflateParams, InflateParams};
use jsonflate::{DeflateBackend, DeserializeOptions, Pipeline, SerializeOptions};
use serde_json::{Value, json};

/// Raw deflate through flate2's streaming `write`/`read` wrappers.
///
/// Ignores window bits and dictionaries, which those wrappers don't expose.
struct StreamingDeflate;

impl DeflateBackend for StreamingDeflate {
    fn name(&self) -> &'static str {
        "streaming-deflate"
    }

    fn deflate_raw(&self, data: &[u8], params: &DeflateParams) -> io::Result<Vec<u8>> {
        let mut encoder = flate2::write::DeflateEncoder::new(
            Vec::with_capacity(params.chunk_size),
            flate2::Compression::new(params.level),
        );
        encoder.write_all(data)?;
        encoder.finish()
    }

    fn inflate_raw(&self, data: &[u8], params: &InflateParams) -> io::Result<Vec<u8>> {
        let mut decoder = flate2::read::DeflateDecoder::new(data);
        let mut output = Vec::with_capacity(params.chunk_size);
        decoder.read_to_end(&mut output)?;
        Ok(output)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let pipeline = Pipeline::new(StreamingDeflate);
    let value = json!({ "backend": "custom", "ok": true });

    let bytes = pipeline.serialize(Some(&value), &SerializeOptions::default())?;
    let restored: Option<Value> = pipeline.deserialize(&bytes, &DeserializeOptions::default())?;
    assert_eq!(restored, Some(value));

    // The default backend reads the same wire format.
    let via_default: Option<Value> = jsonflate::deserialize(&bytes, &DeserializeOptions::default())?;
    println!("{} bytes, default backend agrees: {}", bytes.len(), via_default == restored);

    Ok(())
}
