#![no_main]
use jsonflate::{CompressionOptions, SerializeOptions, deserialize, serialize};
use libfuzzer_sys::fuzz_target;
use serde_json::Value;

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }

    // First two bytes pick the level and window; the rest is the payload.
    let zlib = CompressionOptions::default()
        .with_level((data[0] % 10) as u32)
        .with_window_bits(8 + data[1] % 8);
    let opts = SerializeOptions::with_zlib(zlib);
    let value = Value::String(String::from_utf8_lossy(&data[2..]).into_owned());

    let bytes = serialize(Some(&value), &opts).unwrap();
    assert!(!bytes.is_empty());
    let back: Option<Value> = deserialize(&bytes, &opts.matching_deserialize()).unwrap();
    assert_eq!(back, Some(value));
});
