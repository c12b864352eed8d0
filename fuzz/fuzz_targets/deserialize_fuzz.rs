#![no_main]
use jsonflate::{DecompressionOptions, DeserializeOptions, deserialize};
use libfuzzer_sys::fuzz_target;
use serde_json::Value;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must only ever produce values or errors.
    let _ = deserialize::<Value>(data, &DeserializeOptions::default());

    // Use the first byte as a window size and the next 16 as a dictionary.
    if data.len() >= 18 {
        let opts = DeserializeOptions::with_zlib(
            DecompressionOptions::default()
                .with_window_bits(8 + data[0] % 8)
                .with_dictionary(&data[1..17]),
        );
        let _ = deserialize::<Value>(&data[17..], &opts);
    }
});
