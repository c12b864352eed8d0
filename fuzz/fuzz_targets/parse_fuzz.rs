#![no_main]
use jsonflate::{parse, stringify};
use libfuzzer_sys::fuzz_target;
use serde_json::Value;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Anything that parses must stringify to text that parses again.
    if let Ok(value) = parse::<Value>(text) {
        let again = stringify(&value).unwrap();
        assert!(parse::<Value>(&again).is_ok());
    }
});
