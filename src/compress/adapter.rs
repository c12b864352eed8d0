// Optional-result boundary around a `DeflateBackend`.
//
// Whatever way a backend fails (rejected options, an io error, a panic, an
// empty output buffer, non-UTF-8 output) the caller sees `None`.
// The cause is logged at debug level; building the user-facing message is
// left to the pipeline, which knows what value was being processed.
//
// Backends should return `Err` rather than panic: an unwinding panic is
// caught here, but the panic hook has already printed it to stderr.

use std::panic::{self, AssertUnwindSafe};

use super::backend::DeflateBackend;
use super::options::{CompressionOptions, DecompressionOptions, DeflateParams, InflateParams};

/// Compress `text` to a raw deflate buffer.
///
/// Returns `None` on any backend failure. A present result is never empty.
pub fn compress<B: DeflateBackend + ?Sized>(
    backend: &B,
    text: &str,
    options: Option<&CompressionOptions>,
) -> Option<Vec<u8>> {
    let params = match DeflateParams::resolve(options) {
        Ok(params) => params,
        Err(e) => {
            log::debug!("{}: rejected compression options: {e}", backend.name());
            return None;
        }
    };

    let bytes = absorb(backend.name(), "deflate", || {
        backend.deflate_raw(text.as_bytes(), &params)
    })?;

    // A zero-length buffer is reserved for absent values.
    if bytes.is_empty() {
        log::debug!("{}: deflate produced no output", backend.name());
        return None;
    }
    Some(bytes)
}

/// Inflate a raw deflate buffer back to text.
///
/// Returns `None` for malformed or truncated streams, window or dictionary
/// mismatches the inflater detects, and output that is not UTF-8.
pub fn decompress<B: DeflateBackend + ?Sized>(
    backend: &B,
    bytes: &[u8],
    options: Option<&DecompressionOptions>,
) -> Option<String> {
    let params = match InflateParams::resolve(options) {
        Ok(params) => params,
        Err(e) => {
            log::debug!("{}: rejected decompression options: {e}", backend.name());
            return None;
        }
    };

    let raw = absorb(backend.name(), "inflate", || {
        backend.inflate_raw(bytes, &params)
    })?;

    match String::from_utf8(raw) {
        Ok(text) => Some(text),
        Err(e) => {
            log::debug!("{}: inflated data is not UTF-8: {e}", backend.name());
            None
        }
    }
}

/// Run one backend call, turning both `Err` and unwinding panics into `None`.
fn absorb<T>(
    name: &str,
    op: &str,
    call: impl FnOnce() -> std::io::Result<T>,
) -> Option<T> {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            log::debug!("{name}: {op} failed: {e}");
            None
        }
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .copied()
                .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
                .unwrap_or("<non-string panic>");
            log::debug!("{name}: {op} panicked: {msg}");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::compress::backend::Flate2Backend;

    struct FailingBackend;

    impl DeflateBackend for FailingBackend {
        fn name(&self) -> &'static str {
            "failing"
        }
        fn deflate_raw(&self, _: &[u8], _: &DeflateParams) -> io::Result<Vec<u8>> {
            Err(io::Error::other("disk on fire"))
        }
        fn inflate_raw(&self, _: &[u8], _: &InflateParams) -> io::Result<Vec<u8>> {
            Err(io::Error::other("disk on fire"))
        }
    }

    struct PanickingBackend;

    impl DeflateBackend for PanickingBackend {
        fn name(&self) -> &'static str {
            "panicking"
        }
        fn deflate_raw(&self, _: &[u8], _: &DeflateParams) -> io::Result<Vec<u8>> {
            panic!("deflate exploded")
        }
        fn inflate_raw(&self, _: &[u8], _: &InflateParams) -> io::Result<Vec<u8>> {
            panic!("inflate exploded")
        }
    }

    struct EmptyBackend;

    impl DeflateBackend for EmptyBackend {
        fn name(&self) -> &'static str {
            "empty"
        }
        fn deflate_raw(&self, _: &[u8], _: &DeflateParams) -> io::Result<Vec<u8>> {
            Ok(Vec::new())
        }
        fn inflate_raw(&self, _: &[u8], _: &InflateParams) -> io::Result<Vec<u8>> {
            Ok(vec![0xff, 0xfe])
        }
    }

    #[test]
    fn roundtrip_default_options() {
        let text = r#"{"a":1,"b":[true,null,"x"]}"#;
        let bytes = compress(&Flate2Backend, text, None).unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(decompress(&Flate2Backend, &bytes, None).unwrap(), text);
    }

    #[test]
    fn roundtrip_explicit_options() {
        let text = r#"["alpha","beta","gamma","alpha","beta","gamma"]"#;
        let opts = CompressionOptions::default()
            .with_level(9)
            .with_window_bits(10)
            .with_chunk_size(64);
        let bytes = compress(&Flate2Backend, text, Some(&opts)).unwrap();
        let dec = opts.matching_decompression();
        assert_eq!(decompress(&Flate2Backend, &bytes, Some(&dec)).unwrap(), text);
    }

    #[test]
    fn invalid_options_absorbed() {
        let opts = CompressionOptions::default().with_level(42);
        assert!(compress(&Flate2Backend, "1", Some(&opts)).is_none());

        let opts = DecompressionOptions::default().with_window_bits(16);
        let bytes = compress(&Flate2Backend, "1", None).unwrap();
        assert!(decompress(&Flate2Backend, &bytes, Some(&opts)).is_none());
    }

    #[test]
    fn backend_errors_absorbed() {
        assert!(compress(&FailingBackend, "1", None).is_none());
        assert!(decompress(&FailingBackend, &[1], None).is_none());
    }

    #[test]
    fn backend_panics_absorbed() {
        assert!(compress(&PanickingBackend, "1", None).is_none());
        assert!(decompress(&PanickingBackend, &[1], None).is_none());
    }

    #[test]
    fn empty_output_and_bad_utf8_absorbed() {
        assert!(compress(&EmptyBackend, "1", None).is_none());
        assert!(decompress(&EmptyBackend, &[1], None).is_none());
    }

    #[test]
    fn malformed_input_absorbed() {
        assert!(decompress(&Flate2Backend, &[1, 2, 3], None).is_none());
    }
}
