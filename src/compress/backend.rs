// Raw deflate backends.
//
// The compressor itself is an external collaborator behind the
// `DeflateBackend` trait. The default implementation drives flate2's
// low-level `Compress`/`Decompress` state machines (zlib-rs backend) in raw
// mode, which is what exposes window bits and preset dictionaries.
//
// Backends report failures as io errors; the adapter in `super::adapter`
// collapses them to `None`. Output buffers grow fallibly, so an allocation
// the system refuses is an error too, not an abort.

use std::io;

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

use super::options::{DeflateParams, InflateParams};

// ---------------------------------------------------------------------------
// DeflateBackend trait
// ---------------------------------------------------------------------------

/// A raw deflate/inflate primitive.
///
/// Implementations must be stateless across calls: every call receives the
/// complete input and returns one complete output buffer.
///
/// Failures should be returned as `Err`. A panic is also turned into a
/// failed call, but the process panic hook still runs first, so the
/// message (and a backtrace, if enabled) is printed to stderr.
///
/// # Implementing a custom backend
///
/// ```no_run
/// use jsonflate::compress::backend::DeflateBackend;
/// use jsonflate::compress::options::{DeflateParams, InflateParams};
///
/// struct Passthrough;
///
/// impl DeflateBackend for Passthrough {
///     fn name(&self) -> &'static str { "passthrough" }
///     fn deflate_raw(&self, data: &[u8], _: &DeflateParams) -> std::io::Result<Vec<u8>> {
///         Ok(data.to_vec()) // placeholder
///     }
///     fn inflate_raw(&self, data: &[u8], _: &InflateParams) -> std::io::Result<Vec<u8>> {
///         Ok(data.to_vec()) // placeholder
///     }
/// }
/// ```
pub trait DeflateBackend: Send + Sync {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Compress `data` to a raw deflate stream (no zlib/gzip header).
    fn deflate_raw(&self, data: &[u8], params: &DeflateParams) -> io::Result<Vec<u8>>;

    /// Inflate a raw deflate stream produced by `deflate_raw`.
    fn inflate_raw(&self, data: &[u8], params: &InflateParams) -> io::Result<Vec<u8>>;
}

impl<B: DeflateBackend + ?Sized> DeflateBackend for std::sync::Arc<B> {
    fn name(&self) -> &'static str {
        (**self).name()
    }
    fn deflate_raw(&self, data: &[u8], params: &DeflateParams) -> io::Result<Vec<u8>> {
        (**self).deflate_raw(data, params)
    }
    fn inflate_raw(&self, data: &[u8], params: &InflateParams) -> io::Result<Vec<u8>> {
        (**self).inflate_raw(data, params)
    }
}

// ---------------------------------------------------------------------------
// flate2 backend
// ---------------------------------------------------------------------------

/// Raw deflate via flate2.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flate2Backend;

impl DeflateBackend for Flate2Backend {
    fn name(&self) -> &'static str {
        "flate2"
    }

    fn deflate_raw(&self, data: &[u8], params: &DeflateParams) -> io::Result<Vec<u8>> {
        let mut stream = Compress::new_with_window_bits(
            Compression::new(params.level),
            false,
            params.window_bits,
        );
        if let Some(dict) = &params.dictionary {
            stream.set_dictionary(dict).map_err(invalid_data)?;
        }

        // Stored blocks cost 5 bytes per 64 KiB, so this covers level 0 too.
        let mut output = Vec::new();
        grow(&mut output, params.chunk_size.min(data.len() + data.len() / 1024 + 64))?;
        let mut consumed = 0usize;
        loop {
            if output.len() == output.capacity() {
                grow(&mut output, params.chunk_size)?;
            }
            let (in_before, out_before) = (stream.total_in(), stream.total_out());
            let status = stream
                .compress_vec(&data[consumed..], &mut output, FlushCompress::Finish)
                .map_err(invalid_data)?;
            consumed += (stream.total_in() - in_before) as usize;
            match status {
                Status::StreamEnd => return Ok(output),
                Status::Ok | Status::BufError => {
                    if stream.total_in() == in_before && stream.total_out() == out_before {
                        return Err(io::Error::other("deflate made no progress"));
                    }
                }
            }
        }
    }

    fn inflate_raw(&self, data: &[u8], params: &InflateParams) -> io::Result<Vec<u8>> {
        let mut stream = Decompress::new_with_window_bits(false, params.window_bits);
        if let Some(dict) = &params.dictionary {
            stream.set_dictionary(dict).map_err(invalid_data)?;
        }

        let mut output = Vec::new();
        grow(&mut output, params.chunk_size.min(data.len().saturating_mul(4) + 64))?;
        let mut consumed = 0usize;
        loop {
            if output.len() == output.capacity() {
                grow(&mut output, params.chunk_size)?;
            }
            let (in_before, out_before) = (stream.total_in(), stream.total_out());
            let status = stream
                .decompress_vec(&data[consumed..], &mut output, FlushDecompress::None)
                .map_err(invalid_data)?;
            consumed += (stream.total_in() - in_before) as usize;
            match status {
                Status::StreamEnd => break,
                Status::Ok | Status::BufError => {
                    // Output has spare capacity here, so no progress means the
                    // input ran out before the final block.
                    if stream.total_in() == in_before && stream.total_out() == out_before {
                        return Err(io::Error::new(
                            io::ErrorKind::UnexpectedEof,
                            "truncated deflate stream",
                        ));
                    }
                }
            }
        }

        let trailing = data.len() - consumed;
        if trailing > 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{trailing} trailing bytes after deflate stream"),
            ));
        }
        Ok(output)
    }
}

/// Reserve one more growth step, reporting allocation failure as an error.
fn grow(output: &mut Vec<u8>, additional: usize) -> io::Result<()> {
    output
        .try_reserve(additional)
        .map_err(|e| io::Error::new(io::ErrorKind::OutOfMemory, e))
}

fn invalid_data(e: impl std::error::Error + Send + Sync + 'static) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn repetitive(total: usize) -> Vec<u8> {
        br#"{"key":"value","n":[1,2,3]},"#
            .iter()
            .copied()
            .cycle()
            .take(total)
            .collect()
    }

    fn inflate_params_for(params: &DeflateParams) -> InflateParams {
        InflateParams {
            window_bits: params.window_bits,
            chunk_size: params.chunk_size,
            dictionary: params.dictionary.clone(),
        }
    }

    #[test]
    fn raw_roundtrip_default() {
        let data = repetitive(4096);
        let params = DeflateParams::default();
        let compressed = Flate2Backend.deflate_raw(&data, &params).unwrap();
        assert!(compressed.len() < data.len());
        let inflated = Flate2Backend
            .inflate_raw(&compressed, &inflate_params_for(&params))
            .unwrap();
        assert_eq!(inflated, data);
    }

    #[test]
    fn output_has_no_zlib_header() {
        // A zlib stream with a 32 KiB window starts with 0x78.
        let compressed = Flate2Backend
            .deflate_raw(b"hello", &DeflateParams::default())
            .unwrap();
        assert_ne!(compressed[0], 0x78);
        // A zlib decoder must reject it.
        use std::io::Read;
        let mut out = Vec::new();
        assert!(flate2::read::ZlibDecoder::new(&compressed[..])
            .read_to_end(&mut out)
            .is_err());
    }

    #[test]
    fn all_levels_roundtrip() {
        let data = repetitive(2048);
        for level in 0..=9 {
            let params = DeflateParams {
                level,
                ..Default::default()
            };
            let compressed = Flate2Backend.deflate_raw(&data, &params).unwrap();
            let inflated = Flate2Backend
                .inflate_raw(&compressed, &inflate_params_for(&params))
                .unwrap();
            assert_eq!(inflated, data, "level {level}");
        }
    }

    #[test]
    fn level_zero_stores() {
        let data = repetitive(2048);
        let params = DeflateParams {
            level: 0,
            ..Default::default()
        };
        let compressed = Flate2Backend.deflate_raw(&data, &params).unwrap();
        assert!(compressed.len() >= data.len());
    }

    #[test]
    fn small_chunk_size_same_output() {
        let data = repetitive(10_000);
        let big = Flate2Backend
            .deflate_raw(&data, &DeflateParams::default())
            .unwrap();
        let small_params = DeflateParams {
            chunk_size: 64,
            ..Default::default()
        };
        let small = Flate2Backend.deflate_raw(&data, &small_params).unwrap();
        assert_eq!(big, small);
        let inflated = Flate2Backend
            .inflate_raw(&small, &inflate_params_for(&small_params))
            .unwrap();
        assert_eq!(inflated, data);
    }

    #[test]
    fn huge_chunk_size_small_input() {
        let data = repetitive(512);
        let params = DeflateParams {
            chunk_size: usize::MAX / 2,
            ..DeflateParams::default()
        };
        // The first reservation is bounded by the input, so no growth step
        // of `chunk_size` is ever attempted.
        let compressed = Flate2Backend.deflate_raw(&data, &params).unwrap();
        let inflated = Flate2Backend
            .inflate_raw(&compressed, &InflateParams::default())
            .unwrap();
        assert_eq!(inflated, data);
    }

    #[test]
    fn unsatisfiable_growth_is_an_error() {
        let data = repetitive(64 * 1024);
        let compressed = Flate2Backend
            .deflate_raw(&data, &DeflateParams::default())
            .unwrap();
        assert!(compressed.len() * 4 + 64 < data.len());
        let inflate = InflateParams {
            chunk_size: usize::MAX / 2,
            ..InflateParams::default()
        };
        let err = Flate2Backend.inflate_raw(&compressed, &inflate).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::OutOfMemory);
    }

    #[test]
    fn dictionary_roundtrip() {
        let dict: Arc<[u8]> = Arc::from(&br#"{"key":"value","n":[1,2,3]}"#[..]);
        let params = DeflateParams {
            dictionary: Some(dict),
            ..Default::default()
        };
        let data = repetitive(200);
        let with_dict = Flate2Backend.deflate_raw(&data, &params).unwrap();
        let without_dict = Flate2Backend
            .deflate_raw(&data, &DeflateParams::default())
            .unwrap();
        assert!(with_dict.len() < without_dict.len());
        let inflated = Flate2Backend
            .inflate_raw(&with_dict, &inflate_params_for(&params))
            .unwrap();
        assert_eq!(inflated, data);
    }

    #[test]
    fn truncated_stream_rejected() {
        let data = repetitive(4096);
        let compressed = Flate2Backend
            .deflate_raw(&data, &DeflateParams::default())
            .unwrap();
        let cut = &compressed[..compressed.len() / 2];
        let err = Flate2Backend
            .inflate_raw(cut, &InflateParams::default())
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn trailing_bytes_rejected() {
        let mut compressed = Flate2Backend
            .deflate_raw(b"[1,2,3]", &DeflateParams::default())
            .unwrap();
        compressed.extend_from_slice(b"junk");
        assert!(
            Flate2Backend
                .inflate_raw(&compressed, &InflateParams::default())
                .is_err()
        );
    }

    #[test]
    fn garbage_rejected() {
        assert!(
            Flate2Backend
                .inflate_raw(&[1, 2, 3], &InflateParams::default())
                .is_err()
        );
        assert!(
            Flate2Backend
                .inflate_raw(&[0xff; 16], &InflateParams::default())
                .is_err()
        );
    }

    #[test]
    fn arc_backend_delegates() {
        let backend: Arc<dyn DeflateBackend> = Arc::new(Flate2Backend);
        assert_eq!(backend.name(), "flate2");
        let compressed = backend
            .deflate_raw(b"\"x\"", &DeflateParams::default())
            .unwrap();
        let inflated = backend
            .inflate_raw(&compressed, &InflateParams::default())
            .unwrap();
        assert_eq!(inflated, b"\"x\"");
    }
}
