//! Gzip + base64 encoding of file contents
//!
//! The gzip header's MTIME field is the only source of non-determinism, so a
//! caller that pins the timestamp gets byte-identical output for identical
//! input.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::read::GzDecoder;
use flate2::{Compression, GzBuilder};
use std::io::{Read, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{BundleError, Result};

/// Default deflate level
pub const DEFAULT_LEVEL: u32 = 6;

/// OS byte written into the gzip header (3 = Unix)
const GZIP_OS_UNIX: u8 = 3;

// ============================================================================
// Public API
// ============================================================================

/// Gzip `raw` and return the standard, padded base64 of the result.
///
/// `gzip_timestamp` becomes the header MTIME; `None` uses the current time.
pub fn compress(raw: &[u8], gzip_timestamp: Option<u32>) -> Result<String> {
    compress_with_level(raw, gzip_timestamp, DEFAULT_LEVEL)
}

/// Same as [`compress`] with an explicit deflate level (clamped to 0-9).
pub fn compress_with_level(raw: &[u8], gzip_timestamp: Option<u32>, level: u32) -> Result<String> {
    let compressed = gzip(raw, gzip_timestamp, level).map_err(BundleError::Compression)?;
    Ok(STANDARD.encode(compressed))
}

/// Inverse of [`compress`]: base64-decode and gunzip.
pub fn decompress(encoded: &str) -> Result<Vec<u8>> {
    let compressed = STANDARD.decode(encoded)?;
    let mut decoder = GzDecoder::new(&compressed[..]);
    let mut raw = Vec::new();
    decoder
        .read_to_end(&mut raw)
        .map_err(BundleError::Compression)?;
    Ok(raw)
}

/// Current UNIX time in seconds, saturated into the 32-bit MTIME range
pub fn now_timestamp() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u32::try_from(d.as_secs()).unwrap_or(u32::MAX))
        .unwrap_or(0)
}

// ============================================================================
// Helpers
// ============================================================================

fn gzip(raw: &[u8], gzip_timestamp: Option<u32>, level: u32) -> std::io::Result<Vec<u8>> {
    let mtime = gzip_timestamp.unwrap_or_else(now_timestamp);
    let mut encoder = GzBuilder::new()
        .mtime(mtime)
        .operating_system(GZIP_OS_UNIX)
        .write(Vec::new(), Compression::new(level.min(9)));
    encoder.write_all(raw)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_output_with_zero_timestamp() {
        assert_eq!(
            compress(b"foo\n", Some(0)).unwrap(),
            "H4sIAAAAAAAAA0vLz+cCAKhlMn4EAAAA"
        );
        assert_eq!(
            compress(b"Hello!\n", Some(0)).unwrap(),
            "H4sIAAAAAAAAA/NIzcnJV+QCAJ7YQrAHAAAA"
        );
    }

    #[test]
    fn test_roundtrip_binary() {
        let data: Vec<u8> = (0..4096u32).map(|i| (i * 31 % 251) as u8).collect();
        let encoded = compress(&data, Some(0)).unwrap();
        assert_eq!(decompress(&encoded).unwrap(), data);
    }

    #[test]
    fn test_roundtrip_empty() {
        let encoded = compress(b"", Some(0)).unwrap();
        assert!(decompress(&encoded).unwrap().is_empty());
    }

    #[test]
    fn test_timestamp_is_written_to_header() {
        let encoded = compress(b"abc", Some(0x0102_0304)).unwrap();
        let bytes = STANDARD.decode(encoded).unwrap();
        assert_eq!(&bytes[0..2], &[0x1f, 0x8b]);
        assert_eq!(&bytes[4..8], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(bytes[9], GZIP_OS_UNIX);
    }

    #[test]
    fn test_fixed_timestamp_is_deterministic() {
        let a = compress(b"the same bytes", Some(1_600_000_000)).unwrap();
        let b = compress(b"the same bytes", Some(1_600_000_000)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_current_time_used_when_unset() {
        let before = now_timestamp();
        let bytes = STANDARD.decode(compress(b"x", None).unwrap()).unwrap();
        let mtime = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        assert!(mtime >= before);
    }

    #[test]
    fn test_level_is_clamped() {
        let encoded = compress_with_level(b"clamp me", Some(0), 42).unwrap();
        assert_eq!(decompress(&encoded).unwrap(), b"clamp me");
    }

    #[test]
    fn test_decompress_rejects_bad_base64() {
        assert!(matches!(
            decompress("not base64!"),
            Err(BundleError::Decode(_))
        ));
    }
}
