//! Three-stage (plus raw-window variant) decompression fallback for sitemap
//! bodies that arrive compressed without an honest `Content-Encoding`
//! (spec §4.2 step 4, §8 testable property 3).
//!
//! Order: gzip → brotli → zlib-wrapped deflate → raw (headerless) deflate.
//! The first decode that yields valid UTF-8 starting with an XML marker
//! wins; if none do, the body is rejected.

use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};
use std::io::Read;

pub const XML_MARKERS: [&str; 3] = ["<?xml", "<sitemapindex", "<urlset"];

pub fn looks_like_xml(s: &str) -> bool {
    let trimmed = s.trim_start();
    XML_MARKERS.iter().any(|m| trimmed.starts_with(m))
}

/// True if the text contains control-byte characters that mark it as
/// probably-binary/compressed (the same cheap heuristic the original
/// `scanner_utils.py` used: non-whitespace bytes below 0x20 in the first
/// 100 characters).
pub fn looks_binary(s: &str) -> bool {
    s.chars()
        .take(100)
        .any(|c| (c as u32) < 32 && !matches!(c, '\t' | '\n' | '\r'))
}

/// Attempt to decode `raw` as a sitemap body. Returns the first successful
/// decompression whose UTF-8 text starts with an XML marker.
pub fn decompress_fallback(raw: &[u8]) -> Option<String> {
    try_gzip(raw)
        .or_else(|| try_brotli(raw))
        .or_else(|| try_zlib(raw))
        .or_else(|| try_raw_deflate(raw))
        .filter(|s| looks_like_xml(s))
}

fn try_gzip(raw: &[u8]) -> Option<String> {
    let mut decoder = GzDecoder::new(raw);
    let mut out = String::new();
    decoder.read_to_string(&mut out).ok()?;
    Some(out)
}

fn try_brotli(raw: &[u8]) -> Option<String> {
    let mut out = Vec::new();
    brotli::BrotliDecompress(&mut std::io::Cursor::new(raw), &mut out).ok()?;
    String::from_utf8(out).ok()
}

fn try_zlib(raw: &[u8]) -> Option<String> {
    let mut decoder = ZlibDecoder::new(raw);
    let mut out = String::new();
    decoder.read_to_string(&mut out).ok()?;
    Some(out)
}

fn try_raw_deflate(raw: &[u8]) -> Option<String> {
    let mut decoder = DeflateDecoder::new(raw);
    let mut out = String::new();
    decoder.read_to_string(&mut out).ok()?;
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::{DeflateEncoder, GzEncoder, ZlibEncoder};
    use flate2::Compression;
    use std::io::Write;

    const PLAIN: &str = "<?xml version=\"1.0\"?><urlset><url><loc>https://acme.example/</loc></url></urlset>";

    #[test]
    fn gzip_round_trips() {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(PLAIN.as_bytes()).unwrap();
        let compressed = enc.finish().unwrap();
        assert_eq!(decompress_fallback(&compressed).as_deref(), Some(PLAIN));
    }

    #[test]
    fn brotli_round_trips() {
        let mut compressed = Vec::new();
        let params = brotli::enc::BrotliEncoderParams::default();
        brotli::BrotliCompress(&mut PLAIN.as_bytes(), &mut compressed, &params).unwrap();
        assert_eq!(decompress_fallback(&compressed).as_deref(), Some(PLAIN));
    }

    #[test]
    fn zlib_round_trips() {
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(PLAIN.as_bytes()).unwrap();
        let compressed = enc.finish().unwrap();
        assert_eq!(decompress_fallback(&compressed).as_deref(), Some(PLAIN));
    }

    #[test]
    fn raw_deflate_round_trips() {
        let mut enc = DeflateEncoder::new(Vec::new(), Compression::default());
        enc.write_all(PLAIN.as_bytes()).unwrap();
        let compressed = enc.finish().unwrap();
        assert_eq!(decompress_fallback(&compressed).as_deref(), Some(PLAIN));
    }

    #[test]
    fn unrecognized_bytes_are_rejected() {
        let garbage = vec![0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x01, 0x02, 0x03];
        assert!(decompress_fallback(&garbage).is_none());
    }
}
