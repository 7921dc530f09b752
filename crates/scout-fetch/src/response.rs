//! `HTTPResponse` returned by a successful (or terminally-classified) fetch.

use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    /// Best-effort UTF-8 decoding of `bytes`, lossy on invalid sequences.
    /// Callers that need to distinguish "not text" from "text with replacement
    /// characters" (e.g. sitemap decompression) should inspect `bytes`.
    pub body: String,
    pub bytes: Vec<u8>,
    pub url: String,
}
