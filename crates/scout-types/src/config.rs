//! `Config` — the enumerated, validated options a `ResearchRequest` carries
//! (spec §3), plus environment-variable loading (spec §6) in the style of
//! `riptide-config::env::EnvConfigLoader`.

use serde::{Deserialize, Serialize};
use std::env;

use crate::errors::ErrorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Classic,
    Deep,
}

/// All other options besides these are rejected (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub model: String,
    pub breadth: u32,
    pub depth: u32,
    pub max_tool_calls: u32,
    pub extract_entities: bool,
    pub crawl_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: EnvConfig::primary_model(),
            breadth: 4,
            depth: 2,
            max_tool_calls: 4,
            extract_entities: false,
            crawl_limit: 20,
        }
    }
}

impl Config {
    /// Validate the enumerated ranges from spec §3. Returns the first
    /// violated field.
    pub fn validate(&self) -> Result<(), ErrorKind> {
        if !(1..=15).contains(&self.breadth) {
            return Err(ErrorKind::ConfigOutOfRange("breadth".into()));
        }
        if !(1..=8).contains(&self.depth) {
            return Err(ErrorKind::ConfigOutOfRange("depth".into()));
        }
        if !(1..=15).contains(&self.max_tool_calls) {
            return Err(ErrorKind::ConfigOutOfRange("max_tool_calls".into()));
        }
        if !(1..=50).contains(&self.crawl_limit) {
            return Err(ErrorKind::ConfigOutOfRange("crawl_limit".into()));
        }
        Ok(())
    }
}

/// Environment variables consumed per spec §6. Each getter falls back to a
/// sane default rather than panicking on a missing var.
pub struct EnvConfig;

impl EnvConfig {
    pub fn primary_model() -> String {
        env::var("LLM_PRIMARY_MODEL").unwrap_or_else(|_| "openai/gpt-5.2".to_string())
    }

    pub fn fallback_model() -> String {
        env::var("LLM_FALLBACK_MODEL").unwrap_or_else(|_| "openai/gpt-5-mini".to_string())
    }

    pub fn llm_base_url() -> String {
        env::var("LLM_BASE_URL").unwrap_or_else(|_| "https://openrouter.ai/api/v1".to_string())
    }

    pub fn llm_api_key() -> Option<String> {
        env::var("LLM_API_KEY").ok()
    }

    pub fn nanogpt_base_url() -> String {
        env::var("NANOGPT_BASE_URL").unwrap_or_else(|_| "https://nano-gpt.com/api/v1".to_string())
    }

    pub fn nanogpt_api_key() -> Option<String> {
        env::var("NANOGPT_API_KEY").ok()
    }

    pub fn embedding_model() -> String {
        env::var("EMBEDDING_MODEL").unwrap_or_else(|_| "text-embedding-3-small".to_string())
    }

    pub fn render_base_url() -> String {
        env::var("RENDER_BASE_URL").unwrap_or_else(|_| "http://localhost:3002".to_string())
    }

    pub fn render_api_key() -> Option<String> {
        env::var("RENDER_API_KEY").ok()
    }

    pub fn ocr_binary() -> String {
        env::var("OCR_BINARY").unwrap_or_else(|_| "tesseract".to_string())
    }

    pub fn chromedriver_path() -> Option<String> {
        env::var("CHROMEDRIVER_PATH").ok()
    }

    pub fn chrome_bin() -> Option<String> {
        env::var("CHROME_BIN").ok()
    }

    pub fn cache_ttl_seconds() -> u64 {
        env::var("CACHE_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600)
    }

    pub fn entity_extraction_passes() -> u32 {
        env::var("ENTITY_EXTRACTION_PASSES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1)
    }

    pub fn entity_max_chunk_size() -> usize {
        env::var("ENTITY_MAX_CHUNK_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(4000)
    }

    pub fn entity_max_concurrent() -> usize {
        env::var("ENTITY_MAX_CONCURRENT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn breadth_out_of_range_rejected() {
        let mut cfg = Config::default();
        cfg.breadth = 16;
        assert_eq!(
            cfg.validate(),
            Err(ErrorKind::ConfigOutOfRange("breadth".into()))
        );
        cfg.breadth = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn crawl_limit_bounds() {
        let mut cfg = Config::default();
        cfg.crawl_limit = 51;
        assert!(cfg.validate().is_err());
        cfg.crawl_limit = 50;
        assert!(cfg.validate().is_ok());
    }
}
