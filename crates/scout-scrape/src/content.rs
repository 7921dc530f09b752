//! `{content, html, metadata}` — the normalized scrape result (spec §4.3).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapedContent {
    pub content: String,
    pub html: Option<String>,
    pub metadata: HashMap<String, Value>,
}

impl ScrapedContent {
    /// Build the cache-ready payload shape `{data: {content, html_content},
    /// metadata}` (matching `scout_cache::scrape_payload_schema`).
    pub fn to_cache_payload(&self) -> Value {
        serde_json::json!({
            "data": {
                "content": self.content,
                "html_content": self.html,
            },
            "metadata": self.metadata,
        })
    }

    pub fn from_cache_payload(payload: &Value) -> Option<Self> {
        let data = payload.get("data")?.as_object()?;
        let content = data.get("content")?.as_str()?.to_string();
        let html = data.get("html_content").and_then(Value::as_str).map(str::to_string);
        let metadata = payload
            .get("metadata")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .collect();
        Some(Self { content, html, metadata })
    }
}
