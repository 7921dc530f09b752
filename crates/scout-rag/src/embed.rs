//! Embedding provider boundary (spec §4.8 "Embedding").
//!
//! Grounded on `riptide-intelligence::provider::LlmProvider::embed`'s
//! signature; the HTTP implementation follows the OpenAI-compatible
//! `/embeddings` contract the primary LLM endpoint also serves.

use async_trait::async_trait;
use scout_types::{ErrorKind, PipelineError};
use serde_json::json;

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, PipelineError>;
    fn model_id(&self) -> &str;
}

#[derive(Debug, Clone)]
pub struct HttpEmbeddingProvider {
    base_url: String,
    api_key: Option<String>,
    model: String,
    http: reqwest::Client,
}

impl HttpEmbeddingProvider {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            model: model.into(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, PipelineError> {
        let endpoint = format!("{}/embeddings", self.base_url);
        let body = json!({"model": self.model, "input": text});

        let mut builder = self.http.post(&endpoint).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| PipelineError::new(ErrorKind::Transport(e.to_string()), e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            return Err(PipelineError::new(ErrorKind::HttpStatus(status), format!("embeddings endpoint returned {status}")));
        }

        let parsed: serde_json::Value = response
            .json()
            .await
            .map_err(|e| PipelineError::new(ErrorKind::InvalidResponseShape, e.to_string()))?;

        parsed
            .get("data")
            .and_then(|d| d.as_array())
            .and_then(|a| a.first())
            .and_then(|item| item.get("embedding"))
            .and_then(|e| e.as_array())
            .map(|arr| arr.iter().filter_map(|v| v.as_f64()).map(|v| v as f32).collect())
            .ok_or_else(|| PipelineError::new(ErrorKind::InvalidResponseShape, "embeddings response missing data[0].embedding".to_string()))
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
