//! # Scout LLM
//!
//! Routes `generate`/`chat_with_tools` calls across a primary
//! (OpenRouter-style) and a Nano-GPT provider, with per-model timeouts,
//! 503 retry-with-backoff, and primary→fallback model substitution
//! (spec §4.7, C7).
//!
//! Grounded on `OpenRouterClient` (`src/openrouter.py`) for the routing,
//! retry, and fallback control flow; the `Message`/provider trait shape
//! follows `riptide-intelligence::provider`.

mod error;
mod message;
mod provider;

pub use message::{Message, Role};
pub use provider::{ProviderConfig, ProviderKind, ProviderRegistry};

use scout_types::PipelineError;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{instrument, warn};

/// 1 initial attempt plus 3 retries, linear backoff 2s/4s/6s (spec §4.7).
const MAX_503_ATTEMPTS: u32 = 4;

#[derive(Debug, Clone)]
pub struct ChatResult {
    pub content: Option<String>,
    pub tool_calls: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct LlmClient {
    registry: ProviderRegistry,
    primary_model: String,
    fallback_model: String,
    http: reqwest::Client,
    referer: String,
    title: String,
}

impl LlmClient {
    pub fn new(registry: ProviderRegistry, primary_model: String, fallback_model: String) -> Self {
        Self {
            registry,
            primary_model,
            fallback_model,
            http: reqwest::Client::new(),
            referer: "https://github.com/scout-research/scout".to_string(),
            title: "Scout Research Pipeline".to_string(),
        }
    }

    /// `generate(prompt, system_prompt, model_override?)` (spec §4.7).
    #[instrument(skip(self, prompt, system_prompt))]
    pub async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        model_override: Option<&str>,
    ) -> Result<String, PipelineError> {
        let messages = vec![
            Message::system(system_prompt.unwrap_or("You are a careful research assistant.")),
            Message::user(prompt),
        ];

        let (first, second) = match model_override {
            Some(m) => (m.to_string(), (m != self.fallback_model).then(|| self.fallback_model.clone())),
            None => (
                self.primary_model.clone(),
                (self.primary_model != self.fallback_model).then(|| self.fallback_model.clone()),
            ),
        };

        match self.complete(&first, &messages, 0.7).await {
            Ok(text) => Ok(text),
            Err(first_err) => match second {
                Some(fallback) => {
                    warn!(model = %first, fallback = %fallback, "generate: primary model failed, trying fallback");
                    self.complete(&fallback, &messages, 0.7).await
                }
                None => Err(first_err),
            },
        }
    }

    async fn complete(&self, model: &str, messages: &[Message], temperature: f32) -> Result<String, PipelineError> {
        let response = self.request(model, messages, None, None, temperature).await?;
        let content = response
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|c| c.first())
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty());

        content.map(str::to_string).ok_or_else(error::empty_response)
    }

    /// `chat_with_tools(messages, tools, model?, tool_choice, temperature)`
    /// (spec §4.7). Does not fall back to the secondary model.
    #[instrument(skip(self, messages, tools))]
    pub async fn chat_with_tools(
        &self,
        messages: &[Message],
        tools: Option<Vec<Value>>,
        model: Option<&str>,
        tool_choice: Option<Value>,
        temperature: f32,
    ) -> Result<ChatResult, PipelineError> {
        let model = model.unwrap_or(&self.primary_model);
        let response = self.request(model, messages, tools, tool_choice, temperature).await?;

        let message = response
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|c| c.first())
            .and_then(|c| c.get("message"))
            .ok_or_else(error::empty_response)?;

        let content = message.get("content").and_then(Value::as_str).map(str::to_string);
        let tool_calls = message.get("tool_calls").cloned();

        if content.is_none() && tool_calls.is_none() {
            return Err(error::empty_response());
        }

        Ok(ChatResult { content, tool_calls })
    }

    async fn request(
        &self,
        model: &str,
        messages: &[Message],
        tools: Option<Vec<Value>>,
        tool_choice: Option<Value>,
        temperature: f32,
    ) -> Result<Value, PipelineError> {
        let provider = self.registry.resolve(model);
        let endpoint = format!("{}/chat/completions", provider.base_url);

        let mut body = json!({
            "model": provider.wire_model,
            "messages": messages,
            "temperature": temperature,
        });
        if let Some(t) = &tools {
            body["tools"] = json!(t);
        }
        if let Some(tc) = &tool_choice {
            body["tool_choice"] = tc.clone();
        }

        for attempt in 0..MAX_503_ATTEMPTS {
            let mut builder = self.http.post(&endpoint).json(&body).timeout(provider.timeout);
            builder = self.apply_auth_headers(builder, &provider);

            let response = builder.send().await.map_err(|e| {
                if e.is_timeout() {
                    error::timeout()
                } else {
                    error::transport(e)
                }
            })?;

            let status = response.status().as_u16();
            if status == 503 && attempt + 1 < MAX_503_ATTEMPTS {
                let wait = Duration::from_secs(2 * (attempt as u64 + 1));
                warn!(model, attempt, wait_secs = wait.as_secs(), "llm endpoint returned 503, retrying");
                tokio::time::sleep(wait).await;
                continue;
            }

            if !response.status().is_success() {
                let text = response.text().await.unwrap_or_default();
                return Err(error::http_error(status, &text));
            }

            return response.json::<Value>().await.map_err(error::transport);
        }

        Err(error::http_error(503, "exhausted 503 retries"))
    }

    fn apply_auth_headers(&self, builder: reqwest::RequestBuilder, provider: &ProviderConfig) -> reqwest::RequestBuilder {
        let mut builder = builder;
        if let Some(key) = &provider.api_key {
            builder = builder.bearer_auth(key);
        }
        if provider.kind == ProviderKind::Primary {
            builder = builder
                .header("HTTP-Referer", &self.referer)
                .header("X-Title", &self.title);
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, primary: &str, fallback: &str) -> LlmClient {
        LlmClient::new(
            ProviderRegistry {
                primary_base_url: server.uri(),
                primary_api_key: Some("k".to_string()),
                nanogpt_base_url: server.uri(),
                nanogpt_api_key: Some("k".to_string()),
            },
            primary.to_string(),
            fallback.to_string(),
        )
    }

    #[tokio::test]
    async fn generate_returns_primary_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "hello"}}]
            })))
            .mount(&server)
            .await;

        let c = client(&server, "openai/gpt-5.2", "openai/gpt-5-mini");
        let text = c.generate("hi", None, None).await.unwrap();
        assert_eq!(text, "hello");
    }

    #[tokio::test]
    async fn falls_back_when_primary_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "fallback worked"}}]
            })))
            .mount(&server)
            .await;

        let c = client(&server, "openai/gpt-5.2", "openai/gpt-5-mini");
        let text = c.generate("hi", None, None).await.unwrap();
        assert_eq!(text, "fallback worked");
    }

    #[tokio::test]
    async fn retries_three_times_before_succeeding() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(3)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "fourth attempt worked"}}]
            })))
            .mount(&server)
            .await;

        let c = client(&server, "openai/gpt-5.2", "openai/gpt-5.2");
        let text = c.generate("hi", None, None).await.unwrap();
        assert_eq!(text, "fourth attempt worked");
    }

    #[tokio::test]
    async fn chat_with_tools_returns_tool_calls() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"tool_calls": [{"id": "1", "type": "function"}]}}]
            })))
            .mount(&server)
            .await;

        let c = client(&server, "openai/gpt-5.2", "openai/gpt-5-mini");
        let result = c
            .chat_with_tools(&[Message::user("search for x")], Some(vec![json!({"type": "function"})]), None, None, 0.0)
            .await
            .unwrap();
        assert!(result.content.is_none());
        assert!(result.tool_calls.is_some());
    }

    #[tokio::test]
    async fn empty_content_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": ""}}]
            })))
            .mount(&server)
            .await;

        let c = client(&server, "openai/gpt-5.2", "openai/gpt-5.2");
        let err = c.generate("hi", None, None).await.unwrap_err();
        assert_eq!(err.kind, scout_types::ErrorKind::LlmEmptyResponse);
    }
}
