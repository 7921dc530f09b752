//! Provider resolution: which base URL, auth header, and timeout a model
//! identifier routes to (spec §4.7 "Routing").
//!
//! Grounded on `OpenRouterClient._get_provider_config` / `_make_request`:
//! a `nanogpt/` or `dmind/` prefix routes to the Nano-GPT endpoint (the
//! `dmind/` prefix is kept verbatim in the outgoing model name; `nanogpt/`
//! is stripped), everything else routes to the primary OpenRouter-style
//! endpoint. Models whose resolved name contains `dmind` get a 600s
//! timeout instead of the default 300s.

use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);
const DMIND_TIMEOUT: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Primary,
    NanoGpt,
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub base_url: String,
    pub api_key: Option<String>,
    pub wire_model: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    pub primary_base_url: String,
    pub primary_api_key: Option<String>,
    pub nanogpt_base_url: String,
    pub nanogpt_api_key: Option<String>,
}

impl ProviderRegistry {
    pub fn resolve(&self, model: &str) -> ProviderConfig {
        let (kind, base_url, api_key, wire_model) =
            if let Some(rest) = model.strip_prefix("nanogpt/") {
                (ProviderKind::NanoGpt, self.nanogpt_base_url.clone(), self.nanogpt_api_key.clone(), rest.to_string())
            } else if model.starts_with("dmind/") {
                (ProviderKind::NanoGpt, self.nanogpt_base_url.clone(), self.nanogpt_api_key.clone(), model.to_string())
            } else {
                (ProviderKind::Primary, self.primary_base_url.clone(), self.primary_api_key.clone(), model.to_string())
            };

        let timeout = if wire_model.to_lowercase().contains("dmind") {
            DMIND_TIMEOUT
        } else {
            DEFAULT_TIMEOUT
        };

        ProviderConfig { kind, base_url, api_key, wire_model, timeout }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ProviderRegistry {
        ProviderRegistry {
            primary_base_url: "https://openrouter.example/api/v1".to_string(),
            primary_api_key: Some("primary-key".to_string()),
            nanogpt_base_url: "https://nano-gpt.example/api/v1".to_string(),
            nanogpt_api_key: Some("nano-key".to_string()),
        }
    }

    #[test]
    fn nanogpt_prefix_is_stripped() {
        let config = registry().resolve("nanogpt/llama-3");
        assert_eq!(config.kind, ProviderKind::NanoGpt);
        assert_eq!(config.wire_model, "llama-3");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn dmind_prefix_is_kept_and_gets_extended_timeout() {
        let config = registry().resolve("dmind/reasoner-1");
        assert_eq!(config.kind, ProviderKind::NanoGpt);
        assert_eq!(config.wire_model, "dmind/reasoner-1");
        assert_eq!(config.timeout, DMIND_TIMEOUT);
    }

    #[test]
    fn unprefixed_model_routes_to_primary() {
        let config = registry().resolve("openai/gpt-5.2");
        assert_eq!(config.kind, ProviderKind::Primary);
        assert_eq!(config.wire_model, "openai/gpt-5.2");
    }
}
