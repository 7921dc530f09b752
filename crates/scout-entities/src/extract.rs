//! Model invocation and normalization for entity extraction (spec §4.6).

use crate::chunk::chunk_text;
use scout_llm::LlmClient;
use scout_types::{Entity, EntityClass, SourceId, SourceKind};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{instrument, warn};

const SYSTEM_PROMPT: &str = "You are an extraction engine. Given a passage, return every entity you can \
find for the classes: person, organization, funding_round, funding_amount, metric, date, technology, \
risk_factor, partnership. Respond with a JSON object: {\"extractions\": [{\"class\": ..., \"text\": ..., \
\"start\": <offset within the passage>, \"end\": <offset within the passage>, \"attributes\": {...}}]}.";

const FEW_SHOT_EXAMPLE: &str = "Example passage: \"Acme Corp raised a $12M Series A led by Example Ventures \
in March 2024.\" Example output: {\"extractions\": [\
{\"class\": \"organization\", \"text\": \"Acme Corp\", \"start\": 0, \"end\": 9}, \
{\"class\": \"funding_amount\", \"text\": \"$12M\", \"start\": 22, \"end\": 26}, \
{\"class\": \"funding_round\", \"text\": \"Series A\", \"start\": 27, \"end\": 35}, \
{\"class\": \"organization\", \"text\": \"Example Ventures\", \"start\": 41, \"end\": 58}, \
{\"class\": \"date\", \"text\": \"March 2024\", \"start\": 62, \"end\": 72}]}";

#[derive(Debug, Clone)]
pub struct ExtractionResult {
    pub entities: Vec<Entity>,
    pub success: bool,
    pub error: Option<String>,
}

impl ExtractionResult {
    fn failed(error: impl Into<String>) -> Self {
        Self { entities: Vec::new(), success: false, error: Some(error.into()) }
    }

    fn ok(entities: Vec<Entity>) -> Self {
        Self { entities, success: true, error: None }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EntityConfig {
    pub max_chunk_size: usize,
    pub max_concurrent: usize,
    pub passes: u32,
}

pub struct EntityExtractor {
    llm: LlmClient,
    semaphore: Arc<Semaphore>,
    config: EntityConfig,
}

impl EntityExtractor {
    pub fn new(llm: LlmClient, config: EntityConfig) -> Self {
        Self {
            llm,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
            config,
        }
    }

    #[instrument(skip(self, text), fields(source_id = %source_id, len = text.len()))]
    pub async fn extract_entities(
        &self,
        text: &str,
        source_id: SourceId,
        _source_kind: SourceKind,
    ) -> ExtractionResult {
        let _permit = match self.semaphore.acquire().await {
            Ok(p) => p,
            Err(_) => return ExtractionResult::failed("entity extraction semaphore closed"),
        };

        let chunks = chunk_text(text, self.config.max_chunk_size);
        let mut seen: HashSet<(EntityClass, String, usize, usize, SourceId)> = HashSet::new();
        let mut entities = Vec::new();

        for _pass in 0..self.config.passes.max(1) {
            for chunk in &chunks {
                let prompt = build_prompt(&chunk.text);
                let response = match self.llm.generate(&prompt, Some(SYSTEM_PROMPT), None).await {
                    Ok(text) => text,
                    Err(e) => return ExtractionResult::failed(format!("extraction model call failed: {e}")),
                };

                let raw = match parse_extractions(&response) {
                    Ok(r) => r,
                    Err(e) => {
                        warn!(error = %e, "could not parse extraction response, skipping chunk");
                        continue;
                    }
                };

                for item in raw {
                    if let Some(entity) = item.into_entity(chunk.start, source_id) {
                        let key = entity.dedup_key();
                        if seen.insert(key) {
                            entities.push(entity);
                        }
                    }
                }
            }
        }

        ExtractionResult::ok(entities)
    }
}

fn build_prompt(chunk_text: &str) -> String {
    format!("{FEW_SHOT_EXAMPLE}\n\nNow extract entities from this passage:\n\n{chunk_text}")
}

struct RawExtraction {
    class: EntityClass,
    text: String,
    start: usize,
    end: usize,
    attributes: HashMap<String, Value>,
}

impl RawExtraction {
    fn into_entity(self, chunk_start: usize, source_id: SourceId) -> Option<Entity> {
        Some(Entity {
            class: self.class,
            source_start: chunk_start + self.start,
            source_end: chunk_start + self.end,
            text: self.text,
            attributes: self.attributes,
            source_id,
            confidence: None,
        })
    }
}

/// Parse the model's response, tolerating three shapes: `{"extractions": [...]}`,
/// `{"entities": [...]}`, or a flat JSON array (spec §4.6).
fn parse_extractions(response: &str) -> Result<Vec<RawExtraction>, String> {
    let value: Value = serde_json::from_str(response.trim()).map_err(|e| e.to_string())?;

    let items = if let Some(arr) = value.as_array() {
        arr.clone()
    } else if let Some(arr) = value.get("extractions").and_then(Value::as_array) {
        arr.clone()
    } else if let Some(arr) = value.get("entities").and_then(Value::as_array) {
        arr.clone()
    } else {
        return Err("response had no recognizable extractions shape".to_string());
    };

    let mut parsed = Vec::with_capacity(items.len());
    for item in items {
        let class_str = item.get("class").and_then(Value::as_str).unwrap_or_default();
        let class = match EntityClass::parse(class_str) {
            Some(c) => c,
            None => continue,
        };
        let text = item.get("text").and_then(Value::as_str).unwrap_or_default().to_string();
        if text.is_empty() {
            continue;
        }
        let start = item.get("start").and_then(Value::as_u64).unwrap_or(0) as usize;
        let end = item
            .get("end")
            .and_then(Value::as_u64)
            .map(|v| v as usize)
            .unwrap_or(start + text.chars().count());
        let attributes = item
            .get("attributes")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .collect();

        parsed.push(RawExtraction { class, text, start, end, attributes });
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_extractions_shape() {
        let body = r#"{"extractions": [{"class": "organization", "text": "Acme", "start": 0, "end": 4}]}"#;
        let parsed = parse_extractions(body).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].class, EntityClass::Organization);
    }

    #[test]
    fn parses_entities_shape() {
        let body = r#"{"entities": [{"class": "person", "text": "Jane Doe"}]}"#;
        let parsed = parse_extractions(body).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].class, EntityClass::Person);
    }

    #[test]
    fn parses_flat_list_shape() {
        let body = r#"[{"class": "metric", "text": "40% YoY"}]"#;
        let parsed = parse_extractions(body).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn unrecognized_class_is_skipped_not_fatal() {
        let body = r#"{"extractions": [{"class": "bogus", "text": "x"}, {"class": "date", "text": "2024"}]}"#;
        let parsed = parse_extractions(body).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].class, EntityClass::Date);
    }
}
