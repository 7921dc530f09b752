//! `Report` — the pipeline's output artifact (spec §3, §6).

use serde::{Deserialize, Serialize};

use crate::config::Mode;
use crate::source::Source;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub url: Option<String>,
    pub preview: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub text: String,
    pub success: bool,
    pub needs_clarification: bool,
    pub clarification_question: Option<String>,
    pub citations: Vec<Citation>,
    pub sources_used: Vec<Source>,
    pub engine: Mode,
    pub latency_ms: u64,
    pub error: Option<String>,
    /// Set true when a deep-mode run fell back to classic mode (spec §4.10).
    #[serde(default)]
    pub fallback_used: bool,
}

impl Report {
    pub fn failure(engine: Mode, error: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            success: false,
            needs_clarification: false,
            clarification_question: None,
            citations: Vec::new(),
            sources_used: Vec::new(),
            engine,
            latency_ms: 0,
            error: Some(error.into()),
            fallback_used: false,
        }
    }

    pub fn needs_clarification(engine: Mode, question: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            success: false,
            needs_clarification: true,
            clarification_question: Some(question.into()),
            citations: Vec::new(),
            sources_used: Vec::new(),
            engine,
            latency_ms: 0,
            error: None,
            fallback_used: false,
        }
    }
}
