//! The deep-research engine boundary (spec §4.10 Deep mode, step 4).
//!
//! The engine itself ("an external collaborator") is out of scope for this
//! crate — only the request/response contract it's invoked through.
//! Grounded on `riptide-intelligence::provider::LlmProvider`'s
//! trait-at-the-seam shape: the Orchestrator depends on this trait, not on
//! any concrete multi-agent implementation, so a real engine can be wired
//! in without touching orchestration logic.

use async_trait::async_trait;
use scout_types::PipelineError;

/// Translated from `Config{breadth, depth, max_tool_calls, model}` (spec §3).
#[derive(Debug, Clone)]
pub struct DeepEngineConfig {
    pub breadth: u32,
    pub depth: u32,
    pub max_tool_calls: u32,
    pub model: String,
}

/// The assembled input text (spec §4.10 Deep mode, step 3) plus the
/// translated configuration.
#[derive(Debug, Clone)]
pub struct DeepRequest {
    pub input_text: String,
    pub config: DeepEngineConfig,
}

#[derive(Debug, Clone)]
pub struct DeepCitation {
    pub id: String,
    pub kind: String,
    pub title: String,
    pub url: Option<String>,
    pub preview: Option<String>,
}

/// The three shapes a deep engine invocation can resolve to (spec §4.10
/// Deep mode, step 4).
#[derive(Debug, Clone)]
pub enum DeepOutcome {
    Report { text: String, citations: Vec<DeepCitation> },
    Clarification { question: String },
}

#[async_trait]
pub trait DeepResearchEngine: Send + Sync {
    async fn run(&self, request: DeepRequest) -> Result<DeepOutcome, PipelineError>;
}
