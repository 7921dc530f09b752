//! Report Continuation (spec §4.11, C11): answer a follow-up question
//! against a previously built RAG index, or degrade gracefully when one
//! isn't available.

use scout_llm::LlmClient;
use scout_rag::{EmbeddingProvider, RagIndex};
use scout_types::{ErrorKind, PipelineError};
use std::sync::Arc;
use uuid::Uuid;

/// Total-context budget for the "direct analysis" degrade path (spec
/// §4.11, step 1) — generous enough for a handful of extracted sources
/// without risking the provider's context window.
pub const DIRECT_ANALYSIS_BUDGET: usize = 12_000;

pub const TOP_K: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerMethod {
    Rag,
    Direct,
    General,
}

impl AnswerMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerMethod::Rag => "rag",
            AnswerMethod::Direct => "direct",
            AnswerMethod::General => "general",
        }
    }
}

pub struct ContinuationAnswer {
    pub answer: String,
    pub method: AnswerMethod,
}

/// `direct_fallback_text` is the concatenation of all extracted source
/// texts in §4.8 section order, already assembled by the caller (the
/// Orchestrator keeps the originating sources, this module doesn't).
pub async fn answer_question(
    question: &str,
    report_id: Uuid,
    rag_index: Option<&RagIndex>,
    embedder: Option<&Arc<dyn EmbeddingProvider>>,
    direct_fallback_text: Option<&str>,
    llm: &LlmClient,
    answering_model: &str,
) -> Result<ContinuationAnswer, PipelineError> {
    if let (Some(index), Some(embedder)) = (rag_index, embedder) {
        if index.report_id() == report_id {
            return answer_via_rag(question, index, embedder, llm, answering_model).await;
        }
    }

    match direct_fallback_text {
        Some(text) => answer_direct(question, text, llm, answering_model).await,
        None => answer_general(question, llm, answering_model).await,
    }
}

async fn answer_via_rag(
    question: &str,
    index: &RagIndex,
    embedder: &Arc<dyn EmbeddingProvider>,
    llm: &LlmClient,
    answering_model: &str,
) -> Result<ContinuationAnswer, PipelineError> {
    if embedder.model_id() != index.model_id() {
        return Err(PipelineError::new(
            ErrorKind::InvalidResponseShape,
            format!("embedder model '{}' does not match index model '{}'", embedder.model_id(), index.model_id()),
        ));
    }

    let query_embedding = embedder.embed(question).await?;
    let hits = index.search(&query_embedding, TOP_K);
    let context: String = hits.iter().map(|h| h.text.as_str()).collect::<Vec<_>>().join("\n\n");
    let prompt = format!("{context}\n\nQuestion: {question}");

    let answer = llm.generate(&prompt, None, Some(answering_model)).await?;
    Ok(ContinuationAnswer { answer, method: AnswerMethod::Rag })
}

async fn answer_direct(question: &str, source_text: &str, llm: &LlmClient, answering_model: &str) -> Result<ContinuationAnswer, PipelineError> {
    let truncated: String = source_text.chars().take(DIRECT_ANALYSIS_BUDGET).collect();
    let prompt = format!("{truncated}\n\nQuestion: {question}");
    let answer = llm.generate(&prompt, None, Some(answering_model)).await?;
    Ok(ContinuationAnswer { answer, method: AnswerMethod::Direct })
}

async fn answer_general(question: &str, llm: &LlmClient, answering_model: &str) -> Result<ContinuationAnswer, PipelineError> {
    let answer = llm.generate(question, None, Some(answering_model)).await?;
    Ok(ContinuationAnswer { answer, method: AnswerMethod::General })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_labels_match_spec_vocabulary() {
        assert_eq!(AnswerMethod::Rag.as_str(), "rag");
        assert_eq!(AnswerMethod::Direct.as_str(), "direct");
        assert_eq!(AnswerMethod::General.as_str(), "general");
    }
}
