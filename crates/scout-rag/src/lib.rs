//! # Scout RAG
//!
//! Builds a per-request dense-vector index over the aggregated research
//! corpus and answers k-nearest-neighbor similarity queries against it
//! (spec §4.8, C8).
//!
//! Grounded on `riptide-intelligence::provider`'s embedding boundary and
//! `riptide-html::processor`'s paragraph-chunking shape; the index itself
//! is a flat in-memory cosine-similarity scan, sized for a single request's
//! corpus rather than a persistent store.

mod chunk;
mod embed;

pub use chunk::{chunk_corpus, TARGET_CHUNK_SIZE};
pub use embed::{EmbeddingProvider, HttpEmbeddingProvider};

use scout_types::PipelineError;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Deterministic section ordering for the aggregate corpus (spec §4.8).
pub const SECTION_ORDER: [&str; 6] = ["Report", "Documents", "Scraped Web", "Crawled Web", "Deck", "Deep Research Content"];

#[derive(Debug, Clone)]
pub struct IndexedChunk {
    pub text: String,
    pub embedding: Vec<f32>,
    pub section: String,
}

#[derive(Debug, Clone)]
pub struct SearchHit {
    pub text: String,
    pub section: String,
    pub score: f32,
}

pub struct RagIndex {
    report_id: Uuid,
    model_id: String,
    chunks: Vec<IndexedChunk>,
}

impl RagIndex {
    /// Build an index for `report_id` from `sections`, a list of
    /// `(section_name, content)` pairs already in the order they should
    /// appear. Callers should order by [`SECTION_ORDER`]; this type does not
    /// reorder them itself, since the Orchestrator assembles the corpus.
    #[instrument(skip(sections, embedder), fields(report_id = %report_id))]
    pub async fn build(
        report_id: Uuid,
        sections: &[(&str, String)],
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, PipelineError> {
        let mut chunks = Vec::new();
        for (section, content) in sections {
            for piece in chunk_corpus(content, TARGET_CHUNK_SIZE) {
                let embedding = embedder.embed(&piece).await?;
                chunks.push(IndexedChunk { text: piece, embedding, section: section.to_string() });
            }
        }

        Ok(Self { report_id, model_id: embedder.model_id().to_string(), chunks })
    }

    pub fn report_id(&self) -> Uuid {
        self.report_id
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// `search(query_embedding, k)` — top-k chunks by cosine similarity.
    pub fn search(&self, query_embedding: &[f32], k: usize) -> Vec<SearchHit> {
        let mut scored: Vec<SearchHit> = self
            .chunks
            .iter()
            .map(|c| SearchHit {
                text: c.text.clone(),
                section: c.section.clone(),
                score: cosine_similarity(query_embedding, &c.embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }
}

/// Returns `Some` if `report_id` matches the built index, `None` (a
/// "no_context" signal per spec §4.8) otherwise.
pub fn lookup<'a>(index: &'a RagIndex, report_id: Uuid) -> Option<&'a RagIndex> {
    (index.report_id == report_id).then_some(index)
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StubEmbedder;

    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, PipelineError> {
            // Deterministic stand-in: embed by character frequency of 'a' vs 'b'.
            let a_count = text.matches('a').count() as f32;
            let b_count = text.matches('b').count() as f32;
            Ok(vec![a_count, b_count])
        }

        fn model_id(&self) -> &str {
            "stub-embedder"
        }
    }

    #[tokio::test]
    async fn search_ranks_most_similar_chunk_first() {
        let report_id = Uuid::new_v4();
        let sections = vec![
            ("Report", "aaaa".to_string()),
            ("Documents", "bbbb".to_string()),
        ];
        let index = RagIndex::build(report_id, &sections, Arc::new(StubEmbedder)).await.unwrap();

        let hits = index.search(&[5.0, 0.0], 1);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].section, "Report");
    }

    #[tokio::test]
    async fn lookup_returns_none_for_unknown_report_id() {
        let report_id = Uuid::new_v4();
        let sections = vec![("Report", "aaaa".to_string())];
        let index = RagIndex::build(report_id, &sections, Arc::new(StubEmbedder)).await.unwrap();

        assert!(lookup(&index, Uuid::new_v4()).is_none());
        assert!(lookup(&index, report_id).is_some());
    }
}
