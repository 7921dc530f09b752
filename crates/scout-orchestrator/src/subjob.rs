//! One sub-job per ingested input (spec §4.10, step 2): dispatch by
//! `SourceKind` to C5 (Documents), C3 (Scrape), or C4 (Deck), producing a
//! `Source` in its terminal `Extracted`/`Failed` state.
//!
//! Grounded on spec §9 "Heterogeneous sources": capability-based dispatch
//! via an explicit match rather than a trait-object handler table, since
//! the three kinds take structurally different inputs (bytes vs URL vs
//! URL+credentials).

use crate::error;
use scout_deck::{DeckExtractor, ProgressHandle};
use scout_docs::extract_document;
use scout_scrape::ScrapeClient;
use scout_types::{PipelineError, Source, SourceKind};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

pub enum SourceInput {
    Document { name: String, bytes: Vec<u8> },
    Url { url: String },
    Deck { url: String, email: String, password: Option<String> },
}

impl SourceInput {
    fn kind(&self) -> SourceKind {
        match self {
            SourceInput::Document { .. } => SourceKind::Document,
            SourceInput::Url { .. } => SourceKind::Web,
            SourceInput::Deck { .. } => SourceKind::Deck,
        }
    }

    fn origin(&self) -> String {
        match self {
            SourceInput::Document { name, .. } => name.clone(),
            SourceInput::Url { url } => url.clone(),
            SourceInput::Deck { url, .. } => url.clone(),
        }
    }
}

/// Run one sub-job to completion, honoring `cancel`. Never panics or
/// propagates an error out of band; any failure is captured on the
/// returned `Source` (spec §7 "Per-source errors are captured on the
/// Source record; the pipeline continues with partial inputs").
#[instrument(skip(input, scrape), fields(kind = ?input.kind()))]
pub async fn run_subjob(input: SourceInput, scrape: Arc<ScrapeClient>, cancel: CancellationToken) -> Source {
    let mut source = Source::new(input.kind(), input.origin());
    source.mark_in_progress();

    let outcome = tokio::select! {
        _ = cancel.cancelled() => Err(error::cancelled()),
        result = dispatch(input, scrape) => result,
    };

    match outcome {
        Ok((text, metadata)) => source.mark_extracted(text, metadata),
        Err(e) => source.mark_failed(e),
    }
    source
}

async fn dispatch(input: SourceInput, scrape: Arc<ScrapeClient>) -> Result<(String, HashMap<String, serde_json::Value>), PipelineError> {
    match input {
        SourceInput::Document { name, bytes } => extract_document_blocking(name, bytes).await,
        SourceInput::Url { url } => extract_url(&url, scrape).await,
        SourceInput::Deck { url, email, password } => extract_deck(&url, &email, password.as_deref()).await,
    }
}

async fn extract_document_blocking(name: String, bytes: Vec<u8>) -> Result<(String, HashMap<String, serde_json::Value>), PipelineError> {
    let filename = name.clone();
    let joined = tokio::task::spawn_blocking(move || extract_document(&filename, &bytes))
        .await
        .map_err(|e| error::join_failed(e.to_string()))?;

    let doc = joined?;
    let metadata = object_from_json(json!({
        "source_type": "document",
        "filename": name,
        "byte_count": doc.byte_count,
        "extracted_length": doc.extracted_length,
    }));
    Ok((doc.text, metadata))
}

async fn extract_url(url: &str, scrape: Arc<ScrapeClient>) -> Result<(String, HashMap<String, serde_json::Value>), PipelineError> {
    let content = scrape.scrape(url, false).await?;
    let mut metadata = content.metadata;
    metadata.insert("source_type".to_string(), json!("web"));
    Ok((content.content, metadata))
}

async fn extract_deck(url: &str, email: &str, password: Option<&str>) -> Result<(String, HashMap<String, serde_json::Value>), PipelineError> {
    let extractor = DeckExtractor::new(ProgressHandle::new());
    let extraction = extractor.extract(url, email, password).await?;
    let metadata = object_from_json(extraction.metadata);
    Ok((extraction.text, metadata))
}

fn object_from_json(value: serde_json::Value) -> HashMap<String, serde_json::Value> {
    value.as_object().cloned().map(|m| m.into_iter().collect()).unwrap_or_default()
}
