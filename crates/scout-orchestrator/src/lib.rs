//! # Scout Orchestrator
//!
//! Ties every other `scout-*` crate together into the end-to-end pipeline
//! (spec §4.10, C10): fans ingestion out into per-source sub-jobs bounded
//! by a concurrency cap and a global deadline, then synthesizes a report
//! either directly (Classic mode) or via an external deep-research engine
//! (Deep mode), with a Classic fallback if the latter errors out.
//!
//! Grounded on `riptide-api`'s request-handling shape for the
//! semaphore/deadline/cancellation pattern, and on `langextract_service.py`
//! / `docsend_client.py`'s surrounding Python orchestrator for the
//! step ordering this module encodes in `run`.

mod continuation;
mod deep;
mod error;
mod prompt;
mod subjob;

pub use continuation::{answer_question, AnswerMethod, ContinuationAnswer};
pub use deep::{DeepCitation, DeepEngineConfig, DeepOutcome, DeepRequest, DeepResearchEngine};
pub use prompt::{ClassicPromptInput, NamedSection};
pub use subjob::SourceInput;

use futures::future::join_all;
use scout_docs::extract_document;
use scout_entities::{render_summary, EntityExtractor, SummaryOptions};
use scout_llm::LlmClient;
use scout_rag::{EmbeddingProvider, RagIndex};
use scout_scrape::ScrapeClient;
use scout_sitemap::SitemapResolver;
use scout_types::{Config, Mode, PipelineError, Report, ResearchRequest, Source, SourceKind, SourceStatus};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Carried forward so `continue(clarification_response)` (spec §4.10 Deep
/// mode, step 5) can re-run without re-extracting or re-ingesting.
#[derive(Clone)]
pub struct PendingClarification {
    pub report_id: Uuid,
    pub original_query: String,
    pub entity_summary: Option<String>,
    pub engine_config: DeepEngineConfig,
}

/// Everything one call to [`Orchestrator::run`] produces: the `Report`
/// itself, the RAG index built over its corpus (for later C11 questions),
/// and a pending clarification state when the deep engine asked one.
pub struct RunOutcome {
    pub report_id: Uuid,
    pub report: Report,
    pub rag_index: Option<RagIndex>,
    pub pending_clarification: Option<PendingClarification>,
}

pub struct Orchestrator {
    sitemap: SitemapResolver,
    scrape: Arc<ScrapeClient>,
    entities: EntityExtractor,
    llm: LlmClient,
    embedder: Arc<dyn EmbeddingProvider>,
    deep_engine: Option<Arc<dyn DeepResearchEngine>>,
    max_concurrent_subjobs: usize,
    global_deadline: Duration,
}

impl Orchestrator {
    pub fn new(
        sitemap: SitemapResolver,
        scrape: Arc<ScrapeClient>,
        entities: EntityExtractor,
        llm: LlmClient,
        embedder: Arc<dyn EmbeddingProvider>,
        deep_engine: Option<Arc<dyn DeepResearchEngine>>,
    ) -> Self {
        Self {
            sitemap,
            scrape,
            entities,
            llm,
            embedder,
            deep_engine,
            max_concurrent_subjobs: 8,
            global_deadline: Duration::from_secs(600),
        }
    }

    pub fn with_max_concurrent_subjobs(mut self, n: usize) -> Self {
        self.max_concurrent_subjobs = n.max(1);
        self
    }

    pub fn with_global_deadline(mut self, deadline: Duration) -> Self {
        self.global_deadline = deadline;
        self
    }

    #[instrument(skip(self, request), fields(mode = ?request.mode))]
    pub async fn run(&self, request: ResearchRequest) -> RunOutcome {
        let report_id = Uuid::new_v4();
        let start = Instant::now();

        if let Err(kind) = request.validate() {
            return RunOutcome {
                report_id,
                report: Report::failure(request.mode, kind.to_string()),
                rag_index: None,
                pending_clarification: None,
            };
        }

        let sources = self.ingest(&request).await;

        let entity_summary = if request.config.extract_entities {
            Some(self.extract_and_summarize(&sources).await)
        } else {
            None
        };

        let outcome = match request.mode {
            Mode::Classic => self.run_classic(report_id, &request, &sources, entity_summary.as_deref()).await,
            Mode::Deep => self.run_deep(report_id, &request, &sources, entity_summary.as_deref()).await,
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        let rag_index = self.build_rag_index(report_id, &sources, outcome.report_text_for_index()).await;

        RunOutcome {
            report_id,
            report: outcome.into_report(request.mode, sources, elapsed_ms),
            rag_index,
            pending_clarification: outcome_pending(report_id, &request, entity_summary),
        }
    }

    /// Re-run a deep-mode request after the engine asked for clarification
    /// (spec §4.10 Deep mode, step 5).
    #[instrument(skip(self, pending, clarification_response))]
    pub async fn continue_clarification(&self, pending: PendingClarification, clarification_response: &str) -> RunOutcome {
        let start = Instant::now();
        let input_text = prompt::compose_clarification_followup(&pending.original_query, clarification_response, pending.entity_summary.as_deref());

        let engine = match &self.deep_engine {
            Some(e) => e.clone(),
            None => {
                return RunOutcome {
                    report_id: pending.report_id,
                    report: Report::failure(Mode::Deep, "no deep research engine configured"),
                    rag_index: None,
                    pending_clarification: None,
                };
            }
        };

        let request = DeepRequest { input_text, config: pending.engine_config.clone() };
        let deep_result = engine.run(request).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        let (report, still_pending) = match deep_result {
            Ok(DeepOutcome::Report { text, citations }) => (build_deep_report(Mode::Deep, text, citations, elapsed_ms, false), None),
            Ok(DeepOutcome::Clarification { question }) => {
                let mut report = Report::needs_clarification(Mode::Deep, question);
                report.latency_ms = elapsed_ms;
                (report, Some(pending))
            }
            Err(e) => (Report::failure(Mode::Deep, e.to_string()), None),
        };

        RunOutcome { report_id: pending.report_id, report, rag_index: None, pending_clarification: still_pending }
    }

    async fn ingest(&self, request: &ResearchRequest) -> Vec<Source> {
        let mut inputs: Vec<SourceInput> = Vec::new();

        for doc in &request.documents {
            inputs.push(SourceInput::Document { name: doc.name.clone(), bytes: doc.bytes.clone() });
        }
        for url in &request.urls {
            inputs.push(SourceInput::Url { url: url.clone() });
        }
        if let Some(root) = &request.sitemap_root {
            match self.sitemap.discover_sitemap_urls(root).await {
                Ok(urls) => inputs.extend(urls.into_iter().map(|url| SourceInput::Url { url })),
                Err(e) => warn!(root, error = %e, "sitemap discovery failed, continuing without its pages"),
            }
        }
        if let Some(crawl) = &request.crawl {
            match self.scrape.map_url(&crawl.start_url, None, false, false, crawl.max_pages).await {
                Ok(urls) => inputs.extend(urls.into_iter().map(|url| SourceInput::Url { url })),
                Err(e) => warn!(start_url = %crawl.start_url, error = %e, "crawl discovery failed, continuing without its pages"),
            }
        }
        if let Some(deck) = &request.deck {
            inputs.push(SourceInput::Deck { url: deck.url.clone(), email: deck.email.clone(), password: deck.password.clone() });
        }

        self.run_subjobs(inputs).await
    }

    /// Spec §4.10 step 2: run every sub-job concurrently, bounded by
    /// `max_concurrent_subjobs`. A watcher cancels the shared token once the
    /// global deadline passes; sub-jobs still in flight then fail with
    /// `Cancelled` on their own `Source` instead of being dropped outright,
    /// so the pipeline always continues with whatever extracted (spec §7).
    async fn run_subjobs(&self, inputs: Vec<SourceInput>) -> Vec<Source> {
        if inputs.is_empty() {
            return Vec::new();
        }

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_subjobs));
        let cancel = CancellationToken::new();
        let scrape = self.scrape.clone();

        let deadline = self.global_deadline;
        let watcher_cancel = cancel.clone();
        let watcher = tokio::spawn(async move {
            tokio::time::sleep(deadline).await;
            watcher_cancel.cancel();
        });

        let tasks = inputs.into_iter().map(|input| {
            let semaphore = semaphore.clone();
            let scrape = scrape.clone();
            let cancel = cancel.clone();
            async move {
                let _permit = semaphore.acquire_owned().await.expect("semaphore never closed");
                subjob::run_subjob(input, scrape, cancel).await
            }
        });

        let sources = join_all(tasks).await;
        cancel.cancel();
        watcher.abort();
        sources
    }

    async fn extract_and_summarize(&self, sources: &[Source]) -> String {
        let mut all_entities = Vec::new();
        for source in sources {
            let Some(text) = &source.text else { continue };
            let result = self.entities.extract_entities(text, source.id, source.kind).await;
            if !result.success {
                warn!(source_id = %source.id, error = ?result.error, "entity extraction failed for source, continuing without it");
            }
            all_entities.extend(result.entities);
        }
        render_summary(&all_entities, sources, SummaryOptions::default())
    }

    async fn run_classic(&self, _report_id: Uuid, request: &ResearchRequest, sources: &[Source], entity_summary: Option<&str>) -> ModeOutcome {
        let all_failed = !sources.is_empty() && sources.iter().all(|s| !s.is_extracted());

        if all_failed && request.query.trim().is_empty() {
            return ModeOutcome::Failure(error::all_sources_failed());
        }

        let documents = named_sections(sources, SourceKind::Document);
        let web = named_sections(sources, SourceKind::Web);
        let deck = named_sections(sources, SourceKind::Deck).into_iter().next();
        let unavailable = unavailable_notes(sources);

        let input = ClassicPromptInput { query: &request.query, documents: &documents, web: &web, deck: deck.as_ref(), entity_summary, unavailable: &unavailable };
        let prompt_text = prompt::compose_classic_prompt(&input);

        match self.llm.generate(&prompt_text, Some(prompt::SYSTEM_INSTRUCTION), Some(&request.config.model)).await {
            Ok(text) => ModeOutcome::Report { text, citations: Vec::new(), fallback_used: false },
            Err(e) => ModeOutcome::Failure(e),
        }
    }

    async fn run_deep(&self, report_id: Uuid, request: &ResearchRequest, sources: &[Source], entity_summary: Option<&str>) -> ModeOutcome {
        let Some(engine) = &self.deep_engine else {
            info!(%report_id, "no deep engine configured, falling back to classic synthesis");
            return self.classic_fallback(report_id, request, sources, entity_summary).await;
        };

        let documents = named_sections(sources, SourceKind::Document);
        let web = named_sections(sources, SourceKind::Web);
        let deck = named_sections(sources, SourceKind::Deck).into_iter().next();
        let input_text = prompt::compose_deep_input(&request.query, &documents, &web, deck.as_ref(), entity_summary);

        let engine_config = DeepEngineConfig {
            breadth: request.config.breadth,
            depth: request.config.depth,
            max_tool_calls: request.config.max_tool_calls,
            model: request.config.model.clone(),
        };

        match engine.run(DeepRequest { input_text, config: engine_config }).await {
            Ok(DeepOutcome::Report { text, citations }) => ModeOutcome::Report { text, citations, fallback_used: false },
            Ok(DeepOutcome::Clarification { question }) => ModeOutcome::Clarification(question),
            Err(e) => {
                warn!(%report_id, error = %e, "deep engine failed, falling back to classic synthesis");
                self.classic_fallback(report_id, request, sources, entity_summary).await
            }
        }
    }

    async fn classic_fallback(&self, report_id: Uuid, request: &ResearchRequest, sources: &[Source], entity_summary: Option<&str>) -> ModeOutcome {
        match self.run_classic(report_id, request, sources, entity_summary).await {
            ModeOutcome::Report { text, citations, .. } => ModeOutcome::Report { text, citations, fallback_used: true },
            other => other,
        }
    }

    async fn build_rag_index(&self, report_id: Uuid, sources: &[Source], report_text: Option<&str>) -> Option<RagIndex> {
        let mut sections: Vec<(&str, String)> = Vec::new();
        if let Some(text) = report_text {
            sections.push(("Report", text.to_string()));
        }
        for kind_label in [(SourceKind::Document, "Documents"), (SourceKind::Web, "Scraped Web"), (SourceKind::Deck, "Deck")] {
            let (kind, label) = kind_label;
            let joined: String = sources
                .iter()
                .filter(|s| s.kind == kind)
                .filter_map(|s| s.text.as_deref())
                .collect::<Vec<_>>()
                .join("\n\n");
            if !joined.is_empty() {
                sections.push((label, joined));
            }
        }

        if sections.is_empty() {
            return None;
        }

        match RagIndex::build(report_id, &sections, self.embedder.clone()).await {
            Ok(index) => Some(index),
            Err(e) => {
                warn!(%report_id, error = %e, "rag index build failed, continuation will degrade to direct analysis");
                None
            }
        }
    }
}

enum ModeOutcome {
    Report { text: String, citations: Vec<DeepCitation>, fallback_used: bool },
    Clarification(String),
    Failure(PipelineError),
}

impl ModeOutcome {
    fn report_text_for_index(&self) -> Option<&str> {
        match self {
            ModeOutcome::Report { text, .. } => Some(text),
            _ => None,
        }
    }

    fn into_report(self, mode: Mode, sources: Vec<Source>, latency_ms: u64) -> Report {
        match self {
            ModeOutcome::Report { text, citations, fallback_used } => {
                let mut report = build_deep_report(mode, text, citations, latency_ms, fallback_used);
                report.sources_used = sources;
                report
            }
            ModeOutcome::Clarification(question) => {
                let mut report = Report::needs_clarification(mode, question);
                report.latency_ms = latency_ms;
                report.sources_used = sources;
                report
            }
            ModeOutcome::Failure(e) => {
                let mut report = Report::failure(mode, e.to_string());
                report.latency_ms = latency_ms;
                report.sources_used = sources;
                report
            }
        }
    }
}

fn build_deep_report(mode: Mode, text: String, citations: Vec<DeepCitation>, latency_ms: u64, fallback_used: bool) -> Report {
    Report {
        text,
        success: true,
        needs_clarification: false,
        clarification_question: None,
        citations: citations
            .into_iter()
            .map(|c| scout_types::Citation { id: c.id, kind: c.kind, title: c.title, url: c.url, preview: c.preview })
            .collect(),
        sources_used: Vec::new(),
        engine: mode,
        latency_ms,
        error: None,
        fallback_used,
    }
}

fn outcome_pending(report_id: Uuid, request: &ResearchRequest, entity_summary: Option<String>) -> Option<PendingClarification> {
    if request.mode != Mode::Deep {
        return None;
    }
    Some(PendingClarification {
        report_id,
        original_query: request.query.clone(),
        entity_summary,
        engine_config: DeepEngineConfig {
            breadth: request.config.breadth,
            depth: request.config.depth,
            max_tool_calls: request.config.max_tool_calls,
            model: request.config.model.clone(),
        },
    })
}

fn named_sections(sources: &[Source], kind: SourceKind) -> Vec<NamedSection> {
    sources
        .iter()
        .filter(|s| s.kind == kind)
        .filter_map(|s| s.text.as_ref().map(|text| (s.origin.clone(), text.clone())))
        .collect()
}

/// One line per failed source, for the prompt's "Unavailable Sources" note
/// (§8 S5: the report must call out a failed source by name rather than
/// silently omitting it).
fn unavailable_notes(sources: &[Source]) -> Vec<String> {
    sources
        .iter()
        .filter_map(|s| match &s.status {
            SourceStatus::Failed { error } => Some(format!("{:?} ({}): {}", s.kind, s.origin, error)),
            _ => None,
        })
        .collect()
}

/// Parse a raw document and fold it into a one-off `Source` outside the
/// normal sub-job pool — used by callers (e.g. the CLI) that want to
/// validate a single upload before committing it to a full run.
pub fn preview_document(name: &str, bytes: &[u8]) -> Result<String, PipelineError> {
    extract_document(name, bytes).map(|doc| doc.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_sections_skips_non_extracted_sources() {
        let mut pending = Source::new(SourceKind::Web, "https://pending.example".to_string());
        let mut extracted = Source::new(SourceKind::Web, "https://done.example".to_string());
        extracted.mark_in_progress();
        extracted.mark_extracted("body text".to_string(), Default::default());
        pending.mark_in_progress();

        let sections = named_sections(&[pending, extracted], SourceKind::Web);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].0, "https://done.example");
    }

    #[test]
    fn unavailable_notes_only_include_failed_sources() {
        let mut ok = Source::new(SourceKind::Web, "https://done.example".to_string());
        ok.mark_in_progress();
        ok.mark_extracted("body text".to_string(), Default::default());

        let mut failed = Source::new(SourceKind::Deck, "https://docsend.example/view/abc".to_string());
        failed.mark_in_progress();
        failed.mark_failed(PipelineError::new(scout_types::ErrorKind::AccessDenied(scout_types::AccessDeniedKind::Approval), "pending approval"));

        let notes = unavailable_notes(&[ok, failed]);
        assert_eq!(notes.len(), 1);
        assert!(notes[0].contains("docsend.example"));
    }

    #[test]
    fn mode_outcome_failure_carries_latency() {
        let outcome = ModeOutcome::Failure(error::all_sources_failed());
        let report = outcome.into_report(Mode::Classic, Vec::new(), 42);
        assert!(!report.success);
        assert_eq!(report.latency_ms, 42);
    }

    #[test]
    fn pending_clarification_only_for_deep_mode() {
        let mut request = ResearchRequest {
            query: "Evaluate Acme".to_string(),
            mode: Mode::Classic,
            documents: Vec::new(),
            urls: Vec::new(),
            sitemap_root: None,
            crawl: None,
            deck: None,
            config: Config::default(),
        };
        assert!(outcome_pending(Uuid::new_v4(), &request, None).is_none());
        request.mode = Mode::Deep;
        assert!(outcome_pending(Uuid::new_v4(), &request, None).is_some());
    }
}
