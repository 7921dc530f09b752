//! Scout CLI — runs one due-diligence research request end to end and
//! prints the resulting report (spec §3, §4.10).
//!
//! Grounded on `riptide-workers`'s `main.rs` for the tracing-subscriber
//! init / clap::Parser / anyhow::Result shape; unlike `riptide-cli` (a
//! thin HTTP client to a separate API server) this binary wires the
//! pipeline crates directly in-process, since no server crate exists in
//! this workspace.

mod args;
mod output;

use anyhow::Result;
use args::Args;
use clap::Parser;
use output::OutputFormat;
use scout_cache::{Cache, CacheConfig};
use scout_entities::{EntityConfig, EntityExtractor};
use scout_llm::{LlmClient, ProviderRegistry};
use scout_rag::{EmbeddingProvider, HttpEmbeddingProvider};
use scout_scrape::ScrapeClient;
use scout_sitemap::SitemapResolver;
use scout_types::{Config, DeckSpec, DocumentInput, EnvConfig, Mode, ResearchRequest};
use scout_orchestrator::Orchestrator;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();
    let output_format = OutputFormat::parse(&args.output)?;
    let mode = match args.mode.to_lowercase().as_str() {
        "classic" => Mode::Classic,
        "deep" => Mode::Deep,
        other => anyhow::bail!("invalid mode: {other} (expected classic or deep)"),
    };

    let model = args.model.clone().unwrap_or_else(EnvConfig::primary_model);
    let request = build_request(&args, mode, &model)?;

    let llm = LlmClient::new(
        ProviderRegistry {
            primary_base_url: EnvConfig::llm_base_url(),
            primary_api_key: EnvConfig::llm_api_key(),
            nanogpt_base_url: EnvConfig::nanogpt_base_url(),
            nanogpt_api_key: EnvConfig::nanogpt_api_key(),
        },
        EnvConfig::primary_model(),
        EnvConfig::fallback_model(),
    );

    let cache = Arc::new(Cache::new(CacheConfig::default()));
    let scrape = Arc::new(ScrapeClient::new(EnvConfig::render_base_url(), EnvConfig::render_api_key(), cache));
    let sitemap = SitemapResolver::default();
    let entities = EntityExtractor::new(
        llm.clone(),
        EntityConfig {
            max_chunk_size: EnvConfig::entity_max_chunk_size(),
            max_concurrent: EnvConfig::entity_max_concurrent(),
            passes: EnvConfig::entity_extraction_passes(),
        },
    );
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(HttpEmbeddingProvider::new(EnvConfig::llm_base_url(), EnvConfig::llm_api_key(), EnvConfig::embedding_model()));

    let orchestrator = Orchestrator::new(sitemap, scrape, entities, llm.clone(), embedder.clone(), None)
        .with_max_concurrent_subjobs(args.concurrency)
        .with_global_deadline(Duration::from_secs(args.deadline_secs));

    tracing::info!(mode = ?mode, query_len = request.query.len(), "starting research run");

    let mut outcome = orchestrator.run(request).await;

    while outcome.report.needs_clarification {
        if let Some(pending) = outcome.pending_clarification.take() {
            let question = outcome.report.clarification_question.clone().unwrap_or_default();
            let answer = prompt_clarification(&question)?;
            outcome = orchestrator.continue_clarification(pending, &answer).await;
        } else {
            break;
        }
    }

    print!("{}", output::render_report(&outcome.report, output_format)?);

    if let Some(question) = &args.question {
        let direct_fallback = direct_fallback_text(&outcome.report.sources_used);
        let answer = scout_orchestrator::answer_question(
            question,
            outcome.report_id,
            outcome.rag_index.as_ref(),
            Some(&embedder),
            direct_fallback.as_deref(),
            &llm,
            &model,
        )
        .await?;
        print!("{}", output::render_answer(&answer.answer, answer.method.as_str(), output_format)?);
    }

    std::process::exit(if outcome.report.success { 0 } else { 1 });
}

fn prompt_clarification(question: &str) -> Result<String> {
    eprintln!("\nThe deep research engine needs clarification:\n{question}\n");
    eprint!("> ");
    std::io::stderr().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(answer.trim().to_string())
}

fn direct_fallback_text(sources: &[scout_types::Source]) -> Option<String> {
    let joined: String = sources.iter().filter_map(|s| s.text.as_deref()).collect::<Vec<_>>().join("\n\n");
    (!joined.is_empty()).then_some(joined)
}

fn build_request(args: &Args, mode: Mode, model: &str) -> Result<ResearchRequest> {
    let mut documents = Vec::new();
    for path in &args.documents {
        let bytes = std::fs::read(path).map_err(|e| anyhow::anyhow!("reading document '{path}': {e}"))?;
        let name = std::path::Path::new(path).file_name().and_then(|n| n.to_str()).unwrap_or(path).to_string();
        documents.push(DocumentInput { name, bytes });
    }

    let deck = args.deck_url.clone().map(|url| DeckSpec {
        url,
        email: args.deck_email.clone().unwrap_or_default(),
        password: args.deck_password.clone(),
    });

    let crawl = args.crawl_url.clone().map(|start_url| scout_types::CrawlSpec {
        start_url,
        max_pages: args.crawl_max_pages,
        max_depth: args.crawl_max_depth,
    });

    let config = Config {
        model: model.to_string(),
        breadth: args.breadth,
        depth: args.depth,
        max_tool_calls: args.max_tool_calls,
        extract_entities: args.extract_entities,
        crawl_limit: args.crawl_limit,
    };

    let request = ResearchRequest {
        query: args.query.clone(),
        mode,
        documents,
        urls: args.urls.clone(),
        sitemap_root: args.sitemap_root.clone(),
        crawl,
        deck,
        config,
    };

    request.validate().map_err(|e| anyhow::anyhow!("invalid request: {e}"))?;
    Ok(request)
}
