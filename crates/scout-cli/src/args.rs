//! Command-line argument shape (spec §3, §6): a single research request
//! plus the runtime knobs that aren't part of `Config` itself.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "scout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Due-diligence research pipeline: ingest documents, web pages, and decks into a synthesized report")]
pub struct Args {
    /// Research question. Required in deep mode; optional in classic mode
    /// if at least one source is supplied.
    #[arg(long, default_value = "")]
    pub query: String,

    /// classic | deep
    #[arg(long, default_value = "classic")]
    pub mode: String,

    /// A URL to scrape. May be repeated.
    #[arg(long = "url")]
    pub urls: Vec<String>,

    /// A local file to ingest as a document source. May be repeated.
    #[arg(long = "document")]
    pub documents: Vec<String>,

    /// A domain or URL whose sitemap(s) should be discovered and scraped.
    #[arg(long)]
    pub sitemap_root: Option<String>,

    /// Seed URL for map-based crawl discovery.
    #[arg(long)]
    pub crawl_url: Option<String>,

    #[arg(long, default_value = "20")]
    pub crawl_max_pages: u32,

    #[arg(long, default_value = "2")]
    pub crawl_max_depth: u32,

    /// DocSend-style deck URL.
    #[arg(long)]
    pub deck_url: Option<String>,

    #[arg(long, env = "DECK_EMAIL")]
    pub deck_email: Option<String>,

    #[arg(long, env = "DECK_PASSWORD")]
    pub deck_password: Option<String>,

    /// Run the bounded entity extraction pass over every ingested source.
    #[arg(long)]
    pub extract_entities: bool,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long, default_value = "4")]
    pub breadth: u32,

    #[arg(long, default_value = "2")]
    pub depth: u32,

    #[arg(long, default_value = "4")]
    pub max_tool_calls: u32,

    #[arg(long, default_value = "20")]
    pub crawl_limit: u32,

    /// Max sub-jobs ingested concurrently.
    #[arg(long, default_value = "8")]
    pub concurrency: usize,

    /// Global pipeline deadline in seconds.
    #[arg(long, default_value = "600")]
    pub deadline_secs: u64,

    /// A follow-up question answered against the freshly built report's
    /// RAG index once synthesis completes (spec §4.11, C11).
    #[arg(long)]
    pub question: Option<String>,

    /// json | text
    #[arg(long, short = 'o', default_value = "text")]
    pub output: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_match_classic_offline_run() {
        let args = Args::parse_from(["scout", "--query", "Evaluate Acme"]);
        assert_eq!(args.mode, "classic");
        assert_eq!(args.output, "text");
        assert_eq!(args.concurrency, 8);
        assert_eq!(args.deadline_secs, 600);
        assert!(args.urls.is_empty());
    }

    #[test]
    fn repeated_url_flags_accumulate() {
        let args = Args::parse_from(["scout", "--url", "https://a.example", "--url", "https://b.example"]);
        assert_eq!(args.urls, vec!["https://a.example", "https://b.example"]);
    }
}
