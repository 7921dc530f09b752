//! # Scout Scrape
//!
//! Converts a URL to normalized `{content, html, metadata}` via a remote
//! render service, transparently handling its synchronous and asynchronous
//! job shapes (spec §4.3, C3).
//!
//! Grounded on `FirecrawlClient` (`src/firecrawl_client.py`): base-URL
//! sanitization, the `/v1/scrape` + `/v1/map` wire shapes, and the
//! exponential-backoff polling loop are carried over; Redis-backed caching
//! is replaced with the in-process [`scout_cache::Cache`] shared with the
//! Fetcher, following `riptide-cache::integrated`'s validate-on-read model.

mod content;
mod error;

pub use content::ScrapedContent;

use chrono::Utc;
use scout_cache::{scrape_payload_schema, Cache};
use scout_types::PipelineError;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

const SCRAPE_TIMEOUT: Duration = Duration::from_secs(30);
const POLL_INITIAL_DELAY: Duration = Duration::from_millis(1000);
const POLL_BACKOFF_FACTOR: f64 = 1.5;
const POLL_DELAY_CAP: Duration = Duration::from_secs(10);
const POLL_MAX_ATTEMPTS: u32 = 10;
const POLL_TOTAL_DEADLINE: Duration = Duration::from_secs(60);

const TRAILING_PATHS_TO_STRIP: [&str; 5] = ["/v1/scrape", "/v0/scrape", "/scrape", "/api/v1/scrape", "/api/v0/scrape"];

#[derive(Debug, Clone)]
pub struct ScrapeClient {
    base_url: String,
    api_key: Option<String>,
    http: reqwest::Client,
    cache: Arc<Cache>,
}

impl ScrapeClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, cache: Arc<Cache>) -> Self {
        Self {
            base_url: sanitize_base_url(&base_url.into()),
            api_key,
            http: reqwest::Client::new(),
            cache,
        }
    }

    /// `scrape(url, force_refresh)` (spec §4.3).
    #[instrument(skip(self), fields(url))]
    pub async fn scrape(&self, url: &str, force_refresh: bool) -> Result<ScrapedContent, PipelineError> {
        validate_url(url)?;

        let cache_key = Cache::key("scrape", url);
        if !force_refresh {
            if let Some(payload) = self.cache.get(&cache_key, &scrape_payload_schema) {
                if let Some(content) = ScrapedContent::from_cache_payload(&payload) {
                    debug!(url, "scrape cache hit");
                    return Ok(content);
                }
            }
        }

        let result = self.scrape_uncached(url).await;
        let payload = match &result {
            Ok(content) => content.to_cache_payload(),
            Err(e) => error_cache_payload(url, e),
        };
        self.cache.set(&cache_key, payload, None);
        result
    }

    async fn scrape_uncached(&self, url: &str) -> Result<ScrapedContent, PipelineError> {
        let endpoint = format!("{}/v1/scrape", self.base_url);
        let body = json!({"url": url, "formats": ["markdown", "html"]});

        let mut builder = self.http.post(&endpoint).json(&body).timeout(SCRAPE_TIMEOUT);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                error::render_timeout()
            } else {
                error::transport(e)
            }
        })?;

        let status = response.status().as_u16();
        if status != 200 {
            let text = response.text().await.unwrap_or_default();
            return Err(error::render_http_error(status, &text));
        }

        let initial: Value = response
            .json()
            .await
            .map_err(|e| error::invalid_response_shape(e))?;

        self.resolve(url, &initial).await
    }

    async fn resolve(&self, url: &str, initial: &Value) -> Result<ScrapedContent, PipelineError> {
        if let Some(data) = initial.get("data").and_then(Value::as_object) {
            if let Some(markdown) = data.get("markdown").and_then(Value::as_str) {
                let html = data.get("html").and_then(Value::as_str).map(str::to_string);
                let metadata = data
                    .get("metadata")
                    .or_else(|| initial.get("metadata"))
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_default();
                return Ok(self.finalize(url, markdown.to_string(), html, metadata));
            }
        }

        let is_async = initial.get("success").and_then(Value::as_bool).unwrap_or(false)
            && initial.get("id").is_some()
            && initial.get("url").and_then(Value::as_str).is_some();

        if is_async {
            let poll_url = initial["url"].as_str().unwrap().to_string();
            let (markdown, html) = self.poll_for_markdown(&poll_url).await?;
            let metadata = initial
                .get("metadata")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();
            return Ok(self.finalize(url, markdown, html, metadata));
        }

        Err(error::invalid_response_shape("response had neither sync data.markdown nor async job fields"))
    }

    fn finalize(
        &self,
        url: &str,
        content: String,
        html: Option<String>,
        mut metadata: serde_json::Map<String, Value>,
    ) -> ScrapedContent {
        metadata.insert("scraped_at".to_string(), json!(Utc::now().to_rfc3339()));
        metadata.insert("url".to_string(), json!(url));
        ScrapedContent {
            content,
            html,
            metadata: metadata.into_iter().collect(),
        }
    }

    async fn poll_for_markdown(&self, status_url: &str) -> Result<(String, Option<String>), PipelineError> {
        let deadline = tokio::time::Instant::now() + POLL_TOTAL_DEADLINE;
        let mut delay = POLL_INITIAL_DELAY;

        for attempt in 0..POLL_MAX_ATTEMPTS {
            if tokio::time::Instant::now() >= deadline {
                return Err(error::poll_timeout());
            }
            tokio::time::sleep(delay).await;

            let mut builder = self.http.get(status_url).timeout(Duration::from_secs(15));
            if let Some(key) = &self.api_key {
                builder = builder.bearer_auth(key);
            }

            match builder.send().await {
                Ok(response) if response.status().is_success() => {
                    let parsed: Value = match response.json().await {
                        Ok(v) => v,
                        Err(e) => {
                            warn!(status_url, attempt, error = %e, "poll response not JSON, retrying");
                            delay = cap_delay(delay);
                            continue;
                        }
                    };

                    if let Some(data) = parsed.get("data").and_then(Value::as_object) {
                        if let Some(markdown) = data.get("markdown").and_then(Value::as_str) {
                            let html = data.get("html").and_then(Value::as_str).map(str::to_string);
                            return Ok((markdown.to_string(), html));
                        }
                    }

                    let status_field = parsed.get("status").and_then(Value::as_str).unwrap_or("").to_lowercase();
                    match status_field.as_str() {
                        "completed" => return Err(error::poll_failed("job completed but markdown content missing")),
                        "failed" => return Err(error::poll_failed("render job reported failed status")),
                        _ => {}
                    }
                }
                Ok(response) => {
                    warn!(status_url, attempt, status = response.status().as_u16(), "poll returned non-2xx, retrying");
                }
                Err(e) => {
                    warn!(status_url, attempt, error = %e, "poll request failed, retrying");
                }
            }

            delay = cap_delay(delay);
        }

        Err(error::poll_timeout())
    }

    /// `POST {base}/v1/map` URL discovery (spec "Wire — Render service").
    pub async fn map_url(
        &self,
        url: &str,
        search: Option<&str>,
        ignore_sitemap: bool,
        include_subdomains: bool,
        limit: u32,
    ) -> Result<Vec<String>, PipelineError> {
        validate_url(url)?;
        let endpoint = format!("{}/v1/map", self.base_url);
        let mut body = json!({
            "url": url,
            "limit": limit,
            "ignoreSitemap": ignore_sitemap,
            "includeSubdomains": include_subdomains,
        });
        if let Some(s) = search {
            body["search"] = json!(s);
        }

        let mut builder = self.http.post(&endpoint).json(&body).timeout(SCRAPE_TIMEOUT);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(error::transport)?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(error::render_http_error(status, &text));
        }

        let parsed: Value = response.json().await.map_err(error::invalid_response_shape)?;
        let links = parsed
            .get("links")
            .and_then(Value::as_array)
            .ok_or_else(|| error::invalid_response_shape("map response missing links array"))?;

        Ok(links.iter().filter_map(Value::as_str).map(str::to_string).collect())
    }
}

fn cap_delay(delay: Duration) -> Duration {
    let scaled = delay.mul_f64(POLL_BACKOFF_FACTOR);
    scaled.min(POLL_DELAY_CAP)
}

fn validate_url(url: &str) -> Result<(), PipelineError> {
    let parsed = Url::parse(url).map_err(|_| error::invalid_url(url))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(error::invalid_url(url));
    }
    if parsed.host_str().is_none() {
        return Err(error::invalid_url(url));
    }
    Ok(())
}

fn sanitize_base_url(raw: &str) -> String {
    let mut cleaned = raw.to_string();
    for suffix in TRAILING_PATHS_TO_STRIP {
        if let Some(stripped) = cleaned.strip_suffix(suffix) {
            cleaned = stripped.to_string();
            break;
        }
    }
    cleaned.trim_end_matches('/').to_string()
}

fn error_cache_payload(url: &str, error: &PipelineError) -> Value {
    json!({
        "data": {"content": "", "html_content": Value::Null},
        "error": error.message,
        "metadata": {"url": url, "scraped_at": Utc::now().to_rfc3339()},
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_cache::CacheConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base_url: String) -> ScrapeClient {
        ScrapeClient::new(base_url, None, Arc::new(Cache::new(CacheConfig::default())))
    }

    #[test]
    fn sanitizes_trailing_scrape_path() {
        assert_eq!(sanitize_base_url("http://localhost:3002/v1/scrape"), "http://localhost:3002");
        assert_eq!(sanitize_base_url("http://localhost:3002/"), "http://localhost:3002");
    }

    #[tokio::test]
    async fn invalid_url_rejected_without_network() {
        let c = client("http://localhost:1".to_string());
        let err = c.scrape("not-a-url", false).await.unwrap_err();
        assert_eq!(err.kind, scout_types::ErrorKind::InvalidUrl);
    }

    #[tokio::test]
    async fn synchronous_response_returns_content_directly() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/scrape"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"markdown": "hello world", "html": "<p>hello</p>"},
                "metadata": {"title": "Acme"}
            })))
            .mount(&server)
            .await;

        let c = client(server.uri());
        let result = c.scrape("https://acme.example", true).await.unwrap();
        assert_eq!(result.content, "hello world");
        assert_eq!(result.html.as_deref(), Some("<p>hello</p>"));
    }

    #[tokio::test]
    async fn async_job_polls_until_markdown_appears() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/scrape"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true, "id": "job-1", "url": format!("{}/p/job-1", server.uri()), "metadata": {}
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/p/job-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "pending"})))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/p/job-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"markdown": "async hello"}})))
            .mount(&server)
            .await;

        let c = client(server.uri());
        let result = c.scrape("https://acme.example", true).await.unwrap();
        assert_eq!(result.content, "async hello");
    }

    #[tokio::test]
    async fn render_http_error_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/scrape"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let c = client(server.uri());
        let err = c.scrape("https://acme.example", true).await.unwrap_err();
        assert_eq!(err.kind, scout_types::ErrorKind::RenderHttpError("500".to_string()));
    }

    #[tokio::test]
    async fn cache_hit_avoids_network() {
        let cache = Arc::new(Cache::new(CacheConfig::default()));
        let c = ScrapeClient::new("http://localhost:1".to_string(), None, cache.clone());
        let key = Cache::key("scrape", "https://acme.example");
        cache.set(
            &key,
            json!({"data": {"content": "cached", "html_content": Value::Null}, "metadata": {}}),
            None,
        );
        let result = c.scrape("https://acme.example", false).await.unwrap();
        assert_eq!(result.content, "cached");
    }
}
