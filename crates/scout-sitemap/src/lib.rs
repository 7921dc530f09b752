//! # Scout Sitemap
//!
//! Sitemap discovery: robots.txt `Sitemap:` directives, well-known and
//! secondary path probing, and breadth-first resolution of `sitemapindex`
//! trees down to a flat, deduplicated list of page URLs (spec §4.2, C2).
//!
//! Grounded on `riptide-spider::sitemap`'s index-vs-urlset dispatch and the
//! original `scanner_utils.py`'s `discover_sitemap_urls` BFS facade, whose
//! probe-path tables and decompression fallback order are carried here
//! (see [`paths`] and [`decompress`]).

mod decompress;
mod error;
mod paths;
mod xml;

pub use error::{SitemapError, SitemapErrorKind};

use scout_fetch::{FetchPolicy, Fetcher};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

/// Sitemaps beyond this count are not processed, regardless of how many are
/// still queued (spec §8 testable property 1: adversarial cyclic indexes
/// must terminate).
const MAX_PROCESSED_SITEMAPS: usize = 50;

/// Sitemap index nesting deeper than this is not followed.
const MAX_DEPTH: u32 = 5;

/// Deadline for a single sitemap body fetch, independent of the Fetcher's
/// own per-attempt timeout (spec §4.2).
const SITEMAP_FETCH_TIMEOUT: Duration = Duration::from_secs(25);

#[derive(Debug, Clone)]
pub struct SitemapResolver {
    fetcher: Fetcher,
}

impl Default for SitemapResolver {
    fn default() -> Self {
        Self::new(Fetcher::new())
    }
}

impl SitemapResolver {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }

    /// Discover all page URLs reachable from `target_domain`'s sitemap(s),
    /// filtered to the same registrable authority. `target_domain` may be a
    /// bare host (`acme.example`) or a full URL; a bare host is tried over
    /// HTTPS first, falling back to HTTP.
    #[instrument(skip(self), fields(target_domain))]
    pub async fn discover_sitemap_urls(
        &self,
        target_domain: &str,
    ) -> Result<Vec<String>, SitemapError> {
        let (base, authority) = normalize_base(target_domain)?;

        let mut seeds = self.robots_txt_sitemaps(&base).await;
        if seeds.is_empty() {
            seeds = self.probe_paths(&base, &paths::WELL_KNOWN_PATHS).await;
        }
        if seeds.is_empty() {
            seeds = self.probe_paths(&base, &paths::SECONDARY_PATHS).await;
        }
        if seeds.is_empty() {
            debug!(target_domain, "no sitemap discovered via robots.txt or probing");
            return Ok(Vec::new());
        }

        let pages = self.bfs(seeds, &authority).await;
        let mut pages: Vec<String> = pages.into_iter().collect();
        pages.sort();
        Ok(pages)
    }

    async fn robots_txt_sitemaps(&self, base: &str) -> Vec<String> {
        let url = format!("{base}/robots.txt");
        match self.fetcher.fetch(&url, FetchPolicy::new((0.5, 1.5), 1, false)).await {
            Ok(resp) if resp.status == 200 => resp
                .body
                .lines()
                .filter_map(|line| {
                    let trimmed = line.trim();
                    let lower = trimmed.to_lowercase();
                    lower
                        .starts_with("sitemap:")
                        .then(|| trimmed["sitemap:".len()..].trim().to_string())
                })
                .filter(|s| !s.is_empty())
                .collect(),
            Ok(_) => Vec::new(),
            Err(e) => {
                debug!(url, error = %e, "robots.txt fetch failed");
                Vec::new()
            }
        }
    }

    async fn probe_paths(&self, base: &str, candidates: &[&str]) -> Vec<String> {
        for candidate in candidates {
            let url = format!("{base}{candidate}");
            match self.fetcher.fetch(&url, FetchPolicy::new((0.2, 0.8), 0, false)).await {
                Ok(resp) if resp.status == 200 && !resp.bytes.is_empty() => {
                    return vec![url];
                }
                Ok(_) => continue,
                Err(_) => continue,
            }
        }
        Vec::new()
    }

    async fn bfs(&self, seeds: Vec<String>, target_authority: &str) -> HashSet<String> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut pages: HashSet<String> = HashSet::new();
        let mut queue: Vec<(String, u32)> = seeds.into_iter().map(|s| (s, 0)).collect();
        let mut processed = 0usize;

        while let Some((sitemap_url, depth)) = queue.pop() {
            if processed >= MAX_PROCESSED_SITEMAPS || depth > MAX_DEPTH {
                continue;
            }
            if !visited.insert(sitemap_url.clone()) {
                continue;
            }
            processed += 1;

            let body = match self.fetch_sitemap_body(&sitemap_url).await {
                Some(b) => b,
                None => continue,
            };

            let parsed = xml::parse_sitemap_xml(&body);

            for loc in parsed.page_urls {
                if let Some(resolved) = resolve_against(&sitemap_url, &loc) {
                    if same_authority(&resolved, target_authority) {
                        pages.insert(resolved);
                    }
                }
            }

            for loc in parsed.child_sitemaps {
                if let Some(resolved) = resolve_against(&sitemap_url, &loc) {
                    if same_authority(&resolved, target_authority) && !visited.contains(&resolved) {
                        queue.push((resolved, depth + 1));
                    }
                }
            }
        }

        pages
    }

    async fn fetch_sitemap_body(&self, url: &str) -> Option<String> {
        let fetch = self.fetcher.fetch(url, FetchPolicy::new((0.2, 0.8), 1, false));
        let response = match tokio::time::timeout(SITEMAP_FETCH_TIMEOUT, fetch).await {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) => {
                warn!(url, error = %e, "sitemap fetch failed");
                return None;
            }
            Err(_) => {
                warn!(url, "sitemap fetch exceeded deadline");
                return None;
            }
        };
        if response.status != 200 {
            return None;
        }
        if decompress::looks_like_xml(&response.body) {
            return Some(response.body);
        }
        if decompress::looks_binary(&response.body) {
            return decompress::decompress_fallback(&response.bytes);
        }
        None
    }
}

fn normalize_base(target_domain: &str) -> Result<(String, String), SitemapError> {
    if target_domain.starts_with("http://") || target_domain.starts_with("https://") {
        let parsed = Url::parse(target_domain).map_err(|_| SitemapError::invalid_url(target_domain))?;
        let authority = parsed.host_str().ok_or_else(|| SitemapError::invalid_url(target_domain))?.to_string();
        let base = format!("{}://{}", parsed.scheme(), parsed.authority());
        return Ok((base, authority));
    }
    if target_domain.trim().is_empty() {
        return Err(SitemapError::invalid_url(target_domain));
    }
    Ok((format!("https://{target_domain}"), target_domain.to_string()))
}

fn resolve_against(base_url: &str, loc: &str) -> Option<String> {
    let base = Url::parse(base_url).ok()?;
    base.join(loc).ok().map(|u| u.to_string())
}

fn same_authority(url: &str, target_authority: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
        .map(|host| host.eq_ignore_ascii_case(target_authority) || host.ends_with(&format!(".{target_authority}")))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn authority_of(server: &MockServer) -> String {
        Url::parse(&server.uri()).unwrap().host_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn discovers_via_robots_txt_and_filters_off_domain_urls() {
        let server = MockServer::start().await;
        let sitemap_url = format!("{}/sitemap.xml", server.uri());
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!("Sitemap: {sitemap_url}\n")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                r#"<?xml version="1.0"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
                    <url><loc>{}/a</loc></url>
                    <url><loc>https://off-domain.example/b</loc></url>
                </urlset>"#,
                server.uri()
            )))
            .mount(&server)
            .await;

        let resolver = SitemapResolver::new(Fetcher::new());
        let authority = authority_of(&server);
        let target = format!("{}:{}", authority, server.address().port());
        let urls = resolver.discover_sitemap_urls(&format!("http://{target}")).await.unwrap();
        assert_eq!(urls, vec![format!("{}/a", server.uri())]);
    }

    #[tokio::test]
    async fn cyclic_sitemap_index_terminates() {
        let server = MockServer::start().await;
        let index_body = format!(
            r#"<?xml version="1.0"?><sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
                <sitemap><loc>{}/sitemap.xml</loc></sitemap>
            </sitemapindex>"#,
            server.uri()
        );
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(index_body))
            .mount(&server)
            .await;

        let resolver = SitemapResolver::new(Fetcher::new());
        let authority = authority_of(&server);
        let target = format!("{}:{}", authority, server.address().port());
        let urls = tokio::time::timeout(
            Duration::from_secs(10),
            resolver.discover_sitemap_urls(&format!("http://{target}")),
        )
        .await
        .expect("must terminate")
        .unwrap();
        assert!(urls.is_empty());
    }

    #[tokio::test]
    async fn well_known_probe_used_when_robots_has_no_sitemap() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        for p in paths::WELL_KNOWN_PATHS {
            if p == "/sitemap.xml" {
                continue;
            }
            Mock::given(method("GET"))
                .and(path(p))
                .respond_with(ResponseTemplate::new(404))
                .mount(&server)
                .await;
        }
        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                r#"<?xml version="1.0"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
                    <url><loc>{}/a</loc></url>
                </urlset>"#,
                server.uri()
            )))
            .mount(&server)
            .await;

        let resolver = SitemapResolver::new(Fetcher::new());
        let authority = authority_of(&server);
        let target = format!("{}:{}", authority, server.address().port());
        let urls = resolver.discover_sitemap_urls(&format!("http://{target}")).await.unwrap();
        assert_eq!(urls, vec![format!("{}/a", server.uri())]);
    }
}
