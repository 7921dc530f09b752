//! # Scout Fetch
//!
//! Single-URL HTTP GET with rotating headers, referer spoofing, randomized
//! jitter, retry with exponential backoff, and bot-challenge detection
//! (spec §4.1, C1).
//!
//! Grounded on `riptide-fetch::fetch::ReliableHttpClient`'s retry-loop shape;
//! header synthesis and challenge tokens come from `scout-stealth`, whose
//! constants are carried verbatim from the original `scanner_utils.py`
//! bot-protection helper.

mod error;
mod policy;
mod response;

pub use error::{FetchError, FetchErrorKind};
pub use policy::FetchPolicy;
pub use response::HttpResponse;

use rand::Rng;
use reqwest::Client;
use scout_stealth::{is_challenge_body, ChallengingDomains, HeaderProfile};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

/// Statuses returned to the caller immediately without further retry
/// (spec §4.1, "Terminal classification").
const IMMEDIATE_STATUSES: [u16; 6] = [200, 404, 301, 302, 307, 308];

/// Fetches single URLs with stealth headers, jitter, and challenge-aware
/// retry. Stateless apart from the underlying `reqwest::Client` and the
/// configured set of challenging domains (shared, read-only).
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    challenging_domains: ChallengingDomains,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            challenging_domains: ChallengingDomains::default(),
        }
    }

    pub fn with_challenging_domains(mut self, domains: ChallengingDomains) -> Self {
        self.challenging_domains = domains;
        self
    }

    /// Fetch `url` under `policy`. See spec §4.1 for the full state machine.
    #[instrument(skip(self, policy), fields(url = %url))]
    pub async fn fetch(&self, url: &str, policy: FetchPolicy) -> Result<HttpResponse, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::invalid_url(e.to_string()))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(FetchError::invalid_url(format!(
                "unsupported scheme: {}",
                parsed.scheme()
            )));
        }
        let origin = format!("{}://{}", parsed.scheme(), parsed.authority());

        let mut policy = policy;
        if self.challenging_domains.matches(url) {
            debug!(url = %url, "challenging domain detected, forcing enhanced mode");
            policy.enhanced = true;
            policy.retry_count = policy.retry_count.max(4);
        }

        let mut last_response: Option<HttpResponse> = None;
        let mut last_was_challenge = false;
        let mut last_transport_error: Option<String> = None;

        for attempt in 0..=policy.retry_count {
            let sleep_secs = Self::attempt_delay(&policy, attempt, last_was_challenge);
            tokio::time::sleep(Duration::from_secs_f64(sleep_secs)).await;

            let profile = HeaderProfile::synthesize(&origin, policy.enhanced);

            if policy.enhanced && attempt == 0 {
                self.warm_up(url, &profile).await;
            }

            match self.attempt(url, &profile).await {
                Ok(response) => {
                    last_was_challenge = response.status == 403 && is_challenge_body(&response.body);

                    if IMMEDIATE_STATUSES.contains(&response.status) {
                        return Ok(response);
                    }

                    if last_was_challenge {
                        warn!(url = %url, attempt, "bot-challenge detected");
                        if attempt == policy.retry_count {
                            return Err(FetchError::challenge_exhausted(response.status));
                        }
                        last_response = Some(response);
                        continue;
                    }

                    // Other non-terminal status: retry if attempts remain,
                    // else return the last response as-is.
                    if attempt == policy.retry_count {
                        return Ok(response);
                    }
                    last_response = Some(response);
                }
                Err(e) => {
                    last_transport_error = Some(e.to_string());
                    if attempt == policy.retry_count {
                        return Err(FetchError::transport(e.to_string()));
                    }
                }
            }
        }

        // Unreachable in practice: the loop always returns on the final
        // attempt. Kept as a defensive fallback mirroring "return as-is".
        if let Some(resp) = last_response {
            return Ok(resp);
        }
        Err(FetchError::transport(
            last_transport_error.unwrap_or_else(|| "exhausted retries".to_string()),
        ))
    }

    async fn warm_up(&self, url: &str, profile: &HeaderProfile) {
        let mut builder = self
            .client
            .head(url)
            .header("User-Agent", &profile.user_agent)
            .timeout(Duration::from_secs(10));
        for (k, v) in &profile.headers {
            builder = builder.header(*k, v);
        }
        if builder.send().await.is_err() {
            debug!(url, "HEAD warm-up failed, ignoring");
        }
    }

    async fn attempt(
        &self,
        url: &str,
        profile: &HeaderProfile,
    ) -> Result<HttpResponse, reqwest::Error> {
        let mut builder = self
            .client
            .get(url)
            .header("User-Agent", &profile.user_agent)
            .header("Referer", &profile.referer)
            .timeout(Duration::from_secs(15));
        for (k, v) in &profile.headers {
            builder = builder.header(*k, v);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
            .collect();
        let bytes = response.bytes().await?.to_vec();
        let body = String::from_utf8_lossy(&bytes).into_owned();

        Ok(HttpResponse {
            status,
            headers,
            body,
            bytes,
            url: url.to_string(),
        })
    }

    /// Spec §4.1 "Jitter": base delay before each attempt, or the enhanced
    /// retry backoff for retries in enhanced mode, or the challenge-specific
    /// backoff if the previous attempt was classified as a bot-challenge.
    fn attempt_delay(policy: &FetchPolicy, attempt: u32, last_was_challenge: bool) -> f64 {
        let mut rng = rand::thread_rng();
        if last_was_challenge {
            rng.gen_range(5.0..12.0) * 2f64.powi(attempt as i32) + rng.gen_range(0.0..3.0)
        } else if policy.enhanced && attempt > 0 {
            rng.gen_range(3.0..8.0) * 1.5f64.powi(attempt as i32)
        } else {
            rng.gen_range(policy.delay_range.0..=policy.delay_range.1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn terminal_status_returned_immediately() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new();
        let url = format!("{}/ok", server.uri());
        let resp = fetcher
            .fetch(&url, FetchPolicy::new((0.0, 0.0), 2, false))
            .await
            .unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, "hello");
    }

    #[tokio::test]
    async fn challenge_body_triggers_retry_then_exhausts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/blocked"))
            .respond_with(
                ResponseTemplate::new(403).set_body_string("Just a Moment... checking your browser"),
            )
            .mount(&server)
            .await;

        let fetcher = Fetcher::new();
        let url = format!("{}/blocked", server.uri());
        let err = fetcher
            .fetch(&url, FetchPolicy::new((0.0, 0.0), 1, false))
            .await
            .unwrap_err();
        assert_eq!(err.kind, FetchErrorKind::ChallengeExhausted);
    }

    #[tokio::test]
    async fn invalid_url_rejected_without_network() {
        let fetcher = Fetcher::new();
        let err = fetcher
            .fetch("not-a-url", FetchPolicy::new((0.0, 0.0), 0, false))
            .await
            .unwrap_err();
        assert_eq!(err.kind, FetchErrorKind::InvalidUrl);
    }

    #[tokio::test]
    async fn other_status_returned_as_is_after_exhaustion() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/teapot"))
            .respond_with(ResponseTemplate::new(418))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new();
        let url = format!("{}/teapot", server.uri());
        let resp = fetcher
            .fetch(&url, FetchPolicy::new((0.0, 0.0), 1, false))
            .await
            .unwrap();
        assert_eq!(resp.status, 418);
    }
}
