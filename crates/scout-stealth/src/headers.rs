//! Header bundle synthesis (spec §4.1 steps 2-3).

use rand::seq::SliceRandom;
use rand::Rng;

use crate::user_agent::UserAgentPool;

/// One of the `Referer` choices a request can carry.
#[derive(Debug, Clone)]
pub enum Referer {
    Origin,
    SearchEngine(&'static str),
    OriginSitemap,
}

impl Referer {
    pub fn resolve(&self, origin: &str) -> String {
        match self {
            Referer::Origin => format!("{origin}/"),
            Referer::SearchEngine(host) => format!("https://{host}/"),
            Referer::OriginSitemap => format!("{origin}/sitemap"),
        }
    }
}

const SEARCH_ENGINES: [&str; 2] = ["www.google.com", "duckduckgo.com"];

/// A synthesized set of request headers: User-Agent, Referer, and either the
/// "standard" or "enhanced" accept/sec-fetch bundle.
#[derive(Debug, Clone)]
pub struct HeaderProfile {
    pub user_agent: String,
    pub referer: String,
    pub headers: Vec<(&'static str, String)>,
}

impl HeaderProfile {
    /// Build headers for one fetch attempt against `origin` (scheme://host).
    ///
    /// `enhanced` selects the richer sec-ch-ua / sec-fetch-* bundle and a
    /// randomized referer choice; otherwise a lighter standard set and the
    /// origin as referer (spec §4.1 steps 1-3).
    pub fn synthesize(origin: &str, enhanced: bool) -> Self {
        let user_agent = UserAgentPool::new().random().to_string();
        let mut rng = rand::thread_rng();

        let mut headers: Vec<(&'static str, String)> = vec![
            ("DNT", "1".to_string()),
            ("Connection", "keep-alive".to_string()),
        ];

        let referer = if enhanced {
            let choice = rng.gen_range(0..3);
            let referer = match choice {
                0 => Referer::Origin,
                1 => Referer::SearchEngine(SEARCH_ENGINES.choose(&mut rng).copied().unwrap()),
                _ => Referer::OriginSitemap,
            };
            headers.extend(Self::enhanced_bundle(&mut rng));
            referer.resolve(origin)
        } else {
            headers.extend(Self::standard_bundle());
            Referer::Origin.resolve(origin)
        };

        Self {
            user_agent,
            referer,
            headers,
        }
    }

    fn standard_bundle() -> Vec<(&'static str, String)> {
        vec![
            (
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8".to_string(),
            ),
            ("Accept-Language", "en-US,en;q=0.9".to_string()),
            ("Accept-Encoding", "gzip, deflate, br".to_string()),
            ("Sec-Fetch-Dest", "document".to_string()),
            ("Sec-Fetch-Mode", "navigate".to_string()),
            ("Sec-Fetch-Site", "none".to_string()),
            ("Sec-Fetch-User", "?1".to_string()),
            ("Cache-Control", "max-age=0".to_string()),
        ]
    }

    /// One of two enhanced bundles, selected uniformly at random, matching
    /// the two the original bot-protection helper carried.
    fn enhanced_bundle(rng: &mut impl Rng) -> Vec<(&'static str, String)> {
        let bundles: [Vec<(&'static str, String)>; 2] = [
            vec![
                (
                    "Accept",
                    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7".to_string(),
                ),
                ("Accept-Language", "en-US,en;q=0.9".to_string()),
                ("Accept-Encoding", "gzip, deflate, br".to_string()),
                ("Cache-Control", "max-age=0".to_string()),
                (
                    "Sec-Ch-Ua",
                    "\"Not_A Brand\";v=\"8\", \"Chromium\";v=\"120\", \"Google Chrome\";v=\"120\"".to_string(),
                ),
                ("Sec-Ch-Ua-Mobile", "?0".to_string()),
                ("Sec-Ch-Ua-Platform", "\"Windows\"".to_string()),
                ("Sec-Fetch-Dest", "document".to_string()),
                ("Sec-Fetch-Mode", "navigate".to_string()),
                ("Sec-Fetch-Site", "none".to_string()),
                ("Sec-Fetch-User", "?1".to_string()),
                ("Upgrade-Insecure-Requests", "1".to_string()),
            ],
            vec![
                (
                    "Accept",
                    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8".to_string(),
                ),
                ("Accept-Language", "en-US,en;q=0.5".to_string()),
                ("Accept-Encoding", "gzip, deflate, br".to_string()),
                ("Cache-Control", "no-cache".to_string()),
                ("Pragma", "no-cache".to_string()),
                ("Sec-Fetch-Dest", "document".to_string()),
                ("Sec-Fetch-Mode", "navigate".to_string()),
                ("Sec-Fetch-Site", "none".to_string()),
                ("Sec-Fetch-User", "?1".to_string()),
                ("Upgrade-Insecure-Requests", "1".to_string()),
            ],
        ];
        bundles.choose(rng).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_profile_uses_origin_referer() {
        let profile = HeaderProfile::synthesize("https://acme.example", false);
        assert_eq!(profile.referer, "https://acme.example/");
        assert!(profile.headers.iter().any(|(k, _)| *k == "Accept"));
    }

    #[test]
    fn enhanced_profile_has_sec_fetch_headers() {
        let profile = HeaderProfile::synthesize("https://acme.example", true);
        assert!(profile.headers.iter().any(|(k, _)| k.starts_with("Sec-Fetch")));
    }
}
