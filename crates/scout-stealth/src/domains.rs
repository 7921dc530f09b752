//! "Challenging domain" heuristic (§4.1).
//!
//! The list partially overlaps with generic CDN hosts, so it is treated as a
//! tunable set passed in by configuration rather than hard-coded, favoring
//! configurability over a fixed table.

#[derive(Debug, Clone)]
pub struct ChallengingDomains {
    domains: Vec<String>,
}

impl Default for ChallengingDomains {
    /// The same four example domains the original bot-protection helper used.
    fn default() -> Self {
        Self::new(["rollbit.com", "cloudflare.com", "ddos-guard.net", "github.com"])
    }
}

impl ChallengingDomains {
    pub fn new(domains: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            domains: domains.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(&self, url_or_host: &str) -> bool {
        let lower = url_or_host.to_lowercase();
        self.domains.iter().any(|d| lower.contains(d.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_known_domain() {
        let domains = ChallengingDomains::default();
        assert!(domains.matches("https://github.com/foo/bar"));
        assert!(!domains.matches("https://example.com"));
    }
}
