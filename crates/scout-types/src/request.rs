//! `ResearchRequest` — the immutable record of inputs to a pipeline run
//! (spec §3, §6).

use serde::{Deserialize, Serialize};

use crate::config::{Config, Mode};
use crate::errors::ErrorKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInput {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlSpec {
    pub start_url: String,
    pub max_pages: u32,
    pub max_depth: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckSpec {
    pub url: String,
    pub email: String,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchRequest {
    #[serde(default)]
    pub query: String,
    pub mode: Mode,
    #[serde(default)]
    pub documents: Vec<DocumentInput>,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default)]
    pub sitemap_root: Option<String>,
    #[serde(default)]
    pub crawl: Option<CrawlSpec>,
    #[serde(default)]
    pub deck: Option<DeckSpec>,
    pub config: Config,
}

impl ResearchRequest {
    /// Spec §3 invariant: in `deep` mode `query` is non-empty; in `classic`
    /// mode at least one Source OR a non-empty query.
    pub fn validate(&self) -> Result<(), ErrorKind> {
        self.config.validate()?;
        match self.mode {
            Mode::Deep => {
                if self.query.trim().is_empty() {
                    return Err(ErrorKind::DeepRequiresQuery);
                }
            }
            Mode::Classic => {
                let has_sources = !self.documents.is_empty()
                    || !self.urls.is_empty()
                    || self.sitemap_root.is_some()
                    || self.crawl.is_some()
                    || self.deck.is_some();
                if self.query.trim().is_empty() && !has_sources {
                    return Err(ErrorKind::EmptyRequest);
                }
            }
        }
        Ok(())
    }

    pub fn is_empty_of_sources(&self) -> bool {
        self.documents.is_empty()
            && self.urls.is_empty()
            && self.sitemap_root.is_none()
            && self.crawl.is_none()
            && self.deck.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request(mode: Mode) -> ResearchRequest {
        ResearchRequest {
            query: String::new(),
            mode,
            documents: Vec::new(),
            urls: Vec::new(),
            sitemap_root: None,
            crawl: None,
            deck: None,
            config: Config::default(),
        }
    }

    #[test]
    fn deep_mode_with_empty_query_rejected() {
        let req = base_request(Mode::Deep);
        assert_eq!(req.validate(), Err(ErrorKind::DeepRequiresQuery));
    }

    #[test]
    fn classic_mode_all_empty_rejected() {
        let req = base_request(Mode::Classic);
        assert_eq!(req.validate(), Err(ErrorKind::EmptyRequest));
    }

    #[test]
    fn classic_mode_query_only_accepted() {
        let mut req = base_request(Mode::Classic);
        req.query = "evaluate acme".into();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn classic_mode_sources_only_accepted() {
        let mut req = base_request(Mode::Classic);
        req.urls.push("https://acme.example".into());
        assert!(req.validate().is_ok());
    }
}
