//! Error type for sitemap discovery (spec §7).

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitemapErrorKind {
    InvalidUrl,
    Transport,
    Timeout,
}

#[derive(Debug, Error, Clone)]
#[error("{kind:?}: {message}")]
pub struct SitemapError {
    pub kind: SitemapErrorKind,
    pub message: String,
}

impl SitemapError {
    pub fn invalid_url(target: &str) -> Self {
        Self {
            kind: SitemapErrorKind::InvalidUrl,
            message: format!("not a usable http(s) target: {target}"),
        }
    }

    pub fn transport(cause: impl std::fmt::Display) -> Self {
        Self {
            kind: SitemapErrorKind::Transport,
            message: cause.to_string(),
        }
    }

    pub fn timeout() -> Self {
        Self {
            kind: SitemapErrorKind::Timeout,
            message: "sitemap body fetch exceeded deadline".to_string(),
        }
    }
}
