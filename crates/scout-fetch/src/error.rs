//! `FetchError{kind, cause}` (spec §4.1, §7).

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Transport,
    ChallengeExhausted,
    InvalidUrl,
}

#[derive(Error, Debug, Clone)]
#[error("fetch error ({kind:?}): {cause}")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub cause: String,
}

impl FetchError {
    pub fn transport(cause: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Transport,
            cause: cause.into(),
        }
    }

    pub fn challenge_exhausted(last_status: u16) -> Self {
        Self {
            kind: FetchErrorKind::ChallengeExhausted,
            cause: format!("bot-challenge retries exhausted, last status {last_status}"),
        }
    }

    pub fn invalid_url(cause: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::InvalidUrl,
            cause: cause.into(),
        }
    }
}
