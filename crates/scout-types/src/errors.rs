//! Error kinds shared across the pipeline (spec §7).
//!
//! Each `scout-*` crate defines its own thiserror enum for its own concerns;
//! this one is the shape the Orchestrator inspects to decide whether to
//! cancel siblings, continue with partials, or fall back engines.

use thiserror::Error;

/// Coarse error classification used by the Orchestrator's decision logic.
/// Individual components carry richer, crate-local error enums; this is the
/// common vocabulary they all collapse into at the Source/Report boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    #[error("invalid url")]
    InvalidUrl,
    #[error("empty request")]
    EmptyRequest,
    #[error("config value out of range: {0}")]
    ConfigOutOfRange(String),
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),
    #[error("deep mode requires a non-empty query")]
    DeepRequiresQuery,

    #[error("transport error: {0}")]
    Transport(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("timeout")]
    Timeout,
    #[error("tls error: {0}")]
    Tls(String),

    #[error("bot-challenge retries exhausted")]
    ChallengeExhausted,

    #[error("render service returned http error: {0}")]
    RenderHttpError(String),
    #[error("polling timed out")]
    PollTimeout,
    #[error("polling reported failure")]
    PollFailed,
    #[error("response did not match expected shape")]
    InvalidResponseShape,

    #[error("browser initialization failed: {0}")]
    BrowserInitFailed(String),
    #[error("invalid deck url")]
    InvalidDeckUrl,
    #[error("password required")]
    PasswordRequired,
    #[error("access denied: {0}")]
    AccessDenied(AccessDeniedKind),
    #[error("no slides found")]
    NoSlidesFound,
    #[error("ocr failed on slide {0}")]
    OcrFailedSlide(usize),

    #[error("llm http error: {0}")]
    LlmHttpError(String),
    #[error("llm request timed out")]
    LlmTimeout,
    #[error("llm returned an empty response")]
    LlmEmptyResponse,

    #[error("operation cancelled")]
    Cancelled,
    #[error("deadline exceeded")]
    DeadlineExceeded,
    #[error("all sources failed")]
    AllSourcesFailed,
}

/// Sub-kind for `ErrorKind::AccessDenied`, per spec §4.4 CONTENT state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDeniedKind {
    Approval,
    Verification,
    WrongPassword,
    InvalidEmail,
    Restricted,
    Private,
    Unknown,
}

impl std::fmt::Display for AccessDeniedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Approval => "approval",
            Self::Verification => "verification",
            Self::WrongPassword => "wrong_password",
            Self::InvalidEmail => "invalid_email",
            Self::Restricted => "restricted",
            Self::Private => "private",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// A pipeline-level error: a classification plus a human-readable message.
/// Sub-jobs attach these to their owning `Source`; the Report carries one
/// when the whole request fails.
#[derive(Error, Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[error("{kind}: {message}")]
pub struct PipelineError {
    pub kind: ErrorKind,
    pub message: String,
}

impl PipelineError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}
