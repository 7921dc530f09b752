//! Error constructors for the Deck Extractor (spec §4.4 failure taxonomy).

use scout_types::{AccessDeniedKind, ErrorKind, PipelineError};

pub fn browser_init_failed(cause: impl Into<String>) -> PipelineError {
    PipelineError::new(ErrorKind::BrowserInitFailed(cause.into()), "failed to initialize any browser")
}

pub fn invalid_deck_url(url: &str) -> PipelineError {
    PipelineError::new(ErrorKind::InvalidDeckUrl, format!("invalid deck url: {url}"))
}

pub fn password_required() -> PipelineError {
    PipelineError::new(ErrorKind::PasswordRequired, "password protected deck, no password provided")
}

pub fn access_denied(kind: AccessDeniedKind) -> PipelineError {
    PipelineError::new(ErrorKind::AccessDenied(kind), format!("access denied: {kind}"))
}

pub fn no_slides_found() -> PipelineError {
    PipelineError::new(ErrorKind::NoSlidesFound, "no slide image found on page")
}

pub fn ocr_failed_slide(index: usize, cause: impl Into<String>) -> PipelineError {
    PipelineError::new(ErrorKind::OcrFailedSlide(index), cause.into())
}

pub fn transport(cause: impl Into<String>) -> PipelineError {
    let cause = cause.into();
    PipelineError::new(ErrorKind::Transport(cause.clone()), cause)
}
