//! Scrape client failure taxonomy (spec §4.3: `{invalid_url, transport,
//! render_http_error, render_timeout, poll_timeout, poll_failed}`), expressed
//! as `scout_types::PipelineError` so the Orchestrator can handle every
//! sub-job's failure uniformly.

use scout_types::{ErrorKind, PipelineError};

pub fn invalid_url(url: &str) -> PipelineError {
    PipelineError::new(ErrorKind::InvalidUrl, format!("not a scrapeable http(s) url: {url}"))
}

pub fn transport(cause: impl std::fmt::Display) -> PipelineError {
    PipelineError::new(ErrorKind::Transport(cause.to_string()), cause.to_string())
}

pub fn render_http_error(status: u16, body: &str) -> PipelineError {
    PipelineError::new(
        ErrorKind::RenderHttpError(format!("{status}")),
        format!("render service returned {status}: {body}"),
    )
}

pub fn render_timeout() -> PipelineError {
    PipelineError::new(ErrorKind::Timeout, "render service request timed out".to_string())
}

pub fn poll_timeout() -> PipelineError {
    PipelineError::new(ErrorKind::PollTimeout, "polling exceeded the deadline".to_string())
}

pub fn poll_failed(reason: impl std::fmt::Display) -> PipelineError {
    PipelineError::new(ErrorKind::PollFailed, reason.to_string())
}

pub fn invalid_response_shape(detail: impl std::fmt::Display) -> PipelineError {
    PipelineError::new(ErrorKind::InvalidResponseShape, detail.to_string())
}
