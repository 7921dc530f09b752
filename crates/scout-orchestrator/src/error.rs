//! Error constructors for orchestration-level failures (spec §7).

use scout_types::{ErrorKind, PipelineError};

pub fn cancelled() -> PipelineError {
    PipelineError::new(ErrorKind::Cancelled, "sub-job cancelled")
}

pub fn deadline_exceeded() -> PipelineError {
    PipelineError::new(ErrorKind::DeadlineExceeded, "global deadline exceeded")
}

pub fn all_sources_failed() -> PipelineError {
    PipelineError::new(ErrorKind::AllSourcesFailed, "every source failed and the query was empty")
}

pub fn join_failed(cause: impl Into<String>) -> PipelineError {
    let cause = cause.into();
    PipelineError::new(ErrorKind::Transport(cause.clone()), cause)
}

pub fn empty_request() -> PipelineError {
    PipelineError::new(ErrorKind::EmptyRequest, "request has neither a query nor any sources")
}
