//! LLM call failure taxonomy (spec §7).

use scout_types::{ErrorKind, PipelineError};

pub fn http_error(status: u16, body: &str) -> PipelineError {
    PipelineError::new(
        ErrorKind::LlmHttpError(format!("{status}")),
        format!("llm endpoint returned {status}: {body}"),
    )
}

pub fn timeout() -> PipelineError {
    PipelineError::new(ErrorKind::LlmTimeout, "llm request exceeded its timeout".to_string())
}

pub fn empty_response() -> PipelineError {
    PipelineError::new(ErrorKind::LlmEmptyResponse, "llm response had no usable content".to_string())
}

pub fn transport(cause: impl std::fmt::Display) -> PipelineError {
    PipelineError::new(ErrorKind::Transport(cause.to_string()), cause.to_string())
}
