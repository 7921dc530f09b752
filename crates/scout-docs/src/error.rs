//! Document extraction failure taxonomy (spec §4.5, §7).

use scout_types::{ErrorKind, PipelineError};

pub fn unsupported_file_type(suffix: &str) -> PipelineError {
    PipelineError::new(ErrorKind::UnsupportedFileType(suffix.to_string()), format!("unsupported file suffix: {suffix}"))
}

pub fn malformed(kind: &str, cause: impl std::fmt::Display) -> PipelineError {
    PipelineError::new(
        ErrorKind::UnsupportedFileType(kind.to_string()),
        format!("failed to parse {kind}: {cause}"),
    )
}
