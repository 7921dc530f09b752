//! `Source` — a single ingested input (spec §3).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::PipelineError;

pub type SourceId = uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Document,
    Web,
    Deck,
}

/// Lifecycle state of a `Source`. Transitions are monotone:
/// `Pending -> InProgress -> (Extracted | Failed)`. `Extracted` and `Failed`
/// are terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum SourceStatus {
    Pending,
    InProgress,
    Extracted,
    Failed { error: PipelineError },
}

impl SourceStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SourceStatus::Extracted | SourceStatus::Failed { .. })
    }
}

/// One ingested input. Created by the Orchestrator at request start, mutated
/// exactly once by its owning extractor, destroyed with the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub id: SourceId,
    pub kind: SourceKind,
    /// filename, URL, or deck URL
    pub origin: String,
    pub status: SourceStatus,
    /// present iff `status == Extracted`
    pub text: Option<String>,
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Source {
    pub fn new(kind: SourceKind, origin: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            kind,
            origin: origin.into(),
            status: SourceStatus::Pending,
            text: None,
            metadata: HashMap::new(),
        }
    }

    pub fn mark_in_progress(&mut self) {
        debug_assert!(matches!(self.status, SourceStatus::Pending));
        self.status = SourceStatus::InProgress;
    }

    pub fn mark_extracted(&mut self, text: String, metadata: HashMap<String, serde_json::Value>) {
        debug_assert!(!self.status.is_terminal());
        self.text = Some(text);
        self.metadata = metadata;
        self.status = SourceStatus::Extracted;
    }

    pub fn mark_failed(&mut self, error: PipelineError) {
        debug_assert!(!self.status.is_terminal());
        self.status = SourceStatus::Failed { error };
    }

    pub fn is_extracted(&self) -> bool {
        matches!(self.status, SourceStatus::Extracted)
    }
}
