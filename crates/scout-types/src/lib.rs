//! # Scout Types
//!
//! Shared data model and error kinds for the research pipeline, broken out
//! into its own crate so every other `scout-*` crate can depend on the
//! `Source`/`ResearchRequest`/`Report` shapes without pulling in HTTP,
//! browser, or LLM client code.

pub mod config;
pub mod entity;
pub mod errors;
pub mod report;
pub mod request;
pub mod source;

pub use config::{Config, EnvConfig, Mode};
pub use entity::{Entity, EntityClass};
pub use errors::{AccessDeniedKind, ErrorKind, PipelineError};
pub use report::{Citation, Report};
pub use request::{CrawlSpec, DeckSpec, DocumentInput, ResearchRequest};
pub use source::{Source, SourceId, SourceKind, SourceStatus};
