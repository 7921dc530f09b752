//! # Scout Entities
//!
//! Chunked, model-backed entity extraction with normalization, dedup, and
//! a bounded summary renderer for downstream prompt injection
//! (spec §4.6, C6).
//!
//! Grounded on `riptide-html::processor`'s chunking shape and
//! `riptide-intelligence::provider`'s message/completion types, extended
//! with the tolerant three-shape response parsing the original
//! `langextract_service.py` integration point called for.

mod chunk;
mod extract;
mod summary;

pub use chunk::{chunk_text, Chunk};
pub use extract::{EntityConfig, EntityExtractor, ExtractionResult};
pub use summary::{render_summary, SummaryOptions};
