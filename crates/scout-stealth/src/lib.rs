//! # Scout Stealth
//!
//! Header synthesis, User-Agent rotation, and bot-challenge detection for
//! the Fetcher (spec §4.1). Grounded on `riptide-stealth`'s
//! `user_agent.rs`/`detection.rs` rotation style, with the concrete pools
//! carried over from the original `scanner_utils.py` bot-protection helpers.

pub mod challenge;
pub mod domains;
pub mod headers;
pub mod user_agent;

pub use challenge::is_challenge_body;
pub use domains::ChallengingDomains;
pub use headers::{HeaderProfile, Referer};
pub use user_agent::UserAgentPool;
