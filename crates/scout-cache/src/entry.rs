//! `CacheEntry{fingerprint, payload, created_at, ttl_seconds}` (spec §3).

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub payload: Value,
    pub created_at: DateTime<Utc>,
    pub ttl: Duration,
}

impl CacheEntry {
    pub fn new(payload: Value, ttl: Duration) -> Self {
        Self {
            payload,
            created_at: Utc::now(),
            ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        let age = Utc::now().signed_duration_since(self.created_at);
        age.to_std().map(|a| a >= self.ttl).unwrap_or(false)
    }
}
