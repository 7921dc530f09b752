//! # Scout Cache
//!
//! TTL-bound content cache for the Fetcher and Scrape Client (§4.9, C9).
//! Grounded on `riptide-cache::integrated`'s validate-on-read shape,
//! trimmed to a single invariant: a schema-safe (JSON-only — no
//! executable-object deserialization) value store with structural
//! validation on read, and silent-log-don't-propagate serialization
//! failures on write.

mod entry;

pub use entry::CacheEntry;

use dashmap::DashMap;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// A structural validator: given a decoded JSON payload, returns whether it
/// has the required shape (keys present, expected value kinds) for the
/// namespace that produced it. Each cache *user* (Fetcher, Scrape Client)
/// supplies its own validator at read time rather than the cache knowing
/// every namespace's shape.
pub type Validator = dyn Fn(&Value) -> bool + Send + Sync;

#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    pub default_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(3600),
        }
    }
}

/// Process-wide, thread-safe key-value cache. Shared across the Fetcher and
/// Scrape Client; the only process-wide mutable state in the pipeline
/// (spec §9 "Design Notes: Global mutable state").
#[derive(Debug, Default)]
pub struct Cache {
    store: DashMap<String, CacheEntry>,
    config: CacheConfig,
}

impl Cache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            store: DashMap::new(),
            config,
        }
    }

    pub fn key(namespace: &str, identifier: &str) -> String {
        format!("{namespace}:{identifier}")
    }

    /// Read `key`, applying `validator` to the decoded payload. A missing
    /// key, an expired entry, or a payload that fails structural validation
    /// is treated uniformly as a miss; the entry is evicted in the latter
    /// two cases (spec §3 CacheEntry invariant, §4.9).
    pub fn get(&self, key: &str, validator: &Validator) -> Option<Value> {
        let hit = self.store.get(key)?;
        if hit.is_expired() {
            drop(hit);
            debug!(key, "cache entry expired");
            self.store.remove(key);
            return None;
        }
        if !validator(&hit.payload) {
            drop(hit);
            warn!(key, "cache entry failed structural validation, treating as miss");
            self.store.remove(key);
            return None;
        }
        Some(hit.payload.clone())
    }

    /// Write `payload` under `key`. A serialization/validation failure is
    /// logged and swallowed, never propagated to the caller (spec §4.9).
    pub fn set(&self, key: &str, payload: Value, ttl: Option<Duration>) {
        let ttl = ttl.unwrap_or(self.config.default_ttl);
        match serde_json::to_vec(&payload) {
            Ok(_) => {
                self.store.insert(key.to_string(), CacheEntry::new(payload, ttl));
            }
            Err(e) => {
                warn!(key, error = %e, "failed to serialize cache payload, dropping write");
            }
        }
    }

    pub fn invalidate(&self, key: &str) {
        self.store.remove(key);
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

/// A structural validator requiring `{data: {<inner_key>: _}, metadata: _}`
/// shape — the scrape-client cache payload shape from spec §4.3.
pub fn scrape_payload_schema(value: &Value) -> bool {
    let obj = match value.as_object() {
        Some(o) => o,
        None => return false,
    };
    let has_data = obj
        .get("data")
        .and_then(Value::as_object)
        .map(|d| d.contains_key("content"))
        .unwrap_or(false);
    has_data && obj.contains_key("metadata")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn round_trips_valid_payload() {
        let cache = Cache::new(CacheConfig::default());
        let key = Cache::key("scrape", "https://acme.example");
        cache.set(&key, json!({"data": {"content": "hi"}, "metadata": {}}), None);
        let got = cache.get(&key, &scrape_payload_schema);
        assert!(got.is_some());
    }

    #[test]
    fn mutated_non_dict_value_is_treated_as_miss() {
        let cache = Cache::new(CacheConfig::default());
        let key = Cache::key("scrape", "https://acme.example");
        cache.set(&key, json!({"data": {"content": "hi"}, "metadata": {}}), None);
        // Simulate an out-of-band mutation to a non-dict value.
        cache.store.insert(
            key.clone(),
            CacheEntry::new(json!("not-a-dict"), Duration::from_secs(3600)),
        );
        assert!(cache.get(&key, &scrape_payload_schema).is_none());
        assert!(cache.store.get(&key).is_none(), "invalid entry should be evicted");
    }

    #[test]
    fn expired_entry_is_a_miss() {
        let cache = Cache::new(CacheConfig::default());
        let key = Cache::key("scrape", "https://acme.example");
        cache.set(&key, json!({"data": {"content": "hi"}, "metadata": {}}), Some(Duration::from_secs(0)));
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(cache.get(&key, &scrape_payload_schema).is_none());
    }
}
