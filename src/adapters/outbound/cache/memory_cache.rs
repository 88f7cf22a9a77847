use crate::ports::outbound::CacheStore;
use crate::shared::Clock;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// In-memory cache with the same TTL semantics as [`super::FileCache`].
///
/// Thread-safe via `DashMap`; concurrent writers to one key race and the
/// last write wins.
pub struct InMemoryCache {
    entries: DashMap<String, (DateTime<Utc>, Value)>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl InMemoryCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CacheStore for InMemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        let entry = self.entries.get(key)?;
        let (written_at, payload) = entry.value();
        if self.clock.now() - *written_at > self.ttl {
            debug!(key, "Cache entry expired");
            return None;
        }
        debug!(key, "Cache hit");
        Some(payload.clone())
    }

    fn set(&self, key: &str, value: &Value) {
        self.entries
            .insert(key.to_string(), (self.clock.now(), value.clone()));
    }
}
