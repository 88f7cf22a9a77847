use crate::shared::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use tracing::{error, warn};

/// CacheStore port for the time-bounded cache wrapped around every
/// external-source call.
///
/// Both operations are infallible at the boundary. A missing, expired,
/// disabled or unreadable entry is `None`; a failed write is logged by the
/// implementation and otherwise ignored.
pub trait CacheStore: Send + Sync {
    /// Returns the stored payload if it exists and is younger than the TTL
    fn get(&self, key: &str) -> Option<Value>;

    /// Stores `value` under `key`, best-effort
    fn set(&self, key: &str, value: &Value);
}

/// Reads a typed value. A payload that no longer matches `T` is a miss.
pub fn read_cached<T: DeserializeOwned>(cache: &dyn CacheStore, key: &str) -> Option<T> {
    let value = cache.get(key)?;
    match serde_json::from_value(value) {
        Ok(typed) => Some(typed),
        Err(e) => {
            warn!(key, error = %e, "Cached payload has unexpected shape, treating as miss");
            None
        }
    }
}

/// Writes a typed value, best-effort.
pub fn write_cached<T: Serialize>(cache: &dyn CacheStore, key: &str, value: &T) {
    match serde_json::to_value(value) {
        Ok(json) => cache.set(key, &json),
        Err(e) => warn!(key, error = %e, "Failed to serialize value for cache"),
    }
}

/// The "cache, else fetch, else nothing" chain every source call goes through.
///
/// 1. A fresh cache entry is returned verbatim; `fetch` is never polled.
/// 2. Otherwise `fetch` runs once. Success is cached and returned.
/// 3. Failure is logged and yields `None`; callers substitute their
///    documented fallback. Failures are not cached.
pub async fn cached_or_fetch<T, F>(cache: &dyn CacheStore, key: &str, fetch: F) -> Option<T>
where
    T: Serialize + DeserializeOwned,
    F: Future<Output = Result<T>>,
{
    if let Some(hit) = read_cached(cache, key) {
        return Some(hit);
    }

    match fetch.await {
        Ok(value) => {
            write_cached(cache, key, &value);
            Some(value)
        }
        Err(e) => {
            error!(key, error = %format!("{:#}", e), "Source request failed, using fallback");
            None
        }
    }
}
