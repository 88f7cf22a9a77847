use crate::ports::outbound::CacheStore;
use crate::shared::Clock;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// On-disk record wrapping a cached payload with its write time.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEnvelope {
    key: String,
    written_at: DateTime<Utc>,
    payload: Value,
}

/// FileCache stores one JSON envelope per key under a cache directory.
///
/// File names are the URL-encoded key, so keys containing `/` or `@`
/// (scoped npm packages) stay within the directory. Entries older than the
/// TTL are ignored on read and overwritten by the next `set`; nothing is
/// evicted in the background.
pub struct FileCache {
    dir: PathBuf,
    ttl: Duration,
    enabled: bool,
    clock: Arc<dyn Clock>,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration, enabled: bool, clock: Arc<dyn Clock>) -> Self {
        Self {
            dir: dir.into(),
            ttl,
            enabled,
            clock,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", urlencoding::encode(key)))
    }

    fn read_envelope(&self, path: &Path) -> Option<CacheEnvelope> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read cache entry");
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(envelope) => Some(envelope),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring corrupt cache entry");
                None
            }
        }
    }

    fn write_envelope(&self, path: &Path, envelope: &CacheEnvelope) -> crate::shared::Result<()> {
        fs::create_dir_all(&self.dir)?;
        if path.is_symlink() {
            anyhow::bail!("refusing to overwrite symlinked cache entry");
        }
        let json = serde_json::to_string(envelope)?;
        fs::write(path, json)?;
        Ok(())
    }
}

impl CacheStore for FileCache {
    fn get(&self, key: &str) -> Option<Value> {
        if !self.enabled {
            return None;
        }

        let envelope = self.read_envelope(&self.entry_path(key))?;
        if envelope.key != key {
            warn!(key, stored = %envelope.key, "Cache entry key mismatch, treating as miss");
            return None;
        }

        if self.clock.now() - envelope.written_at > self.ttl {
            debug!(key, "Cache entry expired");
            return None;
        }

        debug!(key, "Cache hit");
        Some(envelope.payload)
    }

    fn set(&self, key: &str, value: &Value) {
        if !self.enabled {
            return;
        }

        let envelope = CacheEnvelope {
            key: key.to_string(),
            written_at: self.clock.now(),
            payload: value.clone(),
        };

        let path = self.entry_path(key);
        if let Err(e) = self.write_envelope(&path, &envelope) {
            warn!(key, path = %path.display(), error = %e, "Failed to write cache entry");
        }
    }
}
