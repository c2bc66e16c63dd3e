//! In-process analytics cache with TTL expiry.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::ports::{AnalyticsCache, AnalyticsCacheError, CacheKey, CacheNamespace};

struct Entry {
    payload: Value,
    expires_at: Instant,
}

/// Map-backed cache for single-process deployments and tests.
///
/// Expired entries are dropped lazily on read; there is no background
/// sweeper. Namespace purges scan the whole map, which is fine at the
/// key counts this cache sees (one hour bucket per namespace plus a
/// handful of per-user listing keys).
#[derive(Default)]
pub struct MemoryAnalyticsCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryAnalyticsCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Entry>>, AnalyticsCacheError>
    {
        self.entries
            .lock()
            .map_err(|_| AnalyticsCacheError::backend("cache mutex poisoned"))
    }
}

#[async_trait]
impl AnalyticsCache for MemoryAnalyticsCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<Value>, AnalyticsCacheError> {
        let mut entries = self.lock()?;
        match entries.get(key.as_str()) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.payload.clone())),
            Some(_) => {
                entries.remove(key.as_str());
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(
        &self,
        key: &CacheKey,
        payload: &Value,
        ttl: Duration,
    ) -> Result<(), AnalyticsCacheError> {
        let mut entries = self.lock()?;
        entries.insert(
            key.as_str().to_owned(),
            Entry {
                payload: payload.clone(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn purge_namespace(
        &self,
        namespace: CacheNamespace,
    ) -> Result<(), AnalyticsCacheError> {
        let prefix = namespace.as_str();
        let mut entries = self.lock()?;
        entries.retain(|key, _| !key.starts_with(prefix));
        Ok(())
    }
}
