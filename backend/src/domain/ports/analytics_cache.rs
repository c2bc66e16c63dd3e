//! Port interface for the analytics payload cache.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{define_port_error, CacheKey, CacheNamespace};

define_port_error! {
    /// Errors surfaced by the caching adapter.
    pub enum AnalyticsCacheError {
        /// Cache backend is unavailable or timing out.
        Backend { message: String } => "analytics cache backend failure: {message}",
        /// Serialisation or deserialisation of cached content failed.
        Serialization { message: String } => "analytics cache serialisation failed: {message}",
    }
}

/// Port for storing computed analytics payloads.
///
/// Payloads are cached as JSON values so the cache never needs to know the
/// concrete response shapes. Expiry is entirely TTL-driven; invalidation
/// removes whole namespaces at once.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsCache: Send + Sync {
    /// Read a cached payload for the given key, `None` on miss or expiry.
    async fn get(&self, key: &CacheKey) -> Result<Option<Value>, AnalyticsCacheError>;

    /// Store a payload under the supplied key with the given lifetime.
    async fn put(
        &self,
        key: &CacheKey,
        payload: &Value,
        ttl: Duration,
    ) -> Result<(), AnalyticsCacheError>;

    /// Remove every key under the given namespace.
    async fn purge_namespace(&self, namespace: CacheNamespace)
        -> Result<(), AnalyticsCacheError>;
}

/// No-op cache for code paths that do not exercise caching.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpAnalyticsCache;

#[async_trait]
impl AnalyticsCache for NoOpAnalyticsCache {
    async fn get(&self, _key: &CacheKey) -> Result<Option<Value>, AnalyticsCacheError> {
        Ok(None)
    }

    async fn put(
        &self,
        _key: &CacheKey,
        _payload: &Value,
        _ttl: Duration,
    ) -> Result<(), AnalyticsCacheError> {
        Ok(())
    }

    async fn purge_namespace(
        &self,
        _namespace: CacheNamespace,
    ) -> Result<(), AnalyticsCacheError> {
        Ok(())
    }
}
