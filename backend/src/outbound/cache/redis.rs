//! Redis-backed analytics cache using `bb8-redis` connection pooling.
//!
//! Payloads are stored as JSON strings via `SET` with `EX`, so expiry is
//! handled server-side. Namespace purges walk `SCAN MATCH <ns>:*` and delete
//! in batches rather than using `KEYS`, which blocks the Redis event loop.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::bb8::Pool;
use bb8_redis::redis::AsyncCommands;
use bb8_redis::RedisConnectionManager;
use serde_json::Value;

use crate::domain::ports::{AnalyticsCache, AnalyticsCacheError, CacheKey, CacheNamespace};

const SCAN_BATCH: usize = 100;

/// Configuration for the Redis cache pool.
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    redis_url: String,
    max_size: u32,
    connection_timeout: Duration,
}

impl RedisCacheConfig {
    /// Create a configuration with defaults of 10 pooled connections and a
    /// 5 second checkout timeout.
    pub fn new(redis_url: impl Into<String>) -> Self {
        Self {
            redis_url: redis_url.into(),
            max_size: 10,
            connection_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    pub fn redis_url(&self) -> &str {
        &self.redis_url
    }
}

/// `AnalyticsCache` implementation backed by a pooled Redis client.
#[derive(Clone)]
pub struct RedisAnalyticsCache {
    pool: Pool<RedisConnectionManager>,
}

impl RedisAnalyticsCache {
    /// Build the connection pool and verify the URL parses.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsCacheError::Backend` when the URL is invalid or the
    /// pool cannot be constructed.
    pub async fn new(config: RedisCacheConfig) -> Result<Self, AnalyticsCacheError> {
        let manager = RedisConnectionManager::new(config.redis_url.as_str())
            .map_err(|err| AnalyticsCacheError::backend(err.to_string()))?;
        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| AnalyticsCacheError::backend(err.to_string()))?;
        Ok(Self { pool })
    }

    async fn connection(
        &self,
    ) -> Result<bb8_redis::bb8::PooledConnection<'_, RedisConnectionManager>, AnalyticsCacheError>
    {
        self.pool
            .get()
            .await
            .map_err(|err| AnalyticsCacheError::backend(err.to_string()))
    }
}

#[async_trait]
impl AnalyticsCache for RedisAnalyticsCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<Value>, AnalyticsCacheError> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn
            .get(key.as_str())
            .await
            .map_err(|err| AnalyticsCacheError::backend(err.to_string()))?;
        raw.map(|payload| {
            serde_json::from_str(&payload)
                .map_err(|err| AnalyticsCacheError::serialization(err.to_string()))
        })
        .transpose()
    }

    async fn put(
        &self,
        key: &CacheKey,
        payload: &Value,
        ttl: Duration,
    ) -> Result<(), AnalyticsCacheError> {
        let encoded = serde_json::to_string(payload)
            .map_err(|err| AnalyticsCacheError::serialization(err.to_string()))?;
        let mut conn = self.connection().await?;
        conn.set_ex::<_, _, ()>(key.as_str(), encoded, ttl.as_secs())
            .await
            .map_err(|err| AnalyticsCacheError::backend(err.to_string()))
    }

    async fn purge_namespace(
        &self,
        namespace: CacheNamespace,
    ) -> Result<(), AnalyticsCacheError> {
        let pattern = format!("{namespace}:*");
        let mut conn = self.connection().await?;
        let mut cursor: u64 = 0;
        loop {
            let (next, keys): (u64, Vec<String>) = bb8_redis::redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut *conn)
                .await
                .map_err(|err| AnalyticsCacheError::backend(err.to_string()))?;
            if !keys.is_empty() {
                conn.del::<_, ()>(keys)
                    .await
                    .map_err(|err| AnalyticsCacheError::backend(err.to_string()))?;
            }
            if next == 0 {
                break;
            }
            cursor = next;
        }
        Ok(())
    }
}
