//! Cache adapters implementing the `AnalyticsCache` port.
//!
//! Two backends are provided:
//!
//! - [`MemoryAnalyticsCache`], an in-process map with TTL expiry, used when no
//!   Redis instance is configured and in tests.
//! - [`RedisAnalyticsCache`], backed by a `bb8-redis` connection pool, for
//!   deployments where cached analytics must survive restarts and be shared
//!   across replicas.

mod memory;
mod redis;

pub use memory::MemoryAnalyticsCache;
pub use redis::{RedisAnalyticsCache, RedisCacheConfig};
