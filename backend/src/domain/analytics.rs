//! Cached analytics reads over interaction and feedback stores.
//!
//! Every payload is cached as JSON under a deterministic key. Statistics use
//! hour-bucketed keys so a cache hit within the hour short-circuits all
//! repository work; per-user listings use composite keys derived from the
//! filter. Cache failures degrade to a recompute rather than failing the
//! request.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::Duration;
use mockable::Clock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::domain::interaction::{Interaction, InteractionFilter};
use crate::domain::ports::{
    AnalyticsCache, AnalyticsQuery, CacheKey, CacheNamespace, FeedbackAnalytics,
    FeedbackRepository, InteractionRepository, InteractionStatistics, UserRepository,
};
use crate::domain::Error;

/// Lifetime of hour-bucketed statistics payloads.
pub const STATS_TTL: StdDuration = StdDuration::from_secs(3600);
/// Lifetime of per-user interaction listings.
pub const USER_INTERACTIONS_TTL: StdDuration = StdDuration::from_secs(1800);
/// Trailing window covered by the statistics aggregates.
pub const TRAILING_WINDOW_DAYS: i64 = 30;
/// Rows returned by the active-user ranking.
const TOP_USERS_LIMIT: i64 = 10;
/// Rows returned by the recent-feedback listing.
const RECENT_FEEDBACK_LIMIT: i64 = 10;

/// Cache-fronted implementation of [`AnalyticsQuery`].
pub struct AnalyticsService {
    interactions: Arc<dyn InteractionRepository>,
    feedback: Arc<dyn FeedbackRepository>,
    users: Arc<dyn UserRepository>,
    cache: Arc<dyn AnalyticsCache>,
    clock: Arc<dyn Clock>,
}

impl AnalyticsService {
    pub fn new(
        interactions: Arc<dyn InteractionRepository>,
        feedback: Arc<dyn FeedbackRepository>,
        users: Arc<dyn UserRepository>,
        cache: Arc<dyn AnalyticsCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            interactions,
            feedback,
            users,
            cache,
            clock,
        }
    }

    /// Read a cached payload, treating backend failures and undecodable
    /// entries as misses.
    async fn cached<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let value = match self.cache.get(key).await {
            Ok(value) => value?,
            Err(error) => {
                warn!(%error, key = %key, "analytics cache read failed; recomputing");
                return None;
            }
        };
        match serde_json::from_value(value) {
            Ok(payload) => Some(payload),
            Err(error) => {
                warn!(%error, key = %key, "cached analytics payload was undecodable");
                None
            }
        }
    }

    /// Store a payload; failures are logged, not surfaced.
    async fn store<T: Serialize>(&self, key: &CacheKey, payload: &T, ttl: StdDuration) {
        let value = match serde_json::to_value(payload) {
            Ok(value) => value,
            Err(error) => {
                warn!(%error, key = %key, "analytics payload failed to serialise for caching");
                return;
            }
        };
        if let Err(error) = self.cache.put(key, &value, ttl).await {
            warn!(%error, key = %key, "analytics cache write failed");
        }
    }

    async fn compute_interaction_statistics(&self) -> Result<InteractionStatistics, Error> {
        let cutoff = self.clock.utc() - Duration::days(TRAILING_WINDOW_DAYS);
        let total_interactions = self.interactions.total_count().await?;
        let interactions_last_30_days = self.interactions.count_since(cutoff).await?;
        let interaction_type_breakdown = self.interactions.kind_breakdown_since(cutoff).await?;
        let mut feature_interaction_stats =
            self.interactions.feature_stats_since(cutoff).await?;
        for row in &mut feature_interaction_stats {
            row.avg_duration = (row.avg_duration * 100.0).round() / 100.0;
        }
        let top_10_active_users = self
            .interactions
            .top_users_since(cutoff, TOP_USERS_LIMIT)
            .await?;
        Ok(InteractionStatistics {
            total_interactions,
            interactions_last_30_days,
            interaction_type_breakdown,
            feature_interaction_stats,
            top_10_active_users,
        })
    }

    async fn compute_feedback_analytics(&self) -> Result<FeedbackAnalytics, Error> {
        let feedback_summary = self.feedback.summary_by_category().await?;
        let recent_feedback = self.feedback.recent(RECENT_FEEDBACK_LIMIT).await?;
        Ok(FeedbackAnalytics {
            feedback_summary,
            recent_feedback,
        })
    }
}

#[async_trait]
impl AnalyticsQuery for AnalyticsService {
    async fn interaction_statistics(&self) -> Result<InteractionStatistics, Error> {
        let key = CacheKey::hour_bucket(CacheNamespace::InteractionStats, self.clock.utc());
        if let Some(cached) = self.cached(&key).await {
            return Ok(cached);
        }
        let stats = self.compute_interaction_statistics().await?;
        self.store(&key, &stats, STATS_TTL).await;
        Ok(stats)
    }

    async fn feedback_analytics(&self) -> Result<FeedbackAnalytics, Error> {
        let key = CacheKey::hour_bucket(CacheNamespace::FeedbackAnalytics, self.clock.utc());
        if let Some(cached) = self.cached(&key).await {
            return Ok(cached);
        }
        let analytics = self.compute_feedback_analytics().await?;
        self.store(&key, &analytics, STATS_TTL).await;
        Ok(analytics)
    }

    async fn user_interactions(
        &self,
        user_id: Uuid,
        filter: &InteractionFilter,
    ) -> Result<Vec<Interaction>, Error> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(Error::not_found("User not found"));
        }
        let key = CacheKey::user_interactions(user_id, filter);
        if let Some(cached) = self.cached(&key).await {
            return Ok(cached);
        }
        let interactions = self.interactions.list_for_user(user_id, filter).await?;
        self.store(&key, &interactions, USER_INTERACTIONS_TTL)
            .await;
        Ok(interactions)
    }
}
