//! Driving port for aggregated analytics reads.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::interaction::{Interaction, InteractionFilter};
use crate::domain::Error;

use super::{ActiveUser, CategorySummary, FeatureUsage, KindCount};
use crate::domain::feedback::Feedback;

/// Aggregated interaction statistics payload.
///
/// Field names are part of the wire contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionStatistics {
    pub total_interactions: i64,
    pub interactions_last_30_days: i64,
    pub interaction_type_breakdown: Vec<KindCount>,
    pub feature_interaction_stats: Vec<FeatureUsage>,
    pub top_10_active_users: Vec<ActiveUser>,
}

/// Aggregated feedback analytics payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackAnalytics {
    pub feedback_summary: Vec<CategorySummary>,
    pub recent_feedback: Vec<Feedback>,
}

/// Domain use-case port for analytics reads.
///
/// Implementations are expected to serve from cache when a fresh entry
/// exists and recompute otherwise.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsQuery: Send + Sync {
    /// Interaction statistics over the trailing 30-day window.
    async fn interaction_statistics(&self) -> Result<InteractionStatistics, Error>;

    /// Feedback summary and the most recent records.
    async fn feedback_analytics(&self) -> Result<FeedbackAnalytics, Error>;

    /// One user's interactions, optionally filtered. `NotFound` when the
    /// user does not exist; an empty list is a valid success.
    async fn user_interactions(
        &self,
        user_id: Uuid,
        filter: &InteractionFilter,
    ) -> Result<Vec<Interaction>, Error>;
}
