//! Port for interaction event persistence and aggregation.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::interaction::{Interaction, InteractionFilter, InteractionKind};
use crate::domain::ports::{UserRepository, UserRepositoryError};

use super::define_port_error;

define_port_error! {
    /// Errors raised by interaction repository adapters.
    pub enum InteractionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "interaction repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "interaction repository query failed: {message}",
    }
}

impl From<UserRepositoryError> for InteractionRepositoryError {
    fn from(err: UserRepositoryError) -> Self {
        Self::query(err.to_string())
    }
}

impl From<InteractionRepositoryError> for crate::domain::Error {
    fn from(err: InteractionRepositoryError) -> Self {
        match err {
            InteractionRepositoryError::Connection { .. } => {
                Self::service_unavailable(err.to_string())
            }
            InteractionRepositoryError::Query { .. } => Self::internal(err.to_string()),
        }
    }
}

/// Count of interactions per kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCount {
    pub interaction_type: InteractionKind,
    pub count: i64,
}

/// Per-feature usage figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureUsage {
    pub feature_name: String,
    pub interaction_count: i64,
    pub avg_duration: f64,
}

/// A user ranked by interaction volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveUser {
    pub username: String,
    pub interaction_count: i64,
}

/// Port for writing interaction events and reading aggregates.
///
/// All `*_since` reads cover interactions with `occurred_at >= cutoff`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InteractionRepository: Send + Sync {
    /// Persist a batch of events atomically; either every row lands or none.
    async fn insert_batch(
        &self,
        interactions: &[Interaction],
    ) -> Result<(), InteractionRepositoryError>;

    /// Total recorded interactions, all time.
    async fn total_count(&self) -> Result<i64, InteractionRepositoryError>;

    /// Interactions recorded at or after the cutoff.
    async fn count_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<i64, InteractionRepositoryError>;

    /// Per-kind counts since the cutoff.
    async fn kind_breakdown_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<KindCount>, InteractionRepositoryError>;

    /// Per-feature counts and mean durations since the cutoff, descending by
    /// count.
    async fn feature_stats_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<FeatureUsage>, InteractionRepositoryError>;

    /// The most active users since the cutoff, descending by count, at most
    /// `limit` rows.
    async fn top_users_since(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<ActiveUser>, InteractionRepositoryError>;

    /// All interactions for one user matching the filter, newest first.
    async fn list_for_user(
        &self,
        user_id: Uuid,
        filter: &InteractionFilter,
    ) -> Result<Vec<Interaction>, InteractionRepositoryError>;
}

/// In-memory event store used when no database is configured and in tests.
///
/// Usernames for the top-user ranking come from the injected user
/// repository.
pub struct FixtureInteractionRepository {
    interactions: Mutex<Vec<Interaction>>,
    users: Arc<dyn UserRepository>,
}

impl FixtureInteractionRepository {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self {
            interactions: Mutex::new(Vec::new()),
            users,
        }
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, Vec<Interaction>>, InteractionRepositoryError> {
        self.interactions
            .lock()
            .map_err(|_| InteractionRepositoryError::query("interaction store lock poisoned"))
    }
}

#[async_trait]
impl InteractionRepository for FixtureInteractionRepository {
    async fn insert_batch(
        &self,
        interactions: &[Interaction],
    ) -> Result<(), InteractionRepositoryError> {
        self.lock()?.extend_from_slice(interactions);
        Ok(())
    }

    async fn total_count(&self) -> Result<i64, InteractionRepositoryError> {
        Ok(self.lock()?.len() as i64)
    }

    async fn count_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<i64, InteractionRepositoryError> {
        Ok(self
            .lock()?
            .iter()
            .filter(|event| event.occurred_at >= cutoff)
            .count() as i64)
    }

    async fn kind_breakdown_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<KindCount>, InteractionRepositoryError> {
        let events = self.lock()?;
        let counts = InteractionKind::ALL.map(|kind| KindCount {
            interaction_type: kind,
            count: events
                .iter()
                .filter(|event| {
                    event.occurred_at >= cutoff && event.interaction_type == kind
                })
                .count() as i64,
        });
        Ok(counts.into_iter().filter(|row| row.count > 0).collect())
    }

    async fn feature_stats_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<FeatureUsage>, InteractionRepositoryError> {
        let events = self.lock()?;
        let mut by_feature: Vec<(String, i64, i64)> = Vec::new();
        for event in events.iter().filter(|event| event.occurred_at >= cutoff) {
            let name = event.feature_name.as_ref();
            match by_feature.iter_mut().find(|(existing, _, _)| existing == name) {
                Some((_, count, total)) => {
                    *count += 1;
                    *total += i64::from(event.duration_seconds);
                }
                None => by_feature.push((
                    name.to_owned(),
                    1,
                    i64::from(event.duration_seconds),
                )),
            }
        }
        let mut rows: Vec<FeatureUsage> = by_feature
            .into_iter()
            .map(|(feature_name, count, total)| FeatureUsage {
                feature_name,
                interaction_count: count,
                #[allow(clippy::cast_precision_loss)]
                avg_duration: total as f64 / count as f64,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.interaction_count
                .cmp(&a.interaction_count)
                .then_with(|| a.feature_name.cmp(&b.feature_name))
        });
        Ok(rows)
    }

    async fn top_users_since(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<ActiveUser>, InteractionRepositoryError> {
        let counts: Vec<(Uuid, i64)> = {
            let events = self.lock()?;
            let mut counts: Vec<(Uuid, i64)> = Vec::new();
            for event in events.iter().filter(|event| event.occurred_at >= cutoff) {
                match counts.iter_mut().find(|(id, _)| *id == event.user_id) {
                    Some((_, count)) => *count += 1,
                    None => counts.push((event.user_id, 1)),
                }
            }
            counts
        };
        let mut rows = Vec::with_capacity(counts.len());
        for (user_id, count) in counts {
            let username = match self.users.find_by_id(user_id).await? {
                Some(user) => user.username.to_string(),
                None => continue,
            };
            rows.push(ActiveUser {
                username,
                interaction_count: count,
            });
        }
        rows.sort_by(|a, b| {
            b.interaction_count
                .cmp(&a.interaction_count)
                .then_with(|| a.username.cmp(&b.username))
        });
        rows.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(rows)
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        filter: &InteractionFilter,
    ) -> Result<Vec<Interaction>, InteractionRepositoryError> {
        let events = self.lock()?;
        let mut matching: Vec<Interaction> = events
            .iter()
            .filter(|event| event.user_id == user_id && filter.matches(event))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        Ok(matching)
    }
}
