//! PostgreSQL-backed `InteractionRepository` implementation using Diesel ORM.
//!
//! Event rows reference features by id; reads join the features table to
//! recover the feature name the domain works with. Aggregates run as raw
//! SQL with typed result rows because Diesel's DSL does not cover the
//! grouped joins these queries need.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Timestamptz};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::interaction::{Interaction, InteractionFilter, InteractionKind};
use crate::domain::ports::{
    ActiveUser, FeatureUsage, InteractionRepository, InteractionRepositoryError, KindCount,
};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{
    ActiveUserRow, FeatureUsageRow, InteractionRow, KindCountRow, NewInteractionRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{features, interactions};

/// Diesel-backed implementation of the interaction repository port.
#[derive(Clone)]
pub struct DieselInteractionRepository {
    pool: DbPool,
}

impl DieselInteractionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> InteractionRepositoryError {
    map_basic_pool_error(error, InteractionRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> InteractionRepositoryError {
    map_basic_diesel_error(
        error,
        InteractionRepositoryError::query,
        InteractionRepositoryError::connection,
    )
}

fn parse_kind(raw: &str) -> Result<InteractionKind, InteractionRepositoryError> {
    raw.parse()
        .map_err(|_| InteractionRepositoryError::query(format!("unknown interaction type: {raw}")))
}

/// Convert a joined row plus feature name into a domain interaction.
fn row_to_interaction(
    row: InteractionRow,
    feature_name: String,
) -> Result<Interaction, InteractionRepositoryError> {
    let InteractionRow {
        id,
        user_id,
        interaction_type,
        occurred_at,
        duration_seconds,
        additional_metadata,
    } = row;

    Ok(Interaction {
        id,
        user_id,
        feature_name: crate::domain::feature::FeatureName::new(feature_name)
            .map_err(|err| InteractionRepositoryError::query(err.to_string()))?,
        interaction_type: parse_kind(&interaction_type)?,
        occurred_at,
        duration_seconds,
        additional_metadata,
    })
}

#[async_trait]
impl InteractionRepository for DieselInteractionRepository {
    async fn insert_batch(
        &self,
        batch: &[Interaction],
    ) -> Result<(), InteractionRepositoryError> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut names: Vec<&str> = batch
            .iter()
            .map(|event| event.feature_name.as_ref())
            .collect();
        names.sort_unstable();
        names.dedup();

        let feature_ids: HashMap<String, Uuid> = features::table
            .filter(features::name.eq_any(&names))
            .select((features::name, features::id))
            .load::<(String, Uuid)>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .collect();

        let rows: Vec<NewInteractionRow<'_>> = batch
            .iter()
            .map(|event| {
                let feature_id = feature_ids
                    .get(event.feature_name.as_ref())
                    .copied()
                    .ok_or_else(|| {
                        InteractionRepositoryError::query(format!(
                            "feature not found: {}",
                            event.feature_name
                        ))
                    })?;
                Ok(NewInteractionRow {
                    id: event.id,
                    user_id: event.user_id,
                    feature_id,
                    interaction_type: event.interaction_type.as_str(),
                    occurred_at: event.occurred_at,
                    duration_seconds: event.duration_seconds,
                    additional_metadata: event.additional_metadata.as_ref(),
                })
            })
            .collect::<Result<_, InteractionRepositoryError>>()?;

        // One multi-row insert, so the batch lands atomically.
        diesel::insert_into(interactions::table)
            .values(&rows)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn total_count(&self) -> Result<i64, InteractionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        interactions::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn count_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<i64, InteractionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        interactions::table
            .filter(interactions::occurred_at.ge(cutoff))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn kind_breakdown_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<KindCount>, InteractionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<KindCountRow> = diesel::sql_query(
            "SELECT interaction_type, COUNT(*) AS count \
             FROM interactions \
             WHERE occurred_at >= $1 \
             GROUP BY interaction_type \
             ORDER BY count DESC, interaction_type ASC",
        )
        .bind::<Timestamptz, _>(cutoff)
        .load(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|row| {
                Ok(KindCount {
                    interaction_type: parse_kind(&row.interaction_type)?,
                    count: row.count,
                })
            })
            .collect()
    }

    async fn feature_stats_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<FeatureUsage>, InteractionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<FeatureUsageRow> = diesel::sql_query(
            "SELECT f.name AS feature_name, \
                    COUNT(*) AS interaction_count, \
                    COALESCE(AVG(i.duration_seconds), 0)::float8 AS avg_duration \
             FROM interactions i \
             JOIN features f ON f.id = i.feature_id \
             WHERE i.occurred_at >= $1 \
             GROUP BY f.name \
             ORDER BY interaction_count DESC, f.name ASC",
        )
        .bind::<Timestamptz, _>(cutoff)
        .load(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|row| FeatureUsage {
                feature_name: row.feature_name,
                interaction_count: row.interaction_count,
                avg_duration: row.avg_duration,
            })
            .collect())
    }

    async fn top_users_since(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<ActiveUser>, InteractionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ActiveUserRow> = diesel::sql_query(
            "SELECT u.username AS username, \
                    COUNT(*) AS interaction_count \
             FROM interactions i \
             JOIN users u ON u.id = i.user_id \
             WHERE i.occurred_at >= $1 \
             GROUP BY u.username \
             ORDER BY interaction_count DESC, u.username ASC \
             LIMIT $2",
        )
        .bind::<Timestamptz, _>(cutoff)
        .bind::<BigInt, _>(limit)
        .load(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|row| ActiveUser {
                username: row.username,
                interaction_count: row.interaction_count,
            })
            .collect())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        filter: &InteractionFilter,
    ) -> Result<Vec<Interaction>, InteractionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = interactions::table
            .inner_join(features::table)
            .filter(interactions::user_id.eq(user_id))
            .into_boxed();
        if let Some(kind) = filter.kind {
            query = query.filter(interactions::interaction_type.eq(kind.as_str()));
        }
        if let Some(start) = filter.start {
            query = query.filter(interactions::occurred_at.ge(start));
        }
        if let Some(end) = filter.end {
            query = query.filter(interactions::occurred_at.le(end));
        }

        let rows: Vec<(InteractionRow, String)> = query
            .order(interactions::occurred_at.desc())
            .select((InteractionRow::as_select(), features::name))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(row, feature_name)| row_to_interaction(row, feature_name))
            .collect()
    }
}
