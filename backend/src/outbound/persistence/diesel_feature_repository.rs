//! PostgreSQL-backed `FeatureRepository` implementation using Diesel ORM.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::feature::{Feature, FeatureName};
use crate::domain::ports::{FeatureRepository, FeatureRepositoryError};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::FeatureRow;
use super::pool::{DbPool, PoolError};
use super::schema::features;

/// Diesel-backed implementation of the feature repository port.
#[derive(Clone)]
pub struct DieselFeatureRepository {
    pool: DbPool,
}

impl DieselFeatureRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> FeatureRepositoryError {
    map_basic_pool_error(error, FeatureRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> FeatureRepositoryError {
    map_basic_diesel_error(
        error,
        FeatureRepositoryError::query,
        FeatureRepositoryError::connection,
    )
}

/// Convert a database row into a validated domain feature.
fn row_to_feature(row: FeatureRow) -> Result<Feature, FeatureRepositoryError> {
    let FeatureRow {
        id,
        name,
        description,
        category,
        created_at,
    } = row;

    Ok(Feature {
        id,
        name: FeatureName::new(name)
            .map_err(|err| FeatureRepositoryError::query(err.to_string()))?,
        description,
        category,
        created_at,
    })
}

#[async_trait]
impl FeatureRepository for DieselFeatureRepository {
    async fn find_by_name(
        &self,
        name: &FeatureName,
    ) -> Result<Option<Feature>, FeatureRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = features::table
            .filter(features::name.eq(name.as_ref()))
            .select(FeatureRow::as_select())
            .first::<FeatureRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_feature).transpose()
    }

    async fn find_by_names(
        &self,
        names: &[FeatureName],
    ) -> Result<HashMap<FeatureName, Feature>, FeatureRepositoryError> {
        if names.is_empty() {
            return Ok(HashMap::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let raw_names: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
        let rows: Vec<FeatureRow> = features::table
            .filter(features::name.eq_any(raw_names))
            .select(FeatureRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|row| {
                let feature = row_to_feature(row)?;
                Ok((feature.name.clone(), feature))
            })
            .collect()
    }
}
