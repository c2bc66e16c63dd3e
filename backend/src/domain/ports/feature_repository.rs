//! Port for feature reference data lookups.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::feature::{Feature, FeatureName};

use super::define_port_error;

define_port_error! {
    /// Errors raised by feature repository adapters.
    pub enum FeatureRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "feature repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "feature repository query failed: {message}",
    }
}

impl From<FeatureRepositoryError> for crate::domain::Error {
    fn from(err: FeatureRepositoryError) -> Self {
        match err {
            FeatureRepositoryError::Connection { .. } => {
                Self::service_unavailable(err.to_string())
            }
            FeatureRepositoryError::Query { .. } => Self::internal(err.to_string()),
        }
    }
}

/// Port for resolving feature names to stored features.
///
/// Features are reference data; the ingestion path only ever reads them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeatureRepository: Send + Sync {
    /// Find a feature by its exact name.
    async fn find_by_name(
        &self,
        name: &FeatureName,
    ) -> Result<Option<Feature>, FeatureRepositoryError>;

    /// Resolve several names at once; absent names are simply missing from
    /// the result map.
    async fn find_by_names(
        &self,
        names: &[FeatureName],
    ) -> Result<HashMap<FeatureName, Feature>, FeatureRepositoryError>;
}

/// In-memory feature store used when no database is configured and in tests.
#[derive(Debug, Default)]
pub struct FixtureFeatureRepository {
    features: Mutex<Vec<Feature>>,
}

impl FixtureFeatureRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with named features in the given category.
    pub fn with_features(
        entries: impl IntoIterator<Item = (FeatureName, &'static str)>,
    ) -> Self {
        let features = entries
            .into_iter()
            .map(|(name, category)| Feature {
                id: Uuid::new_v4(),
                name,
                description: String::new(),
                category: category.to_owned(),
                created_at: Utc::now(),
            })
            .collect();
        Self {
            features: Mutex::new(features),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Feature>>, FeatureRepositoryError> {
        self.features
            .lock()
            .map_err(|_| FeatureRepositoryError::query("feature store lock poisoned"))
    }
}

#[async_trait]
impl FeatureRepository for FixtureFeatureRepository {
    async fn find_by_name(
        &self,
        name: &FeatureName,
    ) -> Result<Option<Feature>, FeatureRepositoryError> {
        Ok(self
            .lock()?
            .iter()
            .find(|feature| &feature.name == name)
            .cloned())
    }

    async fn find_by_names(
        &self,
        names: &[FeatureName],
    ) -> Result<HashMap<FeatureName, Feature>, FeatureRepositoryError> {
        let features = self.lock()?;
        Ok(names
            .iter()
            .filter_map(|name| {
                features
                    .iter()
                    .find(|feature| &feature.name == name)
                    .map(|feature| (name.clone(), feature.clone()))
            })
            .collect())
    }
}
