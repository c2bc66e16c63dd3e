//! Product feature reference data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum allowed length for a feature name.
pub const FEATURE_NAME_MAX: usize = 100;

/// Validation errors for feature names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeatureValidationError {
    #[error("feature name must not be empty")]
    EmptyName,
    #[error("feature name must be at most {max} characters")]
    NameTooLong { max: usize },
}

/// Name a feature is addressed by on the ingestion path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FeatureName(String);

impl FeatureName {
    pub fn new(name: impl Into<String>) -> Result<Self, FeatureValidationError> {
        Self::from_owned(name.into())
    }

    fn from_owned(name: String) -> Result<Self, FeatureValidationError> {
        if name.trim().is_empty() {
            return Err(FeatureValidationError::EmptyName);
        }
        if name.chars().count() > FEATURE_NAME_MAX {
            return Err(FeatureValidationError::NameTooLong {
                max: FEATURE_NAME_MAX,
            });
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for FeatureName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for FeatureName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<FeatureName> for String {
    fn from(value: FeatureName) -> Self {
        value.0
    }
}

impl TryFrom<String> for FeatureName {
    type Error = FeatureValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// A trackable product surface that interactions attach to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub id: Uuid,
    pub name: FeatureName,
    pub description: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}
