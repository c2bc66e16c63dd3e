//! User feedback records with fixed-precision ratings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum allowed length for a feedback category.
pub const CATEGORY_MAX: usize = 100;

/// Validation errors for feedback payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedbackValidationError {
    #[error("category must not be empty")]
    EmptyCategory,
    #[error("category must be at most {max} characters")]
    CategoryTooLong { max: usize },
    #[error("rating must be between 0.0 and 9.9")]
    RatingOutOfRange,
    #[error("rating must have at most one decimal place")]
    RatingTooPrecise,
}

/// One-decimal fixed-precision rating, stored as integer tenths.
///
/// Storing tenths keeps equality and averaging exact; floats only appear at
/// the serialisation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rating(i16);

impl Rating {
    /// Largest representable rating, 9.9.
    pub const MAX: Self = Self(99);

    /// Construct from a floating-point wire value.
    ///
    /// Rejects values outside `0.0..=9.9` and values carrying more than one
    /// fractional digit. `9.95` is an error, not `9.9`.
    pub fn from_f64(value: f64) -> Result<Self, FeedbackValidationError> {
        if !value.is_finite() {
            return Err(FeedbackValidationError::RatingOutOfRange);
        }
        let tenths = (value * 10.0).round();
        // Precision is resolved before range so 9.95 reports the extra
        // digit, not the overflow its rounding would cause. f64 cannot
        // represent most tenths exactly, so compare against the shortest
        // round-trip representation rather than the raw product.
        if format!("{value}") != format!("{}", tenths / 10.0) {
            return Err(FeedbackValidationError::RatingTooPrecise);
        }
        if !(0.0..=99.0).contains(&tenths) {
            return Err(FeedbackValidationError::RatingOutOfRange);
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self(tenths as i16))
    }

    /// Construct from stored tenths, as read back from persistence.
    pub fn from_tenths(tenths: i16) -> Result<Self, FeedbackValidationError> {
        if !(0..=99).contains(&tenths) {
            return Err(FeedbackValidationError::RatingOutOfRange);
        }
        Ok(Self(tenths))
    }

    /// Stored representation.
    pub fn tenths(self) -> i16 {
        self.0
    }

    /// Wire representation.
    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

impl TryFrom<f64> for Rating {
    type Error = FeedbackValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_f64(value)
    }
}

impl From<Rating> for f64 {
    fn from(value: Rating) -> Self {
        value.as_f64()
    }
}

/// Category a feedback record files under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FeedbackCategory(String);

impl FeedbackCategory {
    pub fn new(category: impl Into<String>) -> Result<Self, FeedbackValidationError> {
        Self::from_owned(category.into())
    }

    fn from_owned(category: String) -> Result<Self, FeedbackValidationError> {
        if category.trim().is_empty() {
            return Err(FeedbackValidationError::EmptyCategory);
        }
        if category.chars().count() > CATEGORY_MAX {
            return Err(FeedbackValidationError::CategoryTooLong { max: CATEGORY_MAX });
        }
        Ok(Self(category))
    }
}

impl AsRef<str> for FeedbackCategory {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for FeedbackCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<FeedbackCategory> for String {
    fn from(value: FeedbackCategory) -> Self {
        value.0
    }
}

impl TryFrom<String> for FeedbackCategory {
    type Error = FeedbackValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// A stored feedback record. Immutable once persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: FeedbackCategory,
    pub rating: Rating,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_text: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Validated payload for submitting feedback.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackDraft {
    pub category: FeedbackCategory,
    pub rating: Rating,
    pub feedback_text: Option<String>,
}
