//! Port for feedback persistence and aggregation.

use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::feedback::Feedback;

use super::define_port_error;

define_port_error! {
    /// Errors raised by feedback repository adapters.
    pub enum FeedbackRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "feedback repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "feedback repository query failed: {message}",
    }
}

impl From<FeedbackRepositoryError> for crate::domain::Error {
    fn from(err: FeedbackRepositoryError) -> Self {
        match err {
            FeedbackRepositoryError::Connection { .. } => {
                Self::service_unavailable(err.to_string())
            }
            FeedbackRepositoryError::Query { .. } => Self::internal(err.to_string()),
        }
    }
}

/// Per-category feedback figures.
///
/// `average_rating` is computed over stored tenths and rounded to one
/// decimal, so it never shows precision the ratings do not carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub total_feedbacks: i64,
    pub average_rating: f64,
}

/// Port for writing feedback records and reading aggregates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Persist one feedback record.
    async fn insert(&self, feedback: &Feedback) -> Result<(), FeedbackRepositoryError>;

    /// Per-category totals and average ratings, ordered by category.
    async fn summary_by_category(
        &self,
    ) -> Result<Vec<CategorySummary>, FeedbackRepositoryError>;

    /// The most recent records, newest first, at most `limit` rows.
    async fn recent(&self, limit: i64) -> Result<Vec<Feedback>, FeedbackRepositoryError>;
}

/// Round an average expressed in tenths back to one decimal.
pub(crate) fn average_rating_from_tenths(total_tenths: i64, count: i64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let mean_tenths = total_tenths as f64 / count as f64;
    (mean_tenths).round() / 10.0
}

/// In-memory feedback store used when no database is configured and in tests.
#[derive(Debug, Default)]
pub struct FixtureFeedbackRepository {
    records: Mutex<Vec<Feedback>>,
}

impl FixtureFeedbackRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Feedback>>, FeedbackRepositoryError> {
        self.records
            .lock()
            .map_err(|_| FeedbackRepositoryError::query("feedback store lock poisoned"))
    }
}

#[async_trait]
impl FeedbackRepository for FixtureFeedbackRepository {
    async fn insert(&self, feedback: &Feedback) -> Result<(), FeedbackRepositoryError> {
        self.lock()?.push(feedback.clone());
        Ok(())
    }

    async fn summary_by_category(
        &self,
    ) -> Result<Vec<CategorySummary>, FeedbackRepositoryError> {
        let records = self.lock()?;
        let mut by_category: Vec<(String, i64, i64)> = Vec::new();
        for record in records.iter() {
            let category = record.category.as_ref();
            match by_category
                .iter_mut()
                .find(|(existing, _, _)| existing == category)
            {
                Some((_, count, total)) => {
                    *count += 1;
                    *total += i64::from(record.rating.tenths());
                }
                None => by_category.push((
                    category.to_owned(),
                    1,
                    i64::from(record.rating.tenths()),
                )),
            }
        }
        let mut rows: Vec<CategorySummary> = by_category
            .into_iter()
            .map(|(category, count, total)| CategorySummary {
                category,
                total_feedbacks: count,
                average_rating: average_rating_from_tenths(total, count),
            })
            .collect();
        rows.sort_by(|a, b| a.category.cmp(&b.category));
        Ok(rows)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<Feedback>, FeedbackRepositoryError> {
        let records = self.lock()?;
        let mut all: Vec<Feedback> = records.clone();
        all.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        all.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::{Duration, TimeZone, Utc};
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;
    use crate::domain::feedback::{FeedbackCategory, Rating};

    fn record(category: &str, tenths: i16, submitted_at: chrono::DateTime<Utc>) -> Feedback {
        Feedback {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            category: FeedbackCategory::new(category).expect("valid category"),
            rating: Rating::from_tenths(tenths).expect("valid rating"),
            feedback_text: None,
            submitted_at,
        }
    }

    #[rstest]
    #[case(0, 0, 0.0)]
    #[case(85, 1, 8.5)]
    // 8.5 and 8.6 average to 8.55 tenths, displayed as 8.6 after rounding.
    #[case(171, 2, 8.6)]
    fn average_rounds_to_one_decimal(
        #[case] total_tenths: i64,
        #[case] count: i64,
        #[case] expected: f64,
    ) {
        assert!((average_rating_from_tenths(total_tenths, count) - expected).abs() < 1e-9);
    }

    #[rstest]
    #[tokio::test]
    async fn summary_groups_by_category() {
        let repo = FixtureFeedbackRepository::new();
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single().expect("ts");
        repo.insert(&record("usability", 80, now)).await.expect("insert");
        repo.insert(&record("usability", 90, now)).await.expect("insert");
        repo.insert(&record("performance", 40, now)).await.expect("insert");

        let summary = repo.summary_by_category().await.expect("summary");
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].category, "performance");
        assert!((summary[0].average_rating - 4.0).abs() < 1e-9);
        assert_eq!(summary[1].category, "usability");
        assert_eq!(summary[1].total_feedbacks, 2);
        assert!((summary[1].average_rating - 8.5).abs() < 1e-9);
    }

    #[rstest]
    #[tokio::test]
    async fn recent_returns_newest_first_up_to_limit() {
        let repo = FixtureFeedbackRepository::new();
        let base = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single().expect("ts");
        for offset in 0..12 {
            repo.insert(&record("usability", 50, base + Duration::minutes(offset)))
                .await
                .expect("insert");
        }

        let recent = repo.recent(10).await.expect("recent");
        assert_eq!(recent.len(), 10);
        assert!(recent.windows(2).all(|w| w[0].submitted_at >= w[1].submitted_at));
    }
}
