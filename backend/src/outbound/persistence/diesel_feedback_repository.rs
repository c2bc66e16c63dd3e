//! PostgreSQL-backed `FeedbackRepository` implementation using Diesel ORM.
//!
//! Ratings are stored as tenths in an `int2` column; the per-category
//! summary sums those tenths in SQL and converts to a one-decimal average
//! on the way out, so no floating-point error accumulates in the database.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::feedback::{Feedback, FeedbackCategory, Rating};
use crate::domain::ports::{
    average_rating_from_tenths, CategorySummary, FeedbackRepository, FeedbackRepositoryError,
};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{CategorySummaryRow, FeedbackRow, NewFeedbackRow};
use super::pool::{DbPool, PoolError};
use super::schema::feedback;

/// Diesel-backed implementation of the feedback repository port.
#[derive(Clone)]
pub struct DieselFeedbackRepository {
    pool: DbPool,
}

impl DieselFeedbackRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> FeedbackRepositoryError {
    map_basic_pool_error(error, FeedbackRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> FeedbackRepositoryError {
    map_basic_diesel_error(
        error,
        FeedbackRepositoryError::query,
        FeedbackRepositoryError::connection,
    )
}

/// Convert a database row into a validated domain feedback record.
fn row_to_feedback(row: FeedbackRow) -> Result<Feedback, FeedbackRepositoryError> {
    let FeedbackRow {
        id,
        user_id,
        category,
        rating,
        feedback_text,
        submitted_at,
    } = row;

    Ok(Feedback {
        id,
        user_id,
        category: FeedbackCategory::new(category)
            .map_err(|err| FeedbackRepositoryError::query(err.to_string()))?,
        rating: Rating::from_tenths(rating)
            .map_err(|err| FeedbackRepositoryError::query(err.to_string()))?,
        feedback_text,
        submitted_at,
    })
}

#[async_trait]
impl FeedbackRepository for DieselFeedbackRepository {
    async fn insert(&self, record: &Feedback) -> Result<(), FeedbackRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewFeedbackRow {
            id: record.id,
            user_id: record.user_id,
            category: record.category.as_ref(),
            rating: record.rating.tenths(),
            feedback_text: record.feedback_text.as_deref(),
            submitted_at: record.submitted_at,
        };

        diesel::insert_into(feedback::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn summary_by_category(
        &self,
    ) -> Result<Vec<CategorySummary>, FeedbackRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CategorySummaryRow> = diesel::sql_query(
            "SELECT category, \
                    COUNT(*) AS total_feedbacks, \
                    SUM(rating)::int8 AS total_tenths \
             FROM feedback \
             GROUP BY category \
             ORDER BY category ASC",
        )
        .load(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|row| CategorySummary {
                category: row.category,
                total_feedbacks: row.total_feedbacks,
                average_rating: average_rating_from_tenths(row.total_tenths, row.total_feedbacks),
            })
            .collect())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<Feedback>, FeedbackRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<FeedbackRow> = feedback::table
            .order((feedback::submitted_at.desc(), feedback::id.desc()))
            .limit(limit)
            .select(FeedbackRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_feedback).collect()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversion edge cases.

    use chrono::Utc;
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    use super::*;

    #[fixture]
    fn valid_row() -> FeedbackRow {
        FeedbackRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            category: "usability".to_owned(),
            rating: 85,
            feedback_text: Some("Smooth experience".to_owned()),
            submitted_at: Utc::now(),
        }
    }

    #[rstest]
    fn row_conversion_builds_a_domain_record(valid_row: FeedbackRow) {
        let record = row_to_feedback(valid_row).expect("valid row converts");
        assert_eq!(record.category.as_ref(), "usability");
        assert_eq!(record.rating.tenths(), 85);
    }

    #[rstest]
    fn row_conversion_rejects_out_of_range_ratings(mut valid_row: FeedbackRow) {
        valid_row.rating = 120;

        let error = row_to_feedback(valid_row).expect_err("out-of-range rating rejected");
        assert!(matches!(error, FeedbackRepositoryError::Query { .. }));
    }

    #[rstest]
    fn row_conversion_rejects_blank_categories(mut valid_row: FeedbackRow) {
        valid_row.category = String::new();

        let error = row_to_feedback(valid_row).expect_err("blank category rejected");
        assert!(matches!(error, FeedbackRepositoryError::Query { .. }));
    }
}
