//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Double, Text};
use uuid::Uuid;

use super::schema::{features, feedback, interactions, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub role: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the features table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = features)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FeatureRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the interactions table.
///
/// The feature name lives on the joined features table; reads select this
/// row together with `features::name`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = interactions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct InteractionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub interaction_type: String,
    pub occurred_at: DateTime<Utc>,
    pub duration_seconds: i32,
    pub additional_metadata: Option<serde_json::Value>,
}

/// Insertable struct for creating new interaction records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = interactions)]
pub(crate) struct NewInteractionRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub feature_id: Uuid,
    pub interaction_type: &'a str,
    pub occurred_at: DateTime<Utc>,
    pub duration_seconds: i32,
    pub additional_metadata: Option<&'a serde_json::Value>,
}

/// Row struct for reading from the feedback table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = feedback)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FeedbackRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: String,
    pub rating: i16,
    pub feedback_text: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Insertable struct for creating new feedback records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = feedback)]
pub(crate) struct NewFeedbackRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: &'a str,
    pub rating: i16,
    pub feedback_text: Option<&'a str>,
    pub submitted_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Aggregate rows loaded via sql_query
// ---------------------------------------------------------------------------

/// Per-kind interaction count aggregate.
#[derive(Debug, QueryableByName)]
pub(crate) struct KindCountRow {
    #[diesel(sql_type = Text)]
    pub interaction_type: String,
    #[diesel(sql_type = BigInt)]
    pub count: i64,
}

/// Per-feature usage aggregate.
#[derive(Debug, QueryableByName)]
pub(crate) struct FeatureUsageRow {
    #[diesel(sql_type = Text)]
    pub feature_name: String,
    #[diesel(sql_type = BigInt)]
    pub interaction_count: i64,
    #[diesel(sql_type = Double)]
    pub avg_duration: f64,
}

/// Per-user interaction count aggregate.
#[derive(Debug, QueryableByName)]
pub(crate) struct ActiveUserRow {
    #[diesel(sql_type = Text)]
    pub username: String,
    #[diesel(sql_type = BigInt)]
    pub interaction_count: i64,
}

/// Per-category feedback aggregate. Rating totals stay in tenths; the
/// adapter converts them to a one-decimal average.
#[derive(Debug, QueryableByName)]
pub(crate) struct CategorySummaryRow {
    #[diesel(sql_type = Text)]
    pub category: String,
    #[diesel(sql_type = BigInt)]
    pub total_feedbacks: i64,
    #[diesel(sql_type = BigInt)]
    pub total_tenths: i64,
}
