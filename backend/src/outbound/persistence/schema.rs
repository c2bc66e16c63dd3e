//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation. `diesel print-schema` can regenerate them from a live
//! database after a migration changes the schema.

diesel::table! {
    /// User accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique account handle (max 32 characters).
        username -> Varchar,
        /// Unique contact address.
        email -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        /// Authorisation tier: `member` or `admin`.
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Trackable product features (reference data).
    features (id) {
        id -> Uuid,
        /// Unique feature name (max 100 characters).
        name -> Varchar,
        description -> Text,
        category -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Recorded interaction events.
    interactions (id) {
        id -> Uuid,
        user_id -> Uuid,
        feature_id -> Uuid,
        /// One of `click`, `hover`, `focus`, `scroll`.
        interaction_type -> Varchar,
        occurred_at -> Timestamptz,
        duration_seconds -> Int4,
        additional_metadata -> Nullable<Jsonb>,
    }
}

diesel::table! {
    /// Submitted feedback records.
    feedback (id) {
        id -> Uuid,
        user_id -> Uuid,
        category -> Varchar,
        /// Rating stored as tenths (0..=99) so averages stay exact.
        rating -> Int2,
        feedback_text -> Nullable<Text>,
        submitted_at -> Timestamptz,
    }
}

diesel::joinable!(interactions -> users (user_id));
diesel::joinable!(interactions -> features (feature_id));
diesel::joinable!(feedback -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, features, interactions, feedback);
