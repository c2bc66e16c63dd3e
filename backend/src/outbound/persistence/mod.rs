//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the repository ports backed by PostgreSQL via
//! Diesel with async support through `diesel-async` and `bb8` pooling.
//!
//! The adapters stay thin: they translate between Diesel rows and domain
//! types, map database errors to port error types, and nothing else. Row
//! structs (`models.rs`) and schema definitions (`schema.rs`) are internal
//! and never exposed to the domain layer.

mod diesel_error_mapping;
mod diesel_feature_repository;
mod diesel_feedback_repository;
mod diesel_interaction_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_feature_repository::DieselFeatureRepository;
pub use diesel_feedback_repository::DieselFeedbackRepository;
pub use diesel_interaction_repository::DieselInteractionRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
