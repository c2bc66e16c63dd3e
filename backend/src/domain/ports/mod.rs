//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod analytics_cache;
mod analytics_query;
mod cache_key;
mod feature_repository;
mod feedback_repository;
mod ingestion_command;
mod interaction_repository;
mod login_service;
mod user_repository;

#[cfg(test)]
pub use analytics_cache::MockAnalyticsCache;
pub use analytics_cache::{AnalyticsCache, AnalyticsCacheError, NoOpAnalyticsCache};
#[cfg(test)]
pub use analytics_query::MockAnalyticsQuery;
pub use analytics_query::{AnalyticsQuery, FeedbackAnalytics, InteractionStatistics};
pub use cache_key::{CacheKey, CacheKeyValidationError, CacheNamespace};
#[cfg(test)]
pub use feature_repository::MockFeatureRepository;
pub use feature_repository::{
    FeatureRepository, FeatureRepositoryError, FixtureFeatureRepository,
};
#[cfg(test)]
pub use feedback_repository::MockFeedbackRepository;
pub(crate) use feedback_repository::average_rating_from_tenths;
pub use feedback_repository::{
    CategorySummary, FeedbackRepository, FeedbackRepositoryError, FixtureFeedbackRepository,
};
#[cfg(test)]
pub use ingestion_command::MockIngestionCommand;
pub use ingestion_command::IngestionCommand;
#[cfg(test)]
pub use interaction_repository::MockInteractionRepository;
pub use interaction_repository::{
    ActiveUser, FeatureUsage, FixtureInteractionRepository, InteractionRepository,
    InteractionRepositoryError, KindCount,
};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{
    AuthenticatedUser, CredentialsValidationError, FixtureLoginService, LoginCredentials,
    LoginService, FIXTURE_ADMIN_ID,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserRepository, UserRepositoryError};
