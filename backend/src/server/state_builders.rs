//! Builders for the HTTP state ports with fixture fallbacks.
//!
//! A configured database pool selects the Diesel-backed repositories; without
//! one the server runs entirely on the in-memory fixtures, which is how the
//! integration tests and local demos operate.

use std::sync::Arc;

use actix_web::web;
use async_trait::async_trait;

use crate::domain::feature::FeatureName;
use crate::domain::ports::{
    AnalyticsCache, AuthenticatedUser, FeatureRepository, FeedbackRepository,
    FixtureFeatureRepository, FixtureFeedbackRepository, FixtureInteractionRepository,
    FixtureLoginService, FixtureUserRepository, InteractionRepository, LoginCredentials,
    LoginService, UserRepository, FIXTURE_ADMIN_ID,
};
use crate::domain::{AnalyticsService, Error, IngestionService};
use crate::inbound::http::state::HttpState;
use crate::outbound::cache::MemoryAnalyticsCache;
use crate::outbound::persistence::{
    DieselFeatureRepository, DieselFeedbackRepository, DieselInteractionRepository,
    DieselUserRepository,
};

use super::ServerConfig;

const FIXTURE_LOGIN_USERNAME: &str = "admin";
const FIXTURE_LOGIN_PASSWORD: &str = "password";

/// Login adapter for database-backed deployments.
///
/// Keeps the fixture credential contract until credential persistence lands,
/// but resolves the admin identity from the user repository so sessions
/// carry a real account id when one exists.
#[derive(Clone)]
struct RepositoryLoginService {
    users: Arc<dyn UserRepository>,
}

impl RepositoryLoginService {
    fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl LoginService for RepositoryLoginService {
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedUser, Error> {
        if credentials.username() != FIXTURE_LOGIN_USERNAME
            || credentials.password() != FIXTURE_LOGIN_PASSWORD
        {
            return Err(Error::unauthorized("invalid credentials"));
        }
        let stored = self
            .users
            .find_by_username(FIXTURE_LOGIN_USERNAME)
            .await
            .map_err(Error::from)?;
        match stored {
            Some(user) => Ok(AuthenticatedUser {
                user_id: user.id,
                role: user.role,
            }),
            None => FixtureLoginService.authenticate(credentials).await,
        }
    }
}

/// Features seeded into the fixture store so ingestion works out of the box.
fn seeded_fixture_features() -> FixtureFeatureRepository {
    let entries = [
        ("dashboard", "navigation"),
        ("search", "discovery"),
        ("reports", "insights"),
    ]
    .into_iter()
    .filter_map(|(name, category)| FeatureName::new(name).ok().map(|name| (name, category)));
    FixtureFeatureRepository::with_features(entries)
}

struct Repositories {
    users: Arc<dyn UserRepository>,
    features: Arc<dyn FeatureRepository>,
    interactions: Arc<dyn InteractionRepository>,
    feedback: Arc<dyn FeedbackRepository>,
    login: Arc<dyn LoginService>,
}

fn build_repositories(config: &ServerConfig) -> Repositories {
    match &config.db_pool {
        Some(pool) => {
            let users: Arc<dyn UserRepository> =
                Arc::new(DieselUserRepository::new(pool.clone()));
            Repositories {
                users: users.clone(),
                features: Arc::new(DieselFeatureRepository::new(pool.clone())),
                interactions: Arc::new(DieselInteractionRepository::new(pool.clone())),
                feedback: Arc::new(DieselFeedbackRepository::new(pool.clone())),
                login: Arc::new(RepositoryLoginService::new(users)),
            }
        }
        None => {
            let users: Arc<dyn UserRepository> = Arc::new(FixtureUserRepository::new());
            Repositories {
                users: users.clone(),
                features: Arc::new(seeded_fixture_features()),
                interactions: Arc::new(FixtureInteractionRepository::new(users)),
                feedback: Arc::new(FixtureFeedbackRepository::new()),
                login: Arc::new(FixtureLoginService),
            }
        }
    }
}

fn build_cache(config: &ServerConfig) -> Arc<dyn AnalyticsCache> {
    match &config.redis_cache {
        Some(cache) => Arc::new(cache.clone()),
        None => Arc::new(MemoryAnalyticsCache::new()),
    }
}

/// Build the shared HTTP state from configured ports and fixture fallbacks.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let Repositories {
        users,
        features,
        interactions,
        feedback,
        login,
    } = build_repositories(config);
    let cache = build_cache(config);
    let clock: Arc<dyn mockable::Clock> = Arc::new(mockable::DefaultClock);

    let analytics = Arc::new(AnalyticsService::new(
        interactions.clone(),
        feedback.clone(),
        users.clone(),
        cache.clone(),
        clock.clone(),
    ));
    let ingestion = Arc::new(IngestionService::new(
        interactions,
        feedback,
        features,
        cache,
        clock,
    ));

    web::Data::new(HttpState::new(login, users, analytics, ingestion))
}
