//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AnalyticsQuery, IngestionCommand, LoginService, UserRepository};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UserRepository>,
    pub analytics: Arc<dyn AnalyticsQuery>,
    pub ingestion: Arc<dyn IngestionCommand>,
}

impl HttpState {
    pub fn new(
        login: Arc<dyn LoginService>,
        users: Arc<dyn UserRepository>,
        analytics: Arc<dyn AnalyticsQuery>,
        ingestion: Arc<dyn IngestionCommand>,
    ) -> Self {
        Self {
            login,
            users,
            analytics,
            ingestion,
        }
    }
}
