//! Port for user account persistence.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::user::{NewUser, User};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Another account already uses this email address.
        DuplicateEmail => "Email is already in use",
        /// Another account already uses this username.
        DuplicateUsername => "Username is already in use",
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

impl From<UserRepositoryError> for crate::domain::Error {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::DuplicateEmail | UserRepositoryError::DuplicateUsername => {
                Self::invalid_request(err.to_string())
            }
            UserRepositoryError::Connection { .. } => Self::service_unavailable(err.to_string()),
            UserRepositoryError::Query { .. } => Self::internal(err.to_string()),
        }
    }
}

/// Port for reading and writing user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new account, enforcing username and email uniqueness.
    async fn insert(&self, new_user: NewUser) -> Result<User, UserRepositoryError>;

    /// List every account ordered by creation time.
    async fn list(&self) -> Result<Vec<User>, UserRepositoryError>;

    /// Find an account by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserRepositoryError>;

    /// Find an account by its exact username.
    async fn find_by_username(&self, username: &str)
        -> Result<Option<User>, UserRepositoryError>;
}

/// In-memory repository used when no database is configured and in tests.
#[derive(Debug, Default)]
pub struct FixtureUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

impl FixtureUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repository with pre-built accounts.
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let map = users.into_iter().map(|user| (user.id, user)).collect();
        Self {
            users: Mutex::new(map),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, User>>, UserRepositoryError> {
        self.users
            .lock()
            .map_err(|_| UserRepositoryError::query("user store lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn insert(&self, new_user: NewUser) -> Result<User, UserRepositoryError> {
        let mut users = self.lock()?;
        if users
            .values()
            .any(|existing| existing.email == new_user.email)
        {
            return Err(UserRepositoryError::duplicate_email());
        }
        if users
            .values()
            .any(|existing| existing.username == new_user.username)
        {
            return Err(UserRepositoryError::duplicate_username());
        }
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            role: new_user.role,
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let users = self.lock()?;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.lock()?.get(&id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, UserRepositoryError> {
        Ok(self
            .lock()?
            .values()
            .find(|user| user.username.as_ref() == username)
            .cloned())
    }
}
