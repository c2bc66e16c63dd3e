//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::user::{Email, NewUser, User, Username};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    map_basic_pool_error(error, UserRepositoryError::connection)
}

/// Map Diesel errors, translating unique violations on the username and
/// email indexes into the dedicated duplicate variants.
fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &error {
        let constraint = info.constraint_name().unwrap_or_default();
        if constraint.contains("email") {
            return UserRepositoryError::duplicate_email();
        }
        if constraint.contains("username") {
            return UserRepositoryError::duplicate_username();
        }
    }
    map_basic_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

/// Convert a database row into a validated domain user.
pub(crate) fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    let UserRow {
        id,
        username,
        email,
        first_name,
        last_name,
        role,
        created_at,
    } = row;

    Ok(User {
        id,
        username: Username::new(username)
            .map_err(|err| UserRepositoryError::query(err.to_string()))?,
        email: Email::new(email).map_err(|err| UserRepositoryError::query(err.to_string()))?,
        first_name,
        last_name,
        role: role
            .parse()
            .map_err(|_| UserRepositoryError::query(format!("unknown role: {role}")))?,
        created_at,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, new_user: NewUser) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let role = new_user.role.to_string();
        let new_row = NewUserRow {
            id: Uuid::new_v4(),
            username: new_user.username.as_ref(),
            email: new_user.email.as_ref(),
            first_name: &new_user.first_name,
            last_name: &new_user.last_name,
            role: &role,
            created_at: Utc::now(),
        };

        let row: UserRow = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_user(row)
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .order((users::created_at.asc(), users::id.asc()))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_user).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::id.eq(id))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::username.eq(username))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping and row conversion edge cases.

    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::user::Role;

    #[fixture]
    fn valid_row() -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            username: "ada".to_owned(),
            email: "ada@example.com".to_owned(),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            role: "admin".to_owned(),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let pool_err = PoolError::checkout("connection refused");
        let repo_err = map_pool_error(pool_err);

        assert!(matches!(repo_err, UserRepositoryError::Connection { .. }));
        assert!(repo_err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn diesel_not_found_maps_to_query_error() {
        let repo_err = map_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(repo_err, UserRepositoryError::Query { .. }));
    }

    #[rstest]
    fn row_conversion_builds_a_domain_user(valid_row: UserRow) {
        let user = row_to_user(valid_row).expect("valid row converts");
        assert_eq!(user.username.as_ref(), "ada");
        assert_eq!(user.role, Role::Admin);
    }

    #[rstest]
    fn row_conversion_rejects_unknown_roles(mut valid_row: UserRow) {
        valid_row.role = "root".to_owned();

        let error = row_to_user(valid_row).expect_err("unknown role rejected");
        assert!(matches!(error, UserRepositoryError::Query { .. }));
        assert!(error.to_string().contains("unknown role"));
    }

    #[rstest]
    fn row_conversion_rejects_corrupt_usernames(mut valid_row: UserRow) {
        valid_row.username = "spaced name".to_owned();

        let error = row_to_user(valid_row).expect_err("corrupt username rejected");
        assert!(matches!(error, UserRepositoryError::Query { .. }));
    }
}
