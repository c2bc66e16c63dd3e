//! Driving port for login/authentication use-cases.
//!
//! Inbound adapters call this port to authenticate credentials without
//! knowing the backing infrastructure, which keeps HTTP handler tests
//! deterministic.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::user::Role;
use crate::domain::Error;

/// Shape-validated login credentials.
///
/// Password verification is out of scope here; this type only guarantees
/// both fields are present and non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: String,
}

/// Validation errors for credential shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("password must not be empty")]
    EmptyPassword,
}

impl LoginCredentials {
    pub fn try_from_parts(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, CredentialsValidationError> {
        let username = username.into();
        let password = password.into();
        if username.trim().is_empty() {
            return Err(CredentialsValidationError::EmptyUsername);
        }
        if password.trim().is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self { username, password })
    }

    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// The identity a successful login establishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub role: Role,
}

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated identity.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AuthenticatedUser, Error>;
}

/// Fixed user id produced by the fixture admin login.
pub const FIXTURE_ADMIN_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

/// In-memory authenticator used until credential persistence is wired.
///
/// `admin` / `password` authenticates as an admin with a fixed user id;
/// everything else is rejected.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedUser, Error> {
        if credentials.username() == "admin" && credentials.password() == "password" {
            let user_id = Uuid::parse_str(FIXTURE_ADMIN_ID)
                .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))?;
            Ok(AuthenticatedUser {
                user_id,
                role: Role::Admin,
            })
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    #[rstest]
    #[case("", "password", CredentialsValidationError::EmptyUsername)]
    #[case("admin", "  ", CredentialsValidationError::EmptyPassword)]
    fn credentials_reject_blank_parts(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        let err =
            LoginCredentials::try_from_parts(username, password).expect_err("blank rejected");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("admin", "password", true)]
    #[case("admin", "wrong", false)]
    #[case("other", "password", false)]
    #[tokio::test]
    async fn fixture_login_accepts_only_the_contract_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] should_succeed: bool,
    ) {
        let service = FixtureLoginService;
        let creds =
            LoginCredentials::try_from_parts(username, password).expect("credentials shape");
        let result = service.authenticate(&creds).await;
        match (should_succeed, result) {
            (true, Ok(identity)) => {
                assert_eq!(identity.user_id.to_string(), FIXTURE_ADMIN_ID);
                assert_eq!(identity.role, Role::Admin);
            }
            (false, Err(err)) => assert_eq!(err.code(), ErrorCode::Unauthorized),
            (true, Err(err)) => panic!("expected success, got error: {err:?}"),
            (false, Ok(identity)) => panic!("expected failure, got identity: {identity:?}"),
        }
    }
}
