//! Authentication handlers: register, login, logout.
//!
//! ```text
//! POST /api/v1/auth/register {"username":"ada","email":"ada@example.com","password":"..."}
//! POST /api/v1/auth/login {"username":"admin","password":"password"}
//! POST /api/v1/auth/logout
//! ```

use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::{AuthenticatedUser, CredentialsValidationError, LoginCredentials};
use crate::domain::user::{NewUser, User};
use crate::domain::Error;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::map_user_validation_error;
use crate::inbound::http::ApiResult;

/// Login request body.
#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = CredentialsValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(value.username, value.password)
    }
}

/// Registration request body. The password is shape-checked and discarded;
/// credential storage is delegated to the identity subsystem.
#[derive(Debug, Deserialize, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

fn map_credentials_validation_error(err: CredentialsValidationError) -> Error {
    match err {
        CredentialsValidationError::EmptyUsername => {
            Error::invalid_request("username must not be empty")
                .with_details(json!({ "field": "username", "code": "empty_username" }))
        }
        CredentialsValidationError::EmptyPassword => {
            Error::invalid_request("password must not be empty")
                .with_details(json!({ "field": "password", "code": "empty_password" }))
        }
    }
}

/// Create a member account and establish a session.
#[post("/auth/register")]
pub async fn register(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        username,
        email,
        password,
        first_name,
        last_name,
    } = payload.into_inner();
    if password.trim().is_empty() {
        return Err(map_credentials_validation_error(
            CredentialsValidationError::EmptyPassword,
        ));
    }
    let draft = NewUser::member(username, email, first_name, last_name)
        .map_err(map_user_validation_error)?;
    let user: User = state.users.insert(draft).await?;
    session.persist_identity(&AuthenticatedUser {
        user_id: user.id,
        role: user.role,
    })?;
    Ok(HttpResponse::Created().json(user))
}

/// Authenticate credentials and establish a session.
#[post("/auth/login")]
pub async fn login(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload.into_inner())
        .map_err(map_credentials_validation_error)?;
    let identity = state.login.authenticate(&credentials).await?;
    session.persist_identity(&identity)?;
    Ok(HttpResponse::Ok().finish())
}

/// End the session.
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    session.clear();
    Ok(HttpResponse::Ok().finish())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, web, App};
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::ports::{
        FixtureLoginService, FixtureUserRepository, MockAnalyticsQuery, MockIngestionCommand,
    };

    fn test_state() -> web::Data<HttpState> {
        web::Data::new(HttpState::new(
            Arc::new(FixtureLoginService),
            Arc::new(FixtureUserRepository::new()),
            Arc::new(MockAnalyticsQuery::new()),
            Arc::new(MockIngestionCommand::new()),
        ))
    }

    fn test_app(
        state: web::Data<HttpState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(state)
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .service(
                web::scope("/api/v1")
                    .service(register)
                    .service(login)
                    .service(logout),
            )
    }

    fn register_body(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: "secret".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
        }
    }

    #[actix_web::test]
    async fn register_creates_a_member_and_sets_a_session_cookie() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/register")
                .set_json(register_body("ada", "ada@example.com"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        assert!(res
            .response()
            .cookies()
            .any(|cookie| cookie.name() == "session"));
        let body = actix_test::read_body(res).await;
        let value: Value = serde_json::from_slice(&body).expect("user json");
        assert_eq!(value.get("username").and_then(Value::as_str), Some("ada"));
        assert_eq!(value.get("role").and_then(Value::as_str), Some("member"));
        assert!(value.get("password").is_none());
    }

    #[actix_web::test]
    async fn register_rejects_duplicate_email() {
        let state = test_state();
        let app = actix_test::init_service(test_app(state)).await;
        let first = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/register")
                .set_json(register_body("ada", "ada@example.com"))
                .to_request(),
        )
        .await;
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/register")
                .set_json(register_body("ada2", "ada@example.com"))
                .to_request(),
        )
        .await;
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
        let body = actix_test::read_body(second).await;
        let value: Value = serde_json::from_slice(&body).expect("error json");
        assert_eq!(
            value.get("message").and_then(Value::as_str),
            Some("Email is already in use")
        );
    }

    #[rstest]
    #[case("", "secret", "empty_username")]
    #[case("admin", "   ", "empty_password")]
    #[actix_web::test]
    async fn login_rejects_blank_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected_code: &str,
    ) {
        let app = actix_test::init_service(test_app(test_state())).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(LoginRequest {
                    username: username.into(),
                    password: password.into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = actix_test::read_body(res).await;
        let value: Value = serde_json::from_slice(&body).expect("error json");
        let details = value.get("details").expect("details");
        assert_eq!(
            details.get("code").and_then(Value::as_str),
            Some(expected_code)
        );
    }

    #[actix_web::test]
    async fn login_rejects_wrong_credentials() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(LoginRequest {
                    username: "admin".into(),
                    password: "wrong".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn login_succeeds_with_fixture_credentials() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(LoginRequest {
                    username: "admin".into(),
                    password: "password".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res
            .response()
            .cookies()
            .any(|cookie| cookie.name() == "session"));
    }

    #[actix_web::test]
    async fn logout_clears_the_session() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let login_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(LoginRequest {
                    username: "admin".into(),
                    password: "password".into(),
                })
                .to_request(),
        )
        .await;
        let cookie = login_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned();

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        // Purging rewrites the cookie with an empty value.
        let cleared = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie rewritten");
        assert!(cleared.value().is_empty());
    }
}
