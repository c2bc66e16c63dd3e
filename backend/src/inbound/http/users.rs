//! User account handlers.
//!
//! ```text
//! GET /api/v1/users
//! POST /api/v1/users {"username":"ada","email":"ada@example.com"}
//! GET /api/v1/users/{id}
//! ```

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::user::{NewUser, Role, User, UserValidationError};
use crate::domain::Error;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Request body for `POST /api/v1/users`.
#[derive(Debug, Deserialize, Serialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: Option<Role>,
}

pub(crate) fn map_user_validation_error(err: UserValidationError) -> Error {
    let (field, code) = match err {
        UserValidationError::EmptyUsername => ("username", "empty_username"),
        UserValidationError::UsernameTooShort { .. } => ("username", "username_too_short"),
        UserValidationError::UsernameTooLong { .. } => ("username", "username_too_long"),
        UserValidationError::UsernameInvalidCharacters => {
            ("username", "username_invalid_characters")
        }
        UserValidationError::EmptyEmail => ("email", "empty_email"),
        UserValidationError::InvalidEmail => ("email", "invalid_email"),
    };
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": field, "code": code }))
}

/// List known accounts, oldest first.
#[get("/users")]
pub async fn list_users(
    session: SessionContext,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<User>>> {
    session.require_user()?;
    let users = state.users.list().await?;
    Ok(web::Json(users))
}

/// Create an account.
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let CreateUserRequest {
        username,
        email,
        first_name,
        last_name,
        role,
    } = payload.into_inner();
    let draft = NewUser::member(username, email, first_name, last_name)
        .map_err(map_user_validation_error)?
        .with_role(role.unwrap_or(Role::Member));
    let user = state.users.insert(draft).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Fetch one account by id.
#[get("/users/{id}")]
pub async fn get_user(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<User>> {
    session.require_user()?;
    let id = path.into_inner();
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::not_found("User not found"))?;
    Ok(web::Json(user))
}
