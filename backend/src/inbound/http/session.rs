//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations: persisting the verified identity, requiring a
//! user, or requiring an admin.

use actix_session::Session;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use uuid::Uuid;

use crate::domain::ports::AuthenticatedUser;
use crate::domain::user::Role;
use crate::domain::Error;

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const ROLE_KEY: &str = "role";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the verified identity in the session cookie.
    pub fn persist_identity(&self, identity: &AuthenticatedUser) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, identity.user_id.to_string())
            .and_then(|()| self.0.insert(ROLE_KEY, identity.role.to_string()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Drop all session state, ending the login.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// Fetch the current identity from the session, if present.
    ///
    /// A cookie that decodes but carries an unparseable id or role is
    /// treated as unauthenticated rather than an error.
    pub fn identity(&self) -> Result<Option<AuthenticatedUser>, Error> {
        let read = |key: &str| {
            self.0
                .get::<String>(key)
                .map_err(|error| Error::internal(format!("failed to read session: {error}")))
        };
        let (Some(raw_id), Some(raw_role)) = (read(USER_ID_KEY)?, read(ROLE_KEY)?) else {
            return Ok(None);
        };
        let Ok(user_id) = Uuid::parse_str(&raw_id) else {
            tracing::warn!("invalid user id in session cookie");
            return Ok(None);
        };
        let Ok(role) = raw_role.parse::<Role>() else {
            tracing::warn!("invalid role in session cookie");
            return Ok(None);
        };
        Ok(Some(AuthenticatedUser { user_id, role }))
    }

    /// Require an authenticated identity or return `401 Unauthorized`.
    pub fn require_user(&self) -> Result<AuthenticatedUser, Error> {
        self.identity()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Require an admin identity. `401` when unauthenticated, `403` when
    /// authenticated without the admin role.
    pub fn require_admin(&self) -> Result<AuthenticatedUser, Error> {
        let identity = self.require_user()?;
        if identity.role != Role::Admin {
            return Err(Error::forbidden("admin access required"));
        }
        Ok(identity)
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
