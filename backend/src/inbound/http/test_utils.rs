//! Shared scaffolding for handler tests.

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::Key;

/// Cookie-session middleware matching the server's session contract.
///
/// Carries the `session` cookie name the handlers look for, signed with a
/// throwaway key, and leaves `Secure` off so plain-HTTP test requests can
/// round-trip the cookie.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}
