//! End-to-end exercises of the account endpoints and health probes against
//! the fixture-backed application stack.

use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::http::StatusCode;
use actix_web::{test as actix_test, web};
use serde_json::{json, Value};

use backend::inbound::http::health::HealthState;
use backend::server::{build_app, build_state, AppDependencies, ServerConfig};

fn fixture_config() -> ServerConfig {
    let bind_addr = "127.0.0.1:0".parse().expect("valid bind addr");
    ServerConfig::new(Key::generate(), false, SameSite::Lax, bind_addr)
}

fn app_dependencies(health_state: web::Data<HealthState>) -> AppDependencies {
    let config = fixture_config();
    AppDependencies {
        health_state,
        http_state: build_state(&config),
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    }
}

fn session_cookie(res: &actix_web::dev::ServiceResponse) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

#[actix_web::test]
async fn register_login_and_list_accounts() {
    let health_state = web::Data::new(HealthState::new());
    let app = actix_test::init_service(build_app(app_dependencies(health_state))).await;

    let registered = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({
                "username": "ada",
                "email": "ada@example.com",
                "password": "secret",
                "first_name": "Ada",
                "last_name": "Lovelace",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(registered.status(), StatusCode::CREATED);
    let cookie = session_cookie(&registered);

    // The fresh session can read the listing straight away.
    let listing = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(listing.status(), StatusCode::OK);
    let body = actix_test::read_body(listing).await;
    let users: Value = serde_json::from_slice(&body).expect("users json");
    let listed = users.as_array().expect("array");
    assert_eq!(listed.len(), 1);
    assert_eq!(
        listed[0].get("username").and_then(Value::as_str),
        Some("ada")
    );
    assert_eq!(listed[0].get("role").and_then(Value::as_str), Some("member"));

    // Logout invalidates the cookie for protected routes.
    let logout = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(logout.status(), StatusCode::OK);
    let cleared = session_cookie(&logout);

    let denied = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users")
            .cookie(cleared)
            .to_request(),
    )
    .await;
    assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn duplicate_registration_is_rejected() {
    let health_state = web::Data::new(HealthState::new());
    let app = actix_test::init_service(build_app(app_dependencies(health_state))).await;

    let body = json!({
        "username": "ada",
        "email": "ada@example.com",
        "password": "secret",
    });
    let first = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(body.clone())
            .to_request(),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(body)
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

#[actix_web::test]
async fn health_probes_track_readiness() {
    let health_state = web::Data::new(HealthState::new());
    let app =
        actix_test::init_service(build_app(app_dependencies(health_state.clone()))).await;

    let not_ready = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/healthz/ready").to_request(),
    )
    .await;
    assert_eq!(not_ready.status(), StatusCode::SERVICE_UNAVAILABLE);

    health_state.mark_ready();
    let ready = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/healthz/ready").to_request(),
    )
    .await;
    assert_eq!(ready.status(), StatusCode::OK);

    let live = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/healthz/live").to_request(),
    )
    .await;
    assert_eq!(live.status(), StatusCode::OK);
}

#[actix_web::test]
async fn error_responses_carry_a_trace_id() {
    let health_state = web::Data::new(HealthState::new());
    let app = actix_test::init_service(build_app(app_dependencies(health_state))).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/users").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().contains_key("trace-id"));
}
