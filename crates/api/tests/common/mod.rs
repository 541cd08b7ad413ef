#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::{Duration, NaiveDate, Utc};
use http_body_util::BodyExt;
use tablebook_api::auth::jwt::{generate_access_token, JwtConfig};
use tablebook_api::config::{BookingConfig, ServerConfig};
use tablebook_api::router::build_app_router;
use tablebook_api::state::AppState;
use tablebook_core::types::DbId;
use tablebook_db::DbPool;
use tablebook_events::EventBus;
use tower::ServiceExt;

/// Seeded account ids, in seeding order.
pub const CUSTOMER_ID: DbId = 1;
pub const MANAGER_ID: DbId = 2;
pub const ADMIN_ID: DbId = 3;

/// Seeded listing that is open every day.
pub const BELLA_ITALIA: DbId = 1;
/// Seeded listing that is still awaiting approval.
pub const URBAN_GRILL: DbId = 7;

/// Build a test `ServerConfig` with safe defaults and no payment delay.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        seed_demo_data: false,
        sweep_interval_secs: 300,
        jwt: JwtConfig::with_secret("tablebook-integration-test-secret"),
        booking: BookingConfig {
            processing_delay_ms: 0,
            ..BookingConfig::default()
        },
    }
}

pub fn test_state(pool: DbPool, config: ServerConfig) -> AppState {
    AppState {
        pool,
        config: Arc::new(config),
        event_bus: Arc::new(EventBus::default()),
    }
}

/// The production router over `pool`, using [`test_config`].
pub fn build_test_app(pool: DbPool) -> Router {
    let config = test_config();
    build_app_router(test_state(pool, config.clone()), &config)
}

/// A store loaded with the demo catalogue. The accounts get a dummy password
/// hash; tests sign in with [`token_for`] instead.
pub async fn seeded_pool() -> DbPool {
    let pool = tablebook_db::create_pool();
    tablebook_db::seed::seed_demo_data(&pool, "unused-hash")
        .await
        .expect("seeding should succeed");
    pool
}

/// Access token for a seeded account, signed with the test secret.
pub fn token_for(user_id: DbId, role: &str) -> String {
    generate_access_token(user_id, &[role.to_string()], &test_config().jwt)
        .expect("token should sign")
}

pub fn customer_token() -> String {
    token_for(CUSTOMER_ID, "customer")
}

pub fn manager_token() -> String {
    token_for(MANAGER_ID, "restaurant")
}

pub fn admin_token() -> String {
    token_for(ADMIN_ID, "admin")
}

/// A date a month out, so slots are never in the past.
pub fn future_date() -> NaiveDate {
    Utc::now().date_naive() + Duration::days(30)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn put_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), None).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
