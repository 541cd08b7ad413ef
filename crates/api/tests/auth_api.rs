//! HTTP-level tests for registration, login, refresh, logout and role checks.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_auth, post_json, post_json_auth};
use serde_json::json;

async fn register(app: axum::Router, email: &str, role: &str) -> serde_json::Value {
    let body = json!({
        "name": "Dana Diner",
        "email": email,
        "password": "correct-horse",
        "role": role,
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn register_returns_tokens_and_user() {
    let app = common::build_test_app(tablebook_db::create_pool());
    let json = register(app, "Dana@Example.com", "customer").await;

    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["expires_in"], 900);
    assert_eq!(json["user"]["email"], "dana@example.com");
    assert_eq!(json["user"]["roles"], json!(["customer"]));
    assert_eq!(json["user"]["enabled"], true);
    assert!(json["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn register_rejects_admin_role_and_weak_password() {
    let pool = tablebook_db::create_pool();

    let admin = json!({"name": "Eve", "email": "eve@example.com", "password": "long-enough", "role": "admin"});
    let response = post_json(common::build_test_app(pool.clone()), "/api/v1/auth/register", admin).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["fields"][0]["field"], "role");

    let weak = json!({"name": "Eve", "email": "eve@example.com", "password": "short"});
    let response = post_json(common::build_test_app(pool), "/api/v1/auth/register", weak).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["fields"][0]["field"], "password");
}

#[tokio::test]
async fn duplicate_email_is_conflict() {
    let pool = tablebook_db::create_pool();
    register(common::build_test_app(pool.clone()), "dup@example.com", "customer").await;

    let body = json!({"name": "Again", "email": "DUP@example.com", "password": "correct-horse"});
    let response = post_json(common::build_test_app(pool), "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn login_then_refresh_rotates_token() {
    let pool = tablebook_db::create_pool();
    register(common::build_test_app(pool.clone()), "lee@example.com", "restaurant").await;

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/login",
        json!({"email": "lee@example.com", "password": "correct-horse"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let login = body_json(response).await;
    assert_eq!(login["user"]["roles"], json!(["restaurant"]));
    let refresh_token = login["refresh_token"].as_str().unwrap().to_string();

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/refresh",
        json!({"refresh_token": refresh_token}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let refreshed = body_json(response).await;
    assert_ne!(refreshed["refresh_token"], login["refresh_token"]);

    // The old refresh token was revoked by the rotation.
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/auth/refresh",
        json!({"refresh_token": refresh_token}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let pool = tablebook_db::create_pool();
    register(common::build_test_app(pool.clone()), "kim@example.com", "customer").await;

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/auth/login",
        json!({"email": "kim@example.com", "password": "wrong-horse"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Invalid email or password");
}

#[tokio::test]
async fn logout_revokes_refresh_tokens() {
    let pool = tablebook_db::create_pool();
    let json = register(common::build_test_app(pool.clone()), "sam@example.com", "customer").await;
    let access = json["access_token"].as_str().unwrap();

    let response = post_auth(common::build_test_app(pool.clone()), "/api/v1/auth/logout", access).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/auth/refresh",
        json!({"refresh_token": json["refresh_token"]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_need_a_valid_bearer_token() {
    let pool = common::seeded_pool().await;

    let response = get(common::build_test_app(pool.clone()), "/api/v1/reservations").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Missing Authorization header");

    let response = get_auth(common::build_test_app(pool), "/api/v1/reservations", "garbage").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn roles_are_enforced() {
    let pool = common::seeded_pool().await;

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/users",
        &common::customer_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Managers cannot book.
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/bookings",
        &common::manager_token(),
        json!({"restaurant_id": common::BELLA_ITALIA}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/admin/users",
        &common::admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let users = body_json(response).await;
    assert_eq!(users["data"].as_array().unwrap().len(), 3);
    assert!(users["data"][0].get("password_hash").is_none());
}
