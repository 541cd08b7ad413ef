//! HTTP-level tests for the booking checkout flow.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{body_json, get_auth, post_auth, post_json_auth};
use serde_json::{json, Value};
use tablebook_core::booking::PaymentDetails;
use tablebook_core::error::CoreError;
use tablebook_api::background::reservation_sweeper::sweep_once;
use tablebook_db::repositories::{BookingFlowRepo, ReservationRepo};
use tablebook_db::DbPool;
use tablebook_events::EventBus;

fn card() -> Value {
    json!({
        "cardholder_name": "Casey Customer",
        "card_number": "4242 4242 4242 4242",
        "expiry": "12/30",
        "cvc": "123"
    })
}

async fn start(pool: &DbPool, body: Value) -> Value {
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/bookings",
        &common::customer_token(),
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

async fn step(pool: &DbPool, uri: &str, body: Value) -> axum::response::Response {
    post_json_auth(
        common::build_test_app(pool.clone()),
        uri,
        &common::customer_token(),
        body,
    )
    .await
}

async fn start_at_payment(pool: &DbPool) -> i64 {
    let flow = start(
        pool,
        json!({"restaurant_id": 1, "date": common::future_date(), "time": "19:00"}),
    )
    .await;
    let id = flow["id"].as_i64().unwrap();
    let response = step(
        pool,
        &format!("/api/v1/bookings/{id}/contact"),
        json!({"email": "casey@example.com", "phone": "555-0100"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    id
}

#[tokio::test]
async fn start_fills_in_defaults() {
    let pool = common::seeded_pool().await;
    let flow = start(&pool, json!({"restaurant_id": 1})).await;

    assert_eq!(flow["step"], "collecting_contact");
    assert_eq!(flow["selection"]["restaurant_id"], 1);
    assert_eq!(flow["selection"]["time"], "19:00");
    assert_eq!(flow["selection"]["party_size"], 2);
    assert_eq!(flow["contact"]["email"], "customer@tablebook.dev");
    assert_eq!(flow["user_id"], common::CUSTOMER_ID);
}

#[tokio::test]
async fn start_for_unlisted_restaurant_is_not_found() {
    let pool = common::seeded_pool().await;
    let response = step(
        &pool,
        "/api/v1/bookings",
        json!({"restaurant_id": common::URBAN_GRILL}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_contact_email_stays_on_contact_step() {
    let pool = common::seeded_pool().await;
    let flow = start(&pool, json!({"restaurant_id": 1})).await;
    let id = flow["id"].as_i64().unwrap();

    let response = step(
        &pool,
        &format!("/api/v1/bookings/{id}/contact"),
        json!({"email": "not-an-email"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["fields"][0]["field"], "email");

    let uri = format!("/api/v1/bookings/{id}");
    let json = body_json(
        get_auth(common::build_test_app(pool), &uri, &common::customer_token()).await,
    )
    .await;
    assert_eq!(json["data"]["step"], "collecting_contact");
}

#[tokio::test]
async fn full_checkout_writes_a_reservation() {
    let pool = common::seeded_pool().await;
    let id = start_at_payment(&pool).await;

    let response = step(&pool, &format!("/api/v1/bookings/{id}/payment"), card()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let reservation = &json["data"]["reservation"];
    assert_eq!(reservation["restaurant_id"], 1);
    assert_eq!(reservation["time"], "19:00");
    assert_eq!(reservation["party_size"], 2);
    assert_eq!(reservation["status"], "confirmed");
    assert_eq!(reservation["contact_email"], "casey@example.com");
    let code = reservation["confirmation_code"].as_str().unwrap();
    assert_eq!(code.len(), 8);
    assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));

    let booking = &json["data"]["booking"];
    assert_eq!(booking["step"], "completed");
    assert_eq!(booking["confirmation"]["confirmation_code"], code);
    assert!(booking["processing_since"].is_null());

    // A completed flow cannot be paid for again.
    let response = step(&pool, &format!("/api/v1/bookings/{id}/payment"), card()).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn back_keeps_entered_contact_details() {
    let pool = common::seeded_pool().await;
    let id = start_at_payment(&pool).await;

    let response = post_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/bookings/{id}/back"),
        &common::customer_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["step"], "collecting_contact");
    assert_eq!(json["data"]["contact"]["email"], "casey@example.com");
    assert_eq!(json["data"]["contact"]["phone"], "555-0100");

    // Back from the contact step has nowhere to go.
    let response = post_auth(
        common::build_test_app(pool),
        &format!("/api/v1/bookings/{id}/back"),
        &common::customer_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn blank_card_fields_are_rejected() {
    let pool = common::seeded_pool().await;
    let id = start_at_payment(&pool).await;

    let body = json!({"cardholder_name": "Casey", "card_number": " ", "expiry": "", "cvc": "123"});
    let response = step(&pool, &format!("/api/v1/bookings/{id}/payment"), body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let fields: Vec<&str> = json["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["card_number", "expiry"]);

    // The flow is still payable.
    let response = step(&pool, &format!("/api/v1/bookings/{id}/payment"), card()).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn payment_before_contact_is_a_conflict() {
    let pool = common::seeded_pool().await;
    let flow = start(&pool, json!({"restaurant_id": 1})).await;
    let id = flow["id"].as_i64().unwrap();

    let response = step(&pool, &format!("/api/v1/bookings/{id}/payment"), card()).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn in_flight_payment_blocks_resubmission_and_back() {
    let pool = common::seeded_pool().await;
    let id = start_at_payment(&pool).await;

    let details = PaymentDetails {
        cardholder_name: "Casey".into(),
        card_number: "4242".into(),
        expiry: "12/30".into(),
        cvc: "123".into(),
    };
    BookingFlowRepo::apply(&pool, id, |flow| {
        flow.begin_payment(&details, Utc::now(), Duration::seconds(60))
    })
    .await
    .unwrap()
    .unwrap();

    let response = step(&pool, &format!("/api/v1/bookings/{id}/payment"), card()).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/bookings/{id}/back"),
        &common::customer_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn failed_payment_leaves_flow_retryable() {
    let pool = common::seeded_pool().await;

    // Take the only table for eight at 19:00.
    let direct = json!({
        "restaurant_id": 1,
        "date": common::future_date(),
        "time": "19:00",
        "party_size": 8,
        "contact": {"email": "first@example.com"},
    });
    let response = step(&pool, "/api/v1/reservations", direct).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let flow = start(
        &pool,
        json!({"restaurant_id": 1, "date": common::future_date(), "time": "19:30", "party_size": 8}),
    )
    .await;
    let id = flow["id"].as_i64().unwrap();
    step(
        &pool,
        &format!("/api/v1/bookings/{id}/contact"),
        json!({"email": "second@example.com"}),
    )
    .await;

    let response = step(&pool, &format!("/api/v1/bookings/{id}/payment"), card()).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let record = BookingFlowRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(record.flow.step.as_str(), "collecting_payment");
    assert!(record.flow.processing_since.is_none());
}

#[tokio::test]
async fn other_customers_cannot_see_a_flow() {
    let pool = common::seeded_pool().await;
    let flow = start(&pool, json!({"restaurant_id": 1})).await;
    let id = flow["id"].as_i64().unwrap();

    let stranger = common::token_for(42, "customer");
    let uri = format!("/api/v1/bookings/{id}");
    let response = get_auth(common::build_test_app(pool.clone()), &uri, &stranger).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/bookings/{id}/contact"),
        &stranger,
        json!({"email": "x@example.com"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn apply_on_missing_flow_returns_none() {
    let pool = common::seeded_pool().await;
    let result = BookingFlowRepo::apply(&pool, 999, |_| Ok::<(), CoreError>(())).await;
    assert!(result.unwrap().is_none());
}

#[tokio::test]
async fn sweep_discards_finished_then_abandoned_checkouts() {
    let pool = common::seeded_pool().await;
    let abandoned = start(&pool, json!({"restaurant_id": 1})).await["id"].as_i64().unwrap();
    let finished = start_at_payment(&pool).await;
    let response = step(&pool, &format!("/api/v1/bookings/{finished}/payment"), card()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let config = common::test_config().booking;
    let bus = EventBus::default();
    let now = Utc::now().naive_utc();

    let report = sweep_once(&pool, &bus, &config, now).await.unwrap();
    assert_eq!(report.flows_purged, 0);

    let after_grace = now + config.completed_flow_ttl() + Duration::minutes(1);
    let report = sweep_once(&pool, &bus, &config, after_grace).await.unwrap();
    assert_eq!(report.flows_purged, 1);
    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/bookings/{finished}"),
        &common::customer_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The reservation itself outlives its checkout.
    assert_eq!(ReservationRepo::list(&pool).await.unwrap().len(), 1);

    let after_idle = now + config.flow_idle_ttl() + Duration::minutes(1);
    let report = sweep_once(&pool, &bus, &config, after_idle).await.unwrap();
    assert_eq!(report.flows_purged, 1);
    assert!(BookingFlowRepo::find_by_id(&pool, abandoned).await.unwrap().is_none());
}

#[tokio::test]
async fn slow_payment_times_out_and_stays_retryable() {
    let pool = common::seeded_pool().await;
    let id = start_at_payment(&pool).await;

    let mut config = common::test_config();
    config.booking.processing_delay_ms = 1500;
    config.booking.processing_timeout_secs = 1;
    let slow_app = tablebook_api::router::build_app_router(
        common::test_state(pool.clone(), config.clone()),
        &config,
    );

    let response = post_json_auth(
        slow_app,
        &format!("/api/v1/bookings/{id}/payment"),
        &common::customer_token(),
        card(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["kind"], "transport");
    assert_eq!(json["error"], "Payment processing timed out");

    let record = BookingFlowRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(record.flow.step.as_str(), "collecting_payment");
    assert!(record.flow.processing_since.is_none());
    assert!(ReservationRepo::list(&pool).await.unwrap().is_empty());

    // The normal configuration goes through on retry.
    let response = step(&pool, &format!("/api/v1/bookings/{id}/payment"), card()).await;
    assert_eq!(response.status(), StatusCode::OK);
}
