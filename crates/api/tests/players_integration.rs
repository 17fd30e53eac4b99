//! Integration tests for player registration, the roster, and the
//! operational endpoints.
//!
//! Run with: cargo test --test players_integration

mod common;

use axum::http::StatusCode;
use common::{
    get_request, parse_response_body, raw_json_request, registration_body, unique_test_email,
    TestApp,
};
use domain::models::Performance;
use domain::services::MailKind;
use serde_json::json;

fn performance(runs: i32, wickets: i32) -> Performance {
    Performance {
        runs,
        wickets,
        ..Performance::default()
    }
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_register_player_success() {
    let app = TestApp::new();
    let email = unique_test_email();
    let player = app.register_player(&email, "Sachin Tendulkar").await;

    assert!(player.get("id").is_some());
    assert_eq!(player["email"], email);
    assert_eq!(player["fullName"], "Sachin Tendulkar");
    assert_eq!(player["dateOfBirth"], "1973-04-24");
    assert_eq!(player["preferredRole"], "Batsman");
    assert_eq!(player["bowlingStyle"], json!(["Right-arm", "Spin"]));
    assert_eq!(player["isVerified"], true);
    assert_eq!(player["performance"]["runs"], 0);
    assert_eq!(player["createdAt"], json!(common::t0()));
    assert!(player.get("passwordHash").is_none());
    assert!(player.get("password").is_none());

    let welcome = app
        .mailer
        .sent()
        .into_iter()
        .filter(|m| m.to == email && m.kind == MailKind::Welcome)
        .count();
    assert_eq!(welcome, 1);
}

#[tokio::test]
async fn test_register_returns_created() {
    let app = TestApp::with_codes(&["654321"]);
    let email = unique_test_email();
    app.send_otp(&email).await;
    app.verify_otp(&email, "654321").await;

    let response = app.register(registration_body(&email)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_register_without_verification() {
    let app = TestApp::new();
    let email = unique_test_email();
    app.send_otp(&email).await;

    let response = app.register(registration_body(&email)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "not_verified");
    assert_eq!(
        body["message"],
        "Email not verified. Please verify OTP before registering."
    );
}

#[tokio::test]
async fn test_register_without_any_request() {
    let app = TestApp::new();

    let response = app.register(registration_body(&unique_test_email())).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "not_verified");
}

#[tokio::test]
async fn test_register_twice() {
    let app = TestApp::new();
    let email = unique_test_email();
    app.register_player(&email, "First Try").await;

    let response = app.register(registration_body(&email)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "already_registered");
}

#[tokio::test]
async fn test_register_missing_password() {
    let app = TestApp::new();
    let mut body = registration_body(&unique_test_email());
    body.as_object_mut().unwrap().remove("password");

    let response = app.register(body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["message"], "Password is required");
}

#[tokio::test]
async fn test_register_invalid_fields() {
    let app = TestApp::new();
    let email = unique_test_email();

    let cases = [
        ("phone", json!("call me")),
        ("gender", json!("Robot")),
        ("dateOfBirth", json!("24/04/1973")),
        ("dateOfBirth", json!("2999-01-01")),
        ("bowlingStyle", json!([])),
        ("preferredRole", json!("Umpire")),
    ];

    for (field, value) in cases {
        let mut body = registration_body(&email);
        body[field] = value;
        let response = app.register(body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "field {}", field);
        let body = parse_response_body(response).await;
        assert!(
            body["message"].as_str().unwrap().starts_with(field),
            "message for {}: {}",
            field,
            body["message"]
        );
    }
}

#[tokio::test]
async fn test_register_wrong_json_type() {
    let app = TestApp::new();

    let response = app
        .send(raw_json_request(
            "/api/players/register",
            r#"{"email": "p@x.com", "bowlingStyle": "Spin"}"#,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "validation_error");
}

// ============================================================================
// Roster
// ============================================================================

#[tokio::test]
async fn test_list_players_ranked_by_score() {
    let app = TestApp::new();
    for (email, name, stats) in [
        ("a@club.test", "Anil", performance(100, 0)),
        ("b@club.test", "Bishan", performance(900, 10)),
        ("c@club.test", "Chetan", performance(300, 5)),
    ] {
        let player = app.register_player(email, name).await;
        app.set_performance(&player, stats).await;
    }

    let response = app.send(get_request("/api/players")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["fullName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Bishan", "Chetan", "Anil"]);
}

#[tokio::test]
async fn test_featured_players_limited_to_six() {
    let app = TestApp::new();
    for i in 0..8 {
        let email = format!("player{}@club.test", i);
        let player = app.register_player(&email, &format!("Player {}", i)).await;
        app.set_performance(&player, performance(i * 10, 0)).await;
    }

    let response = app.send(get_request("/api/players/featured")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    let players = body.as_array().unwrap();
    assert_eq!(players.len(), 6);
    assert_eq!(players[0]["fullName"], "Player 7");
    assert_eq!(players[5]["fullName"], "Player 2");
}

#[tokio::test]
async fn test_list_players_empty() {
    let app = TestApp::new();

    let response = app.send(get_request("/api/players")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_response_body(response).await, json!([]));
}

#[tokio::test]
async fn test_list_players_store_unavailable() {
    let app = TestApp::new();
    app.store.set_unavailable(true);

    let response = app.send(get_request("/api/players")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// ============================================================================
// Operational endpoints
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();

    let response = app.send(get_request("/api/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"]["connected"], true);

    let response = app.send(get_request("/api/health/live")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.send(get_request("/api/health/ready")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_response_body(response).await["status"], "ready");
}

#[tokio::test]
async fn test_ready_reports_unavailable_store() {
    let app = TestApp::new();
    app.store.set_unavailable(true);

    let response = app.send(get_request("/api/health/ready")).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let response = app.send(get_request("/api/health")).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    // Liveness does not depend on the store.
    let response = app.send(get_request("/api/health/live")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_security_headers_and_request_id() {
    let app = TestApp::new();

    let response = app.send(get_request("/api/players")).await;
    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert_eq!(headers.get("cache-control").unwrap(), "no-store");
    assert!(headers.get("x-request-id").is_some());
    assert!(headers.get("strict-transport-security").is_none());
}

#[tokio::test]
async fn test_client_request_id_is_echoed() {
    let app = TestApp::new();

    let request = axum::http::Request::builder()
        .uri("/api/health/live")
        .header("x-request-id", "abc-123")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.headers().get("x-request-id").unwrap(), "abc-123");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::new();

    let response = app.send(get_request("/api/nothing-here")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
