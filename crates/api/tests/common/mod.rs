//! Common test utilities for integration tests.
//!
//! The router is built over the in-memory store, a manual clock, scripted
//! codes and a recording mailer, so the tests need no database or network.

// Not every helper is used by every test binary.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use chrono::{DateTime, TimeZone, Utc};
use cricket_club_api::{
    app::{create_app, AppState},
    config::Config,
};
use domain::models::Performance;
use domain::services::{
    FixtureService, InMemoryStore, ManualClock, RecordingMailer, RegistrationService,
    ScriptedOtpGenerator,
};
use fake::{faker::internet::en::SafeEmail, Fake};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Fixed start of every test timeline.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

/// Test configuration with the given overrides applied.
pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    Config::load_for_test(overrides).expect("Failed to load test config")
}

/// A router plus handles on its collaborators.
pub struct TestApp {
    pub router: Router,
    pub registration: Arc<RegistrationService>,
    pub store: Arc<InMemoryStore>,
    pub mailer: Arc<RecordingMailer>,
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(test_config(&[]), &[], RecordingMailer::new())
    }

    pub fn with_config(config: Config) -> Self {
        Self::build(config, &[], RecordingMailer::new())
    }

    /// Codes are handed out in order; after that they are random.
    pub fn with_codes(codes: &[&str]) -> Self {
        Self::build(test_config(&[]), codes, RecordingMailer::new())
    }

    pub fn build(config: Config, codes: &[&str], mailer: RecordingMailer) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let mailer = Arc::new(mailer);
        let clock = Arc::new(ManualClock::new(t0()));

        let registration = Arc::new(
            RegistrationService::new(
                store.clone(),
                store.clone(),
                mailer.clone(),
                config.registration_settings(),
            )
            .with_clock(clock.clone())
            .with_otp_generator(Arc::new(ScriptedOtpGenerator::new(codes.iter().copied()))),
        );
        let fixtures = Arc::new(FixtureService::new(store.clone()).with_clock(clock.clone()));

        let state = AppState::new(config, registration.clone(), fixtures, store.clone());

        Self {
            router: create_app(state),
            registration,
            store,
            mailer,
            clock,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn send_otp(&self, email: &str) -> Response {
        self.send(json_request(
            Method::POST,
            "/api/temp/send-otp",
            json!({ "email": email }),
        ))
        .await
    }

    pub async fn verify_otp(&self, email: &str, otp: &str) -> Response {
        self.send(json_request(
            Method::POST,
            "/api/temp/verify-otp",
            json!({ "email": email, "otp": otp }),
        ))
        .await
    }

    pub async fn register(&self, body: Value) -> Response {
        self.send(json_request(Method::POST, "/api/players/register", body))
            .await
    }

    /// Runs the full handshake for `email` and returns the created player.
    pub async fn register_player(&self, email: &str, full_name: &str) -> Value {
        self.send_otp(email).await;
        let code = self
            .mailer
            .last_code_for(email)
            .expect("code should have been mailed");
        self.verify_otp(email, &code).await;

        let mut body = registration_body(email);
        body["fullName"] = json!(full_name);
        parse_response_body(self.register(body).await).await
    }

    /// Records statistics for a player returned by [`TestApp::register_player`].
    pub async fn set_performance(&self, player: &Value, performance: Performance) {
        let id = player["id"]
            .as_str()
            .and_then(|id| id.parse().ok())
            .expect("player id");
        self.registration
            .update_performance(id, performance)
            .await
            .expect("performance update");
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// A random, lower-case, syntactically valid email.
pub fn unique_test_email() -> String {
    let email: String = SafeEmail().fake();
    email.to_lowercase()
}

/// A complete, valid registration body for `email`.
pub fn registration_body(email: &str) -> Value {
    json!({
        "email": email,
        "password": "SecureP@ss123!",
        "fullName": "Sachin Tendulkar",
        "dateOfBirth": "1973-04-24",
        "gender": "Male",
        "phone": "+91 22 1234 5678",
        "preferredRole": "Batsman",
        "battingStyle": "Right",
        "bowlingStyle": ["Right-arm", "Spin"],
        "experience": "Professional"
    })
}

pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn raw_json_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn parse_response_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}
