use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use domain::services::{FixtureService, PlayerStore, RegistrationService};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, security_headers_middleware, trace_id, EmailRateLimiter,
    QuotaWindow,
};
use crate::routes::{fixtures, health, players, temp};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registration: Arc<RegistrationService>,
    pub fixtures: Arc<FixtureService>,
    /// Used by the readiness probe.
    pub players: Arc<dyn PlayerStore>,
    pub otp_request_limiter: Option<Arc<EmailRateLimiter>>,
    pub otp_verify_limiter: Option<Arc<EmailRateLimiter>>,
}

impl AppState {
    /// Build the state, creating the per-email limiters from the security
    /// section. A limit of 0 disables that limiter.
    pub fn new(
        config: Config,
        registration: Arc<RegistrationService>,
        fixtures: Arc<FixtureService>,
        players: Arc<dyn PlayerStore>,
    ) -> Self {
        let otp_request_limiter = EmailRateLimiter::new(
            config.security.otp_requests_per_hour,
            QuotaWindow::PerHour,
        )
        .map(Arc::new);
        let otp_verify_limiter = EmailRateLimiter::new(
            config.security.otp_verify_attempts_per_minute,
            QuotaWindow::PerMinute,
        )
        .map(Arc::new);

        Self {
            config: Arc::new(config),
            registration,
            fixtures,
            players,
            otp_request_limiter,
            otp_verify_limiter,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Email verification handshake
    let temp_routes = Router::new()
        .route("/api/temp/send-otp", post(temp::send_otp))
        .route("/api/temp/verify-otp", post(temp::verify_otp));

    let player_routes = Router::new()
        .route("/api/players", get(players::list_players))
        .route("/api/players/featured", get(players::featured_players))
        .route("/api/players/register", post(players::register_player));

    // Read-only club calendar
    let fixture_routes = Router::new()
        .route("/api/matches", get(fixtures::list_matches))
        .route("/api/matches/future", get(fixtures::future_matches))
        .route("/api/matches/completed", get(fixtures::completed_matches))
        .route("/api/tournaments", get(fixtures::list_tournaments));

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(temp_routes)
        .merge(player_routes)
        .merge(fixture_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
