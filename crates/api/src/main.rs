use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use cricket_club_api::app::{self, AppState};
use cricket_club_api::config::Config;
use cricket_club_api::jobs::{JobScheduler, PoolMetricsJob, TempUserCleanupJob};
use cricket_club_api::middleware;
use cricket_club_api::services::EmailService;
use domain::services::{FixtureService, RegistrationService};
use persistence::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    middleware::logging::init_logging(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;
    middleware::init_metrics()?;

    info!("Starting Cricket Club API v{}", env!("CARGO_PKG_VERSION"));

    let pool = persistence::db::create_pool(&(&config.database).into()).await?;

    info!("Running database migrations...");
    persistence::db::run_migrations(&pool).await?;
    info!("Migrations completed");

    let store = Arc::new(PgStore::new(pool.clone()));
    let mailer = Arc::new(EmailService::new(config.email.clone())?);
    if !config.email.enabled {
        tracing::warn!("Email is disabled; verification codes cannot be delivered");
    }

    let registration = Arc::new(RegistrationService::new(
        store.clone(),
        store.clone(),
        mailer,
        config.registration_settings(),
    ));

    let fixtures = Arc::new(FixtureService::new(store.clone()));

    let state = AppState::new(config.clone(), registration.clone(), fixtures, store);

    let mut scheduler = JobScheduler::new();
    scheduler.register(PoolMetricsJob::new(pool));
    if config.cleanup.enabled {
        let limiters = state
            .otp_request_limiter
            .iter()
            .chain(state.otp_verify_limiter.iter())
            .cloned();
        scheduler.register(
            TempUserCleanupJob::new(registration, &config.cleanup).with_limiters(limiters),
        );
    }
    scheduler.start();

    let app = app::create_app(state);

    let addr = config.socket_addr()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown();
    scheduler.wait_for_shutdown(Duration::from_secs(10)).await;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
