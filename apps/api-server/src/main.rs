//! # Lectern API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

#[cfg(feature = "scheduler")]
mod background;
mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use middleware::rate_limit::RequestLimitMiddleware;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Lectern API Server on {}:{}",
        config.host,
        config.port
    );

    // Build application state
    let state = AppState::new(&config).await?;

    // Overdue sessions are swept shut once a minute
    #[cfg(feature = "scheduler")]
    let _scheduler = start_session_sweep(&state).await?;

    let limiter = state.limiter.clone();
    let request_limit = config.request_limit.clone();

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(RequestLimitMiddleware::new(
                limiter.clone(),
                request_limit.clone(),
            ))
            .wrap(RequestIdMiddleware)
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

#[cfg(feature = "scheduler")]
async fn start_session_sweep(state: &AppState) -> std::io::Result<background::Scheduler> {
    use chrono::Utc;

    let scheduler = background::Scheduler::new(background::SchedulerConfig::from_env())
        .await
        .map_err(std::io::Error::other)?;

    let sessions = state.sessions.clone();
    scheduler
        .add_cron("0 * * * * *", move || {
            let sessions = sessions.clone();
            async move {
                if let Err(err) = sessions.end_overdue(Utc::now()).await {
                    tracing::error!(error = %err, "overdue-session sweep failed");
                }
            }
        })
        .await
        .map_err(std::io::Error::other)?;

    scheduler.start().await.map_err(std::io::Error::other)?;
    Ok(scheduler)
}
