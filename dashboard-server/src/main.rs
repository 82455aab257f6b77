//! VoiceShield Dashboard Server
//!
//! HTTP surface over the simulation core: user events arrive as POST
//! endpoints, every screen is a GET snapshot.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  VOICESHIELD DASHBOARD                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌──────────────────┐  ┌──────────────────┐ │
//! │  │  API      │  │  Dashboard       │  │  History         │ │
//! │  │  (Axum)   │─▶│  Engine (core)   │─▶│  Recorder        │ │
//! │  │           │  │  Tokio timers    │  │  (event stream)  │ │
//! │  └───────────┘  └──────────────────┘  └──────────────────┘ │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod models;
mod handlers;
mod error;


use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tokio::sync::broadcast::error::RecvError;
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::net::SocketAddr;
use voiceshield_core::{DashboardEngine, DashboardEvent};

pub use error::{AppError, AppResult};
use models::{AnalysisLog, AnalysisLogEntry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env().context("Invalid configuration")?;

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "voiceshield_dashboard=debug,voiceshield_core=info,tower_http=debug".into()
    });
    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("VoiceShield Dashboard starting ({})...", config.environment);

    let engine = DashboardEngine::new(config.simulation.clone())
        .context("Failed to initialize dashboard engine")?;
    let state = AppState::new(engine, config.clone());

    if config.auto_start_monitoring {
        state.engine.start_monitoring()?;
    }

    // Build router
    let app = create_router(state.clone());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    state.engine.shutdown();
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: DashboardEngine,
    pub history: AnalysisLog,
    pub config: config::Config,
}

impl AppState {
    /// Wire the engine to a fresh history log; must run inside a Tokio runtime
    pub fn new(engine: DashboardEngine, config: config::Config) -> Self {
        let history = AnalysisLog::new(config.history_log_capacity);
        spawn_history_recorder(&engine, history.clone());
        Self { engine, history, config }
    }
}

/// Append every completed analysis to the history log
fn spawn_history_recorder(engine: &DashboardEngine, history: AnalysisLog) {
    let mut rx = engine.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(DashboardEvent::DetectionCompleted(result)) => {
                    history.record(AnalysisLogEntry::from_detection(&result));
                }
                Ok(DashboardEvent::VerificationCompleted(result)) => {
                    history.record(AnalysisLogEntry::from_verification(&result));
                }
                Ok(_) => {}
                Err(RecvError::Lagged(n)) => {
                    tracing::warn!("History recorder lagged, {} events skipped", n);
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))

        // Continuous monitoring
        .route("/api/v1/monitor", get(handlers::monitor::get))
        .route("/api/v1/monitor/history", get(handlers::monitor::history))
        .route("/api/v1/monitor/start", post(handlers::monitor::start))
        .route("/api/v1/monitor/stop", post(handlers::monitor::stop))

        // Live detection
        .route("/api/v1/detection", get(handlers::detection::get))
        .route("/api/v1/detection/start", post(handlers::detection::start))
        .route("/api/v1/detection/stop", post(handlers::detection::stop))
        .route("/api/v1/detection/reset", post(handlers::detection::reset))

        // Speaker verification
        .route("/api/v1/verification", get(handlers::verification::get))
        .route("/api/v1/verification/reference", post(handlers::verification::reference))
        .route("/api/v1/verification/test", post(handlers::verification::test))
        .route("/api/v1/verification/run", post(handlers::verification::run))
        .route("/api/v1/verification/reset", post(handlers::verification::reset))

        // Forensics & history
        .route("/api/v1/forensics", get(handlers::forensics::report))
        .route("/api/v1/history", get(handlers::history::list))
        .route("/api/v1/history/:id", get(handlers::history::get))

        // Settings
        .route("/api/v1/settings", get(handlers::settings::get).put(handlers::settings::update))

        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
