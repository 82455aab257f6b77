//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    monitoring: bool,
    history_entries: usize,
    timestamp: i64,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        monitoring: state.engine.monitor_snapshot().running,
        history_entries: state.history.len(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
