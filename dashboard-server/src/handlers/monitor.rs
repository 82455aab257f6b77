//! Continuous monitoring handlers

use axum::{extract::State, Json};
use serde::Serialize;
use voiceshield_core::logic::monitor::{MonitorSnapshot, RiskSample};

use crate::{AppState, AppResult};

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub capacity: usize,
    /// Oldest first
    pub samples: Vec<RiskSample>,
}

/// Current sample, alert and gauge
pub async fn get(State(state): State<AppState>) -> Json<MonitorSnapshot> {
    Json(state.engine.monitor_snapshot())
}

/// Timeline window
pub async fn history(State(state): State<AppState>) -> Json<HistoryResponse> {
    let snapshot = state.engine.monitor_snapshot();
    Json(HistoryResponse {
        capacity: state.engine.config().monitor.history_capacity,
        samples: snapshot.history,
    })
}

pub async fn start(State(state): State<AppState>) -> AppResult<Json<MonitorSnapshot>> {
    Ok(Json(state.engine.start_monitoring()?))
}

/// Stopping an idle monitor is not an error
pub async fn stop(State(state): State<AppState>) -> Json<MonitorSnapshot> {
    if !state.engine.stop_monitoring() {
        tracing::debug!("Stop requested while monitor idle");
    }
    Json(state.engine.monitor_snapshot())
}
