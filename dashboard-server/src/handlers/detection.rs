//! Live detection handlers

use axum::{extract::State, Json};
use voiceshield_core::logic::workflow::DetectionSnapshot;

use crate::{AppState, AppResult};

pub async fn get(State(state): State<AppState>) -> Json<DetectionSnapshot> {
    Json(state.engine.detection_snapshot())
}

/// Idle -> Recording
pub async fn start(State(state): State<AppState>) -> AppResult<Json<DetectionSnapshot>> {
    Ok(Json(state.engine.start_capture()?))
}

/// Recording -> Processing
pub async fn stop(State(state): State<AppState>) -> AppResult<Json<DetectionSnapshot>> {
    Ok(Json(state.engine.stop_capture()?))
}

pub async fn reset(State(state): State<AppState>) -> Json<DetectionSnapshot> {
    Json(state.engine.reset_detection())
}
