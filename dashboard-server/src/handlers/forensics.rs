//! Forensic report handler

use axum::{extract::State, Json};
use voiceshield_core::logic::forensic::ForensicReport;

use crate::AppState;

/// Freshly generated on every request
pub async fn report(State(state): State<AppState>) -> Json<ForensicReport> {
    Json(state.engine.forensic_report())
}
