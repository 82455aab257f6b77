//! Analysis history handlers

use axum::{extract::{State, Path, Query}, Json};
use uuid::Uuid;

use crate::{AppState, AppResult, AppError};
use crate::models::{AnalysisLogEntry, HistoryFilter};

/// List completed analyses, newest first
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<HistoryFilter>,
) -> Json<Vec<AnalysisLogEntry>> {
    Json(state.history.list(&filter))
}

/// Get single entry
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AnalysisLogEntry>> {
    let entry = state.history
        .find_by_id(id)
        .ok_or_else(|| AppError::NotFound("History entry not found".to_string()))?;

    Ok(Json(entry))
}
