//! Speaker verification handlers

use axum::{extract::State, Json};
use voiceshield_core::logic::workflow::VerificationSnapshot;

use crate::{AppState, AppResult};

pub async fn get(State(state): State<AppState>) -> Json<VerificationSnapshot> {
    Json(state.engine.verification_snapshot())
}

pub async fn reference(State(state): State<AppState>) -> AppResult<Json<VerificationSnapshot>> {
    Ok(Json(state.engine.provide_reference_sample()?))
}

pub async fn test(State(state): State<AppState>) -> AppResult<Json<VerificationSnapshot>> {
    Ok(Json(state.engine.provide_test_sample()?))
}

/// Ready -> Analyzing
pub async fn run(State(state): State<AppState>) -> AppResult<Json<VerificationSnapshot>> {
    Ok(Json(state.engine.run_verification()?))
}

pub async fn reset(State(state): State<AppState>) -> Json<VerificationSnapshot> {
    Json(state.engine.reset_verification())
}
