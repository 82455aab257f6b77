//! Settings handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;
use voiceshield_core::constants;
use voiceshield_core::{SettingsPatch, SimulationConfig};

use crate::{AppState, AppResult, AppError};

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub model_version: &'static str,
    pub sample_rate: &'static str,
    pub app_version: &'static str,
    pub history_log_capacity: usize,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSettings {
    #[validate(range(max = 100))]
    pub alert_threshold: Option<u8>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub baseline: Option<f64>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub reversion: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub noise_amplitude: Option<f64>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub shock_probability: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub shock_magnitude: Option<f64>,
    #[validate(range(min = 100, max = 60000))]
    pub tick_interval_ms: Option<u64>,
}

impl From<UpdateSettings> for SettingsPatch {
    fn from(req: UpdateSettings) -> Self {
        SettingsPatch {
            alert_threshold: req.alert_threshold,
            baseline: req.baseline,
            reversion: req.reversion,
            noise_amplitude: req.noise_amplitude,
            shock_probability: req.shock_probability,
            shock_magnitude: req.shock_magnitude,
            tick_interval_ms: req.tick_interval_ms,
        }
    }
}

fn settings_view(state: &AppState, simulation: SimulationConfig) -> SettingsResponse {
    SettingsResponse {
        model_version: constants::MODEL_VERSION,
        sample_rate: constants::SAMPLE_RATE,
        app_version: constants::APP_VERSION,
        history_log_capacity: state.history.capacity(),
        simulation,
    }
}

pub async fn get(State(state): State<AppState>) -> Json<SettingsResponse> {
    let simulation = state.engine.config();
    Json(settings_view(&state, simulation))
}

/// Validate and apply a partial update to the running engine
pub async fn update(
    State(state): State<AppState>,
    Json(req): Json<UpdateSettings>,
) -> AppResult<Json<SettingsResponse>> {
    req.validate()?;

    let patch = SettingsPatch::from(req);
    if patch.is_empty() {
        return Err(AppError::ValidationError("No settings provided".to_string()));
    }

    let simulation = state.engine.apply_settings(&patch)?;
    Ok(Json(settings_view(&state, simulation)))
}
