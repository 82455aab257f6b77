//! Simulation Configuration
//!
//! Every tunable of the simulation in one place. Defaults come from
//! `constants`; `from_env` overrides them from `VOICESHIELD_*` variables.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{self, env_opt, env_or};
use crate::logic::error::ConfigError;
use crate::logic::monitor::MonitorConfig;
use crate::logic::outcome::{
    DetectionVerdict, DistributionError, MetricProfiles, OutcomeDistribution,
    VerificationDecision,
};

// ============================================================================
// WORKFLOW CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub detection: OutcomeDistribution<DetectionVerdict>,
    pub verification: OutcomeDistribution<VerificationDecision>,
    /// Delay of both Processing and Analyzing
    pub processing_delay_ms: u64,
    /// Recording counter period
    pub elapsed_tick_ms: u64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            detection: OutcomeDistribution::default(),
            verification: OutcomeDistribution::default(),
            processing_delay_ms: constants::DEFAULT_PROCESSING_DELAY_MS,
            elapsed_tick_ms: constants::DEFAULT_ELAPSED_TICK_MS,
        }
    }
}

// ============================================================================
// SIMULATION CONFIG
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub monitor: MonitorConfig,
    pub workflows: WorkflowConfig,
    pub metrics: MetricProfiles,
    /// Fixed seed for reproducible demos; entropy when absent
    pub seed: Option<u64>,
}

impl SimulationConfig {
    /// Load from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let d = Self::default();
        let mut config = d.clone();

        let m = &mut config.monitor;
        m.initial_risk = env_or("VOICESHIELD_INITIAL_RISK", d.monitor.initial_risk);
        m.walk.baseline = env_or("VOICESHIELD_BASELINE", d.monitor.walk.baseline);
        m.walk.reversion = env_or("VOICESHIELD_REVERSION", d.monitor.walk.reversion);
        m.walk.noise_amplitude = env_or("VOICESHIELD_NOISE_AMPLITUDE", d.monitor.walk.noise_amplitude);
        m.walk.shock_probability = env_or("VOICESHIELD_SHOCK_PROBABILITY", d.monitor.walk.shock_probability);
        m.walk.shock_magnitude = env_or("VOICESHIELD_SHOCK_MAGNITUDE", d.monitor.walk.shock_magnitude);
        m.history_capacity = env_or("VOICESHIELD_HISTORY_CAPACITY", d.monitor.history_capacity);
        m.tick_interval_ms = env_or("VOICESHIELD_TICK_INTERVAL_MS", d.monitor.tick_interval_ms);
        m.thresholds.alert_above = env_or("VOICESHIELD_ALERT_THRESHOLD", d.monitor.thresholds.alert_above);

        let w = &mut config.workflows;
        w.processing_delay_ms = env_or("VOICESHIELD_PROCESSING_DELAY_MS", d.workflows.processing_delay_ms);
        w.elapsed_tick_ms = env_or("VOICESHIELD_ELAPSED_TICK_MS", d.workflows.elapsed_tick_ms);

        if let Some(raw) = env_opt::<String>("VOICESHIELD_DETECTION_CUTS") {
            w.detection = parse_cuts(&raw, &DetectionVerdict::ALL)
                .map_err(|source| ConfigError::Distribution { workflow: "detection", source })?;
        }
        if let Some(raw) = env_opt::<String>("VOICESHIELD_VERIFICATION_CUTS") {
            w.verification = parse_cuts(&raw, &VerificationDecision::ALL)
                .map_err(|source| ConfigError::Distribution { workflow: "verification", source })?;
        }

        config.seed = env_opt("VOICESHIELD_SEED");

        config.validate()?;
        Ok(config)
    }

    /// Range checks; distributions are already validated by construction
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.monitor;
        check_range("initial_risk", m.initial_risk, 0.0, 100.0)?;
        check_range("baseline", m.walk.baseline, 0.0, 100.0)?;
        check_range("reversion", m.walk.reversion, 0.0, 1.0)?;
        check_range("noise_amplitude", m.walk.noise_amplitude, 0.0, 100.0)?;
        check_range("shock_probability", m.walk.shock_probability, 0.0, 1.0)?;
        check_range("shock_magnitude", m.walk.shock_magnitude, 0.0, 100.0)?;

        let t = &m.thresholds;
        check_range("alert_threshold", t.alert_above as f64, 0.0, 100.0)?;
        check_range("high_from", t.high_from as f64, 0.0, 100.0)?;
        if t.medium_from > t.high_from {
            return Err(ConfigError::UnorderedBands {
                medium_from: t.medium_from,
                high_from: t.high_from,
            });
        }

        if m.history_capacity == 0 {
            return Err(ConfigError::Zero("history_capacity"));
        }
        if m.tick_interval_ms == 0 {
            return Err(ConfigError::Zero("tick_interval_ms"));
        }
        if self.workflows.elapsed_tick_ms == 0 {
            return Err(ConfigError::Zero("elapsed_tick_ms"));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.monitor.tick_interval_ms)
    }

    pub fn elapsed_tick(&self) -> Duration {
        Duration::from_millis(self.workflows.elapsed_tick_ms)
    }

    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.workflows.processing_delay_ms)
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, min, max, value })
    }
}

/// "0.65,0.85,1.0" -> cut points for the categories in order
fn parse_cuts<C: Copy>(
    raw: &str,
    categories: &[C],
) -> Result<OutcomeDistribution<C>, DistributionError> {
    let points: Vec<f64> = raw
        .split(',')
        .map(|s| s.trim().parse::<f64>().unwrap_or(f64::NAN))
        .collect();
    if points.len() != categories.len() {
        return Err(DistributionError::CategoryCount {
            expected: categories.len(),
            found: points.len(),
        });
    }

    let pairs: Vec<(C, f64)> = categories.iter().copied().zip(points).collect();
    OutcomeDistribution::from_pairs(&pairs)
}

// ============================================================================
// SETTINGS PATCH
// ============================================================================

/// Partial runtime override of the monitor settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsPatch {
    pub alert_threshold: Option<u8>,
    pub baseline: Option<f64>,
    pub reversion: Option<f64>,
    pub noise_amplitude: Option<f64>,
    pub shock_probability: Option<f64>,
    pub shock_magnitude: Option<f64>,
    pub tick_interval_ms: Option<u64>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply onto a copy of `config` and validate the result
    pub fn applied_to(&self, config: &SimulationConfig) -> Result<SimulationConfig, ConfigError> {
        let mut next = config.clone();
        let m = &mut next.monitor;
        if let Some(v) = self.alert_threshold {
            m.thresholds.alert_above = v;
        }
        if let Some(v) = self.baseline {
            m.walk.baseline = v;
        }
        if let Some(v) = self.reversion {
            m.walk.reversion = v;
        }
        if let Some(v) = self.noise_amplitude {
            m.walk.noise_amplitude = v;
        }
        if let Some(v) = self.shock_probability {
            m.walk.shock_probability = v;
        }
        if let Some(v) = self.shock_magnitude {
            m.walk.shock_magnitude = v;
        }
        if let Some(v) = self.tick_interval_ms {
            m.tick_interval_ms = v;
        }
        next.validate()?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.monitor.thresholds.alert_above, 70);
        assert_eq!(config.monitor.history_capacity, 30);
        assert_eq!(config.processing_delay(), Duration::from_millis(2500));
        assert_eq!(config.tick_interval(), Duration::from_millis(1500));
    }

    #[test]
    fn test_rejects_out_of_range() {
        let mut config = SimulationConfig::default();
        config.monitor.walk.shock_probability = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "shock_probability", .. })
        ));

        let mut config = SimulationConfig::default();
        config.monitor.history_capacity = 0;
        assert_eq!(config.validate(), Err(ConfigError::Zero("history_capacity")));
    }

    #[test]
    fn test_parse_cuts() {
        let dist = parse_cuts("0.5, 0.9, 1.0", &DetectionVerdict::ALL).unwrap();
        assert!((dist.probability_of(DetectionVerdict::Suspicious) - 0.4).abs() < 1e-9);

        assert!(parse_cuts("0.5,abc,1.0", &DetectionVerdict::ALL).is_err());
        assert!(parse_cuts("0.9,0.5,1.0", &DetectionVerdict::ALL).is_err());
    }

    #[test]
    fn test_parse_cuts_requires_one_point_per_category() {
        assert_eq!(
            parse_cuts("0.65,1.0", &DetectionVerdict::ALL),
            Err(DistributionError::CategoryCount { expected: 3, found: 2 })
        );
        assert_eq!(
            parse_cuts("0.2,0.4,0.6,1.0", &VerificationDecision::ALL),
            Err(DistributionError::CategoryCount { expected: 3, found: 4 })
        );
    }

    #[test]
    fn test_patch_applies_and_validates() {
        let base = SimulationConfig::default();
        let patch = SettingsPatch {
            alert_threshold: Some(60),
            tick_interval_ms: Some(500),
            ..Default::default()
        };
        let next = patch.applied_to(&base).unwrap();
        assert_eq!(next.monitor.thresholds.alert_above, 60);
        assert_eq!(next.monitor.tick_interval_ms, 500);
        assert_eq!(next.monitor.walk, base.monitor.walk);

        let bad = SettingsPatch { reversion: Some(2.0), ..Default::default() };
        assert!(bad.applied_to(&base).is_err());
        assert!(SettingsPatch::default().is_empty());
    }

    #[test]
    fn test_config_serde_roundtrip_keeps_distributions() {
        let config = SimulationConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
