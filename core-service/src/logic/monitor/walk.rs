//! Bounded Random Walk - continuous risk process
//!
//! `next = prev + (baseline - prev) * k + noise + shock`, clamped to [0,100].

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::logic::random::RandomSource;

// ============================================================================
// RISK SAMPLE
// ============================================================================

/// One observed risk point, always an integer in [0,100]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskSample(u8);

impl RiskSample {
    pub const MIN: RiskSample = RiskSample(0);
    pub const MAX: RiskSample = RiskSample(100);

    /// Values above 100 saturate
    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    /// Clamp and round a continuous value; NaN maps to 0
    pub fn from_raw(raw: f64) -> Self {
        if raw.is_nan() {
            return Self::MIN;
        }
        Self(raw.clamp(0.0, 100.0).round() as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64
    }
}

impl std::fmt::Display for RiskSample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

// ============================================================================
// WALK
// ============================================================================

/// Walk parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkParams {
    /// Resting point the signal reverts toward
    pub baseline: f64,
    /// Fraction of the gap to baseline closed per tick
    pub reversion: f64,
    /// Half-width of the uniform noise
    pub noise_amplitude: f64,
    /// Chance of a burst per tick
    pub shock_probability: f64,
    /// Burst size
    pub shock_magnitude: f64,
}

impl Default for WalkParams {
    fn default() -> Self {
        Self {
            baseline: constants::DEFAULT_BASELINE,
            reversion: constants::DEFAULT_REVERSION,
            noise_amplitude: constants::DEFAULT_NOISE_AMPLITUDE,
            shock_probability: constants::DEFAULT_SHOCK_PROBABILITY,
            shock_magnitude: constants::DEFAULT_SHOCK_MAGNITUDE,
        }
    }
}

/// Output of one step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskStep {
    /// Clamped but unrounded value, for smooth gauge interpolation
    pub raw: f64,
    pub sample: RiskSample,
    pub shocked: bool,
}

#[derive(Debug, Clone, Default)]
pub struct BoundedRandomWalk {
    params: WalkParams,
}

impl BoundedRandomWalk {
    pub fn new(params: WalkParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &WalkParams {
        &self.params
    }

    pub fn set_params(&mut self, params: WalkParams) {
        self.params = params;
    }

    /// Advance one tick from `previous`
    pub fn step(&self, previous: f64, rng: &mut dyn RandomSource) -> RiskStep {
        let p = &self.params;
        let reversion = (p.baseline - previous) * p.reversion;
        let noise = rng.symmetric(p.noise_amplitude);
        let shocked = rng.chance(p.shock_probability);
        let shock = if shocked { p.shock_magnitude } else { 0.0 };

        let mut raw = previous + reversion + noise + shock;
        if !raw.is_finite() {
            raw = p.baseline;
        }
        let raw = raw.clamp(0.0, 100.0);

        RiskStep {
            raw,
            sample: RiskSample::from_raw(raw),
            shocked,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::random::{ScriptedSource, SimRng};

    #[test]
    fn test_from_raw_clamps_and_rounds() {
        assert_eq!(RiskSample::from_raw(-12.0).value(), 0);
        assert_eq!(RiskSample::from_raw(140.2).value(), 100);
        assert_eq!(RiskSample::from_raw(41.5).value(), 42);
        assert_eq!(RiskSample::from_raw(f64::NAN).value(), 0);
        assert_eq!(RiskSample::new(250).value(), 100);
    }

    #[test]
    fn test_step_without_noise_or_shock() {
        let walk = BoundedRandomWalk::default();
        // 0.5 -> zero noise, second draw 0.5 -> no shock (p = 0.05)
        let mut rng = ScriptedSource::new(vec![0.5, 0.5]);
        let step = walk.step(75.0, &mut rng);

        // 75 + (25 - 75) * 0.08 = 71
        assert!((step.raw - 71.0).abs() < 1e-9);
        assert_eq!(step.sample.value(), 71);
        assert!(!step.shocked);
    }

    #[test]
    fn test_shock_adds_burst() {
        let walk = BoundedRandomWalk::default();
        let mut rng = ScriptedSource::new(vec![0.5, 0.01]);
        let step = walk.step(25.0, &mut rng);
        assert!(step.shocked);
        assert_eq!(step.sample.value(), 55);
    }

    #[test]
    fn test_clamped_at_both_ends() {
        let walk = BoundedRandomWalk::default();

        let mut up = ScriptedSource::new(vec![0.999, 0.0]);
        assert_eq!(walk.step(100.0, &mut up).sample, RiskSample::MAX);

        let mut down = ScriptedSource::new(vec![0.0, 0.9]);
        assert_eq!(walk.step(0.0, &mut down).sample, RiskSample::MIN);
    }

    #[test]
    fn test_long_run_stays_bounded() {
        let walk = BoundedRandomWalk::new(WalkParams {
            shock_probability: 0.5,
            noise_amplitude: 40.0,
            ..Default::default()
        });
        let mut rng = SimRng::seeded(21);
        let mut prev = 15.0;
        for _ in 0..10_000 {
            let step = walk.step(prev, &mut rng);
            assert!((0.0..=100.0).contains(&step.raw));
            assert!(step.sample.value() <= 100);
            prev = step.sample.as_f64();
        }
    }

    #[test]
    fn test_reverts_toward_baseline() {
        let walk = BoundedRandomWalk::new(WalkParams {
            shock_probability: 0.0,
            ..Default::default()
        });
        let mut rng = SimRng::seeded(2);
        let mut prev = 95.0;
        let mut total = 0.0;
        for i in 0..2_000 {
            let step = walk.step(prev, &mut rng);
            prev = step.sample.as_f64();
            if i >= 1_000 {
                total += prev;
            }
        }
        let mean = total / 1_000.0;
        assert!((mean - 25.0).abs() < 5.0, "mean {mean}");
    }
}
