//! Alert Evaluator
//!
//! Severity bands and the alert flag, recomputed from the latest sample only.
//! No hysteresis: a signal hovering at the threshold can flip every tick.

use serde::{Deserialize, Serialize};

use super::walk::RiskSample;
use crate::constants;
use crate::logic::outcome::RiskLevel;

/// Band edges and alert threshold (percent)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Medium band starts here (inclusive)
    pub medium_from: u8,
    /// High band starts here (inclusive)
    pub high_from: u8,
    /// Alert fires strictly above this value
    pub alert_above: u8,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            medium_from: constants::DEFAULT_MEDIUM_FROM,
            high_from: constants::DEFAULT_HIGH_FROM,
            alert_above: constants::DEFAULT_ALERT_ABOVE,
        }
    }
}

impl AlertThresholds {
    /// Bands are ordered and inside [0,100]
    pub fn is_consistent(&self) -> bool {
        self.medium_from <= self.high_from && self.high_from <= 100 && self.alert_above <= 100
    }
}

/// Derived alert state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertState {
    pub active: bool,
    pub severity: RiskLevel,
}

impl AlertState {
    pub fn label(&self) -> &'static str {
        self.severity.label()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AlertEvaluator {
    thresholds: AlertThresholds,
}

impl AlertEvaluator {
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &AlertThresholds {
        &self.thresholds
    }

    pub fn set_thresholds(&mut self, thresholds: AlertThresholds) {
        self.thresholds = thresholds;
    }

    pub fn severity(&self, sample: RiskSample) -> RiskLevel {
        let v = sample.value();
        if v < self.thresholds.medium_from {
            RiskLevel::Low
        } else if v < self.thresholds.high_from {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn evaluate(&self, sample: RiskSample) -> AlertState {
        AlertState {
            active: sample.value() > self.thresholds.alert_above,
            severity: self.severity(sample),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(v: u8) -> AlertState {
        AlertEvaluator::default().evaluate(RiskSample::new(v))
    }

    #[test]
    fn test_threshold_boundary() {
        assert!(!eval(70).active);
        assert!(eval(71).active);
        assert!(!eval(69).active);
        assert!(eval(100).active);
    }

    #[test]
    fn test_severity_bands() {
        assert_eq!(eval(0).severity, RiskLevel::Low);
        assert_eq!(eval(39).severity, RiskLevel::Low);
        assert_eq!(eval(40).severity, RiskLevel::Medium);
        assert_eq!(eval(69).severity, RiskLevel::Medium);
        assert_eq!(eval(70).severity, RiskLevel::High);
        assert_eq!(eval(100).severity, RiskLevel::High);
    }

    #[test]
    fn test_boundary_is_high_but_not_alerting() {
        let state = eval(70);
        assert_eq!(state, AlertState { active: false, severity: RiskLevel::High });
        assert_eq!(state.label(), "High Risk");
    }

    #[test]
    fn test_custom_threshold() {
        let evaluator = AlertEvaluator::new(AlertThresholds {
            alert_above: 50,
            ..Default::default()
        });
        assert!(!evaluator.evaluate(RiskSample::new(50)).active);
        assert!(evaluator.evaluate(RiskSample::new(51)).active);
    }
}
