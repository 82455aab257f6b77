//! Forensic Report - randomized spectrogram, heatmap and artifact scores
//!
//! Purely cosmetic: every request draws a fresh report. Low artifact score
//! reads as more genuine.

use serde::Serialize;

use crate::logic::outcome::RiskLevel;
use crate::logic::random::RandomSource;

// ============================================================================
// CONSTANTS
// ============================================================================

pub const SPECTROGRAM_ROWS: usize = 30;
pub const SPECTROGRAM_COLS: usize = 50;
pub const HEATMAP_CELLS: usize = 200;
pub const ARTIFACT_CURVE_POINTS: usize = 40;

/// Spectrogram cells above this are flagged as anomalies
const SPECTROGRAM_ANOMALY: f64 = 0.85;
/// Heatmap grading
const HEATMAP_MEDIUM: f64 = 0.5;
const HEATMAP_HIGH: f64 = 0.8;
/// Artifact curve points above this are flagged
const CURVE_HIGH: f64 = 0.7;
/// Artifact score above this is flagged
const ARTIFACT_SCORE_HIGH: f64 = 0.40;

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct HeatCell {
    pub value: f64,
    pub level: RiskLevel,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurvePoint {
    pub value: f64,
    pub high: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForensicScore {
    pub label: &'static str,
    pub value: f64,
    pub high: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForensicReport {
    /// Mel-spectrogram intensities, rows x cols, each in [0,1)
    pub spectrogram: Vec<Vec<f64>>,
    pub spectrogram_anomalies: usize,
    pub heatmap: Vec<HeatCell>,
    pub artifact_curve: Vec<CurvePoint>,
    pub scores: Vec<ForensicScore>,
}

// ============================================================================
// GENERATION
// ============================================================================

pub fn generate(rng: &mut dyn RandomSource) -> ForensicReport {
    let spectrogram: Vec<Vec<f64>> = (0..SPECTROGRAM_ROWS)
        .map(|_| (0..SPECTROGRAM_COLS).map(|_| rng.next_unit()).collect())
        .collect();
    let spectrogram_anomalies = spectrogram
        .iter()
        .flatten()
        .filter(|v| **v > SPECTROGRAM_ANOMALY)
        .count();

    let heatmap = (0..HEATMAP_CELLS)
        .map(|_| {
            let value = rng.next_unit();
            HeatCell { value, level: heat_level(value) }
        })
        .collect();

    let artifact_curve = (0..ARTIFACT_CURVE_POINTS)
        .map(|i| {
            let value = (i as f64 * 0.3).sin() * 0.3 + rng.next_unit() * 0.5 + 0.2;
            CurvePoint { value, high: value > CURVE_HIGH }
        })
        .collect();

    let artifact = hundredths(rng.uniform(0.15, 0.50));
    let scores = vec![
        ForensicScore {
            label: "Synthetic Artifact Score",
            value: artifact,
            high: artifact > ARTIFACT_SCORE_HIGH,
        },
        ForensicScore {
            label: "Temporal Irregularity Index",
            value: hundredths(rng.uniform(0.08, 0.33)),
            high: false,
        },
        ForensicScore {
            label: "Voice Stability Index",
            value: hundredths(rng.uniform(0.75, 0.95)),
            high: false,
        },
    ];

    log::debug!(
        "Forensic report generated: {} spectrogram anomalies, artifact score {:.2}",
        spectrogram_anomalies,
        artifact
    );

    ForensicReport {
        spectrogram,
        spectrogram_anomalies,
        heatmap,
        artifact_curve,
        scores,
    }
}

fn heat_level(value: f64) -> RiskLevel {
    if value > HEATMAP_HIGH {
        RiskLevel::High
    } else if value > HEATMAP_MEDIUM {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

fn hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::random::{ScriptedSource, SimRng};

    #[test]
    fn test_report_shape() {
        let report = generate(&mut SimRng::seeded(10));
        assert_eq!(report.spectrogram.len(), SPECTROGRAM_ROWS);
        assert!(report.spectrogram.iter().all(|row| row.len() == SPECTROGRAM_COLS));
        assert_eq!(report.heatmap.len(), HEATMAP_CELLS);
        assert_eq!(report.artifact_curve.len(), ARTIFACT_CURVE_POINTS);
        assert_eq!(report.scores.len(), 3);
    }

    #[test]
    fn test_score_ranges() {
        let mut rng = SimRng::seeded(12);
        for _ in 0..200 {
            let report = generate(&mut rng);
            let artifact = &report.scores[0];
            assert!((0.15..=0.50).contains(&artifact.value));
            assert_eq!(artifact.high, artifact.value > 0.40);
            assert!((0.08..=0.33).contains(&report.scores[1].value));
            assert!((0.75..=0.95).contains(&report.scores[2].value));
        }
    }

    #[test]
    fn test_grading_constant_draws() {
        let report = generate(&mut ScriptedSource::constant(0.9));
        assert_eq!(report.spectrogram_anomalies, SPECTROGRAM_ROWS * SPECTROGRAM_COLS);
        assert!(report.heatmap.iter().all(|c| c.level == RiskLevel::High));

        let quiet = generate(&mut ScriptedSource::constant(0.1));
        assert_eq!(quiet.spectrogram_anomalies, 0);
        assert!(quiet.heatmap.iter().all(|c| c.level == RiskLevel::Low));
        assert!(!quiet.scores[0].high);
    }
}
