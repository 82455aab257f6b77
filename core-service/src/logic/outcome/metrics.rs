//! Metric Synthesizer
//!
//! Builds the numbers shown next to a verdict: `base + jitter`, then clamped
//! into the verdict's band so the metrics can never contradict the verdict
//! (a mismatch never shows a high similarity, whatever the draw).

use serde::{Deserialize, Serialize};

use super::types::{
    AdvancedAnalysis, DetectionMetrics, DetectionVerdict, VerificationDecision,
    VerificationMetrics,
};
use crate::logic::random::RandomSource;

// ============================================================================
// JITTERED METRIC
// ============================================================================

/// Inclusive band a metric must stay in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricBand {
    pub min: f64,
    pub max: f64,
}

impl MetricBand {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// `base +- jitter`, clamped to `band`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JitteredMetric {
    pub base: f64,
    pub jitter: f64,
    pub band: MetricBand,
}

impl JitteredMetric {
    pub const fn new(base: f64, jitter: f64, min: f64, max: f64) -> Self {
        Self { base, jitter, band: MetricBand::new(min, max) }
    }

    /// Continuous draw, still unrounded
    pub fn draw(&self, rng: &mut dyn RandomSource) -> f64 {
        self.band.clamp(self.base + rng.symmetric(self.jitter))
    }

    /// Percentage metric; band bounds are whole numbers so rounding stays inside
    pub fn draw_percent(&self, rng: &mut dyn RandomSource) -> u8 {
        self.band.clamp(self.draw(rng).round()).clamp(0.0, 100.0) as u8
    }

    /// Two-decimal metric
    pub fn draw_hundredths(&self, rng: &mut dyn RandomSource) -> f64 {
        self.band.clamp(round_hundredths(self.draw(rng)))
    }
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ============================================================================
// PROFILES
// ============================================================================

/// Detection metric profile for one verdict
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionProfile {
    pub confidence: JitteredMetric,
    pub speaker_match: JitteredMetric,
    pub mfcc_similarity: JitteredMetric,
    pub prosodic_deviation: JitteredMetric,
    pub behavioral_consistency: JitteredMetric,
    pub spectral_artifact_score: JitteredMetric,
}

/// Verification metric profile for one decision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerificationProfile {
    pub cosine_similarity: JitteredMetric,
    pub match_probability: JitteredMetric,
}

/// Profiles per category; percentages jitter by +-3, continuous metrics by +-0.03
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricProfiles {
    pub genuine: DetectionProfile,
    pub suspicious_voice: DetectionProfile,
    pub synthetic: DetectionProfile,
    pub matched: VerificationProfile,
    pub suspicious_speaker: VerificationProfile,
    pub mismatched: VerificationProfile,
}

impl Default for MetricProfiles {
    fn default() -> Self {
        Self {
            genuine: DetectionProfile {
                confidence: JitteredMetric::new(94.0, 3.0, 85.0, 99.0),
                speaker_match: JitteredMetric::new(92.0, 3.0, 85.0, 99.0),
                mfcc_similarity: JitteredMetric::new(0.87, 0.03, 0.80, 0.95),
                prosodic_deviation: JitteredMetric::new(0.12, 0.03, 0.05, 0.20),
                behavioral_consistency: JitteredMetric::new(0.91, 0.03, 0.85, 0.98),
                spectral_artifact_score: JitteredMetric::new(0.04, 0.03, 0.01, 0.10),
            },
            suspicious_voice: DetectionProfile {
                confidence: JitteredMetric::new(64.0, 3.0, 55.0, 75.0),
                speaker_match: JitteredMetric::new(55.0, 3.0, 40.0, 70.0),
                mfcc_similarity: JitteredMetric::new(0.62, 0.03, 0.50, 0.75),
                prosodic_deviation: JitteredMetric::new(0.38, 0.03, 0.25, 0.50),
                behavioral_consistency: JitteredMetric::new(0.64, 0.03, 0.50, 0.75),
                spectral_artifact_score: JitteredMetric::new(0.35, 0.03, 0.25, 0.50),
            },
            synthetic: DetectionProfile {
                confidence: JitteredMetric::new(90.0, 3.0, 80.0, 99.0),
                speaker_match: JitteredMetric::new(10.0, 3.0, 3.0, 25.0),
                mfcc_similarity: JitteredMetric::new(0.31, 0.03, 0.15, 0.45),
                prosodic_deviation: JitteredMetric::new(0.71, 0.03, 0.60, 0.85),
                behavioral_consistency: JitteredMetric::new(0.28, 0.03, 0.15, 0.40),
                spectral_artifact_score: JitteredMetric::new(0.82, 0.03, 0.70, 0.95),
            },
            matched: VerificationProfile {
                cosine_similarity: JitteredMetric::new(0.93, 0.03, 0.86, 0.99),
                match_probability: JitteredMetric::new(96.5, 1.5, 95.0, 99.0),
            },
            suspicious_speaker: VerificationProfile {
                cosine_similarity: JitteredMetric::new(0.59, 0.03, 0.45, 0.75),
                match_probability: JitteredMetric::new(54.5, 4.5, 50.0, 59.0),
            },
            mismatched: VerificationProfile {
                cosine_similarity: JitteredMetric::new(0.21, 0.03, 0.05, 0.39),
                match_probability: JitteredMetric::new(9.0, 2.0, 3.0, 11.0),
            },
        }
    }
}

impl MetricProfiles {
    pub fn detection(&self, verdict: DetectionVerdict) -> &DetectionProfile {
        match verdict {
            DetectionVerdict::Genuine => &self.genuine,
            DetectionVerdict::Suspicious => &self.suspicious_voice,
            DetectionVerdict::Synthetic => &self.synthetic,
        }
    }

    pub fn verification(&self, decision: VerificationDecision) -> &VerificationProfile {
        match decision {
            VerificationDecision::Match => &self.matched,
            VerificationDecision::Suspicious => &self.suspicious_speaker,
            VerificationDecision::Mismatch => &self.mismatched,
        }
    }
}

// ============================================================================
// SYNTHESIZER
// ============================================================================

/// Turns a chosen category into a full metric set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSynthesizer {
    profiles: MetricProfiles,
}

impl MetricSynthesizer {
    pub fn new(profiles: MetricProfiles) -> Self {
        Self { profiles }
    }

    pub fn profiles(&self) -> &MetricProfiles {
        &self.profiles
    }

    pub fn detection(&self, verdict: DetectionVerdict, rng: &mut dyn RandomSource) -> DetectionMetrics {
        let p = self.profiles.detection(verdict);
        DetectionMetrics {
            confidence: p.confidence.draw_percent(rng),
            risk_level: verdict.risk_level(),
            speaker_match: p.speaker_match.draw_percent(rng),
            advanced: AdvancedAnalysis {
                mfcc_similarity: p.mfcc_similarity.draw_hundredths(rng),
                prosodic_deviation: p.prosodic_deviation.draw_hundredths(rng),
                behavioral_consistency: p.behavioral_consistency.draw_hundredths(rng),
                spectral_artifact_score: p.spectral_artifact_score.draw_hundredths(rng),
            },
        }
    }

    pub fn verification(
        &self,
        decision: VerificationDecision,
        rng: &mut dyn RandomSource,
    ) -> VerificationMetrics {
        let p = self.profiles.verification(decision);
        VerificationMetrics {
            cosine_similarity: p.cosine_similarity.draw_hundredths(rng),
            match_probability: p.match_probability.draw_percent(rng),
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
    fn test_mismatch_similarity_stays_low() {
        let synth = MetricSynthesizer::default();
        let mut rng = SimRng::seeded(3);
        for _ in 0..10_000 {
            let m = synth.verification(VerificationDecision::Mismatch, &mut rng);
            assert!(m.cosine_similarity < 0.40, "{}", m.cosine_similarity);
            assert!((3..=11).contains(&m.match_probability));
        }
    }

    #[test]
    fn test_match_similarity_stays_high() {
        let synth = MetricSynthesizer::default();
        let mut rng = SimRng::seeded(4);
        for _ in 0..10_000 {
            let m = synth.verification(VerificationDecision::Match, &mut rng);
            assert!(m.cosine_similarity > 0.85, "{}", m.cosine_similarity);
            assert!((95..=99).contains(&m.match_probability));
        }
    }

    #[test]
    fn test_clamp_holds_for_extreme_draws() {
        // Widen jitter far past the band; the clamp must still win
        let mut profiles = MetricProfiles::default();
        profiles.mismatched.cosine_similarity.jitter = 5.0;
        profiles.matched.cosine_similarity.jitter = 5.0;
        let synth = MetricSynthesizer::new(profiles);

        let mut high = ScriptedSource::constant(0.999);
        let m = synth.verification(VerificationDecision::Mismatch, &mut high);
        assert_eq!(m.cosine_similarity, 0.39);

        let mut low = ScriptedSource::constant(0.0);
        let m = synth.verification(VerificationDecision::Match, &mut low);
        assert_eq!(m.cosine_similarity, 0.86);
    }

    #[test]
    fn test_two_decimal_precision() {
        let synth = MetricSynthesizer::default();
        let mut rng = SimRng::seeded(11);
        for _ in 0..1_000 {
            let m = synth.verification(VerificationDecision::Suspicious, &mut rng);
            let scaled = m.cosine_similarity * 100.0;
            assert!((scaled - scaled.round()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_detection_metrics_match_verdict() {
        let synth = MetricSynthesizer::default();
        let mut rng = SimRng::seeded(5);
        for _ in 0..5_000 {
            let genuine = synth.detection(DetectionVerdict::Genuine, &mut rng);
            assert!(genuine.speaker_match >= 85 && genuine.confidence <= 99);
            assert_eq!(genuine.risk_level, crate::logic::outcome::RiskLevel::Low);

            let synthetic = synth.detection(DetectionVerdict::Synthetic, &mut rng);
            assert!(synthetic.speaker_match <= 25 && synthetic.speaker_match >= 3);
            assert!(synthetic.advanced.spectral_artifact_score >= 0.70);

            let suspicious = synth.detection(DetectionVerdict::Suspicious, &mut rng);
            assert!((40..=70).contains(&suspicious.speaker_match));
        }
    }

    #[test]
    fn test_jitter_varies_output() {
        let synth = MetricSynthesizer::default();
        let mut rng = SimRng::seeded(8);
        let first = synth.detection(DetectionVerdict::Genuine, &mut rng);
        let varied = (0..20)
            .map(|_| synth.detection(DetectionVerdict::Genuine, &mut rng))
            .any(|m| m != first);
        assert!(varied);
    }
}
