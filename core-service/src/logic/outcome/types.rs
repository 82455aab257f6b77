//! Outcome Types
//!
//! Closed verdict sets for both workflows and the result structures built
//! around them. No logic besides labels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// DETECTION VERDICT
// ============================================================================

/// Live detection verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionVerdict {
    /// Natural human voice
    Genuine,
    /// Possible mimicry
    Suspicious,
    /// Synthetic / deepfake voice
    Synthetic,
}

impl DetectionVerdict {
    pub const ALL: [DetectionVerdict; 3] = [
        DetectionVerdict::Genuine,
        DetectionVerdict::Suspicious,
        DetectionVerdict::Synthetic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionVerdict::Genuine => "genuine",
            DetectionVerdict::Suspicious => "suspicious",
            DetectionVerdict::Synthetic => "synthetic",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DetectionVerdict::Genuine => "Genuine Voice",
            DetectionVerdict::Suspicious => "Suspicious (Possible Mimicry)",
            DetectionVerdict::Synthetic => "Synthetic Voice Detected",
        }
    }

    /// Risk level reported next to the verdict
    pub fn risk_level(&self) -> RiskLevel {
        match self {
            DetectionVerdict::Genuine => RiskLevel::Low,
            DetectionVerdict::Suspicious => RiskLevel::Medium,
            DetectionVerdict::Synthetic => RiskLevel::High,
        }
    }
}

impl std::fmt::Display for DetectionVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// VERIFICATION DECISION
// ============================================================================

/// Speaker verification decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationDecision {
    Match,
    Suspicious,
    Mismatch,
}

impl VerificationDecision {
    pub const ALL: [VerificationDecision; 3] = [
        VerificationDecision::Match,
        VerificationDecision::Suspicious,
        VerificationDecision::Mismatch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationDecision::Match => "match",
            VerificationDecision::Suspicious => "suspicious",
            VerificationDecision::Mismatch => "mismatch",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VerificationDecision::Match => "Match",
            VerificationDecision::Suspicious => "Suspicious Deviation",
            VerificationDecision::Mismatch => "Mismatch",
        }
    }
}

impl std::fmt::Display for VerificationDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// RISK LEVEL
// ============================================================================

/// Three-level severity shared by the monitor gauge and detection results
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    /// Gauge caption
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// METRICS
// ============================================================================

/// Expandable "advanced analysis" block of a detection result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdvancedAnalysis {
    pub mfcc_similarity: f64,
    pub prosodic_deviation: f64,
    pub behavioral_consistency: f64,
    pub spectral_artifact_score: f64,
}

/// Metrics synthesized for a detection verdict
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionMetrics {
    /// Confidence score (percent)
    pub confidence: u8,
    pub risk_level: RiskLevel,
    /// Speaker match (percent)
    pub speaker_match: u8,
    pub advanced: AdvancedAnalysis,
}

/// Metrics synthesized for a verification decision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerificationMetrics {
    /// Cosine similarity of the two embeddings, two decimals
    pub cosine_similarity: f64,
    /// Match probability (percent)
    pub match_probability: u8,
}

// ============================================================================
// RESULTS
// ============================================================================

/// Frozen outcome of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult<C, M> {
    pub id: Uuid,
    pub category: C,
    pub metrics: M,
    pub completed_at: DateTime<Utc>,
}

impl<C, M> AnalysisResult<C, M> {
    pub fn new(category: C, metrics: M) -> Self {
        Self {
            id: Uuid::new_v4(),
            category,
            metrics,
            completed_at: Utc::now(),
        }
    }
}

pub type DetectionResult = AnalysisResult<DetectionVerdict, DetectionMetrics>;
pub type VerificationResult = AnalysisResult<VerificationDecision, VerificationMetrics>;
