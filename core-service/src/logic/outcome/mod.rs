//! Outcome Module
//!
//! Chọn verdict theo phân phối cố định rồi tổng hợp metrics quanh verdict đó.
//! Không có inference thật - mọi "model" đều là placeholder thống kê.
//!
//! ## Structure
//! - `types`: Verdict enums, metric structs, result wrapper
//! - `sampler`: Categorical sampling over cumulative cut points
//! - `metrics`: Jittered, band-clamped metric synthesis

pub mod types;
pub mod sampler;
pub mod metrics;

pub use types::{
    AdvancedAnalysis,
    AnalysisResult,
    DetectionMetrics,
    DetectionResult,
    DetectionVerdict,
    RiskLevel,
    VerificationDecision,
    VerificationMetrics,
    VerificationResult,
};

pub use sampler::{DistributionError, OutcomeCut, OutcomeDistribution};
pub use metrics::{JitteredMetric, MetricBand, MetricProfiles, MetricSynthesizer};
