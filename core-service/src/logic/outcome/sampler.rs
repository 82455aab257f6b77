//! Categorical Outcome Sampler
//!
//! Draws a verdict from an ordered list of (category, cumulative probability)
//! cut points. Both workflows share this primitive with different tables.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{DetectionVerdict, VerificationDecision};
use crate::logic::random::RandomSource;

/// Tolerance when checking that the last cut point is 1.0
const CUMULATIVE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistributionError {
    #[error("distribution has no categories")]
    Empty,
    #[error("cut point #{index} ({value}) is outside (0, 1]")]
    OutOfRange { index: usize, value: f64 },
    #[error("cut point #{index} ({value}) does not exceed the previous one ({previous})")]
    NotIncreasing { index: usize, value: f64, previous: f64 },
    #[error("last cut point is {0}, expected 1.0")]
    Incomplete(f64),
    #[error("expected {expected} cut points, got {found}")]
    CategoryCount { expected: usize, found: usize },
}

/// One (category, cumulative probability) pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeCut<C> {
    pub category: C,
    pub cumulative: f64,
}

/// Validated cumulative distribution over a closed category set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<OutcomeCut<C>>",
    into = "Vec<OutcomeCut<C>>",
    bound(
        serialize = "C: Serialize + Copy",
        deserialize = "C: Deserialize<'de> + Copy"
    )
)]
pub struct OutcomeDistribution<C> {
    cuts: Vec<OutcomeCut<C>>,
    /// Category of the final cut, for draws at or above 1.0
    last: C,
}

impl<C: Copy> OutcomeDistribution<C> {
    /// Build from cut points; strictly increasing, last == 1.0
    pub fn new(cuts: Vec<OutcomeCut<C>>) -> Result<Self, DistributionError> {
        let final_cut = *cuts.last().ok_or(DistributionError::Empty)?;
        let last = final_cut.cumulative;

        let mut previous = 0.0;
        for (index, cut) in cuts.iter().enumerate() {
            let value = cut.cumulative;
            if !(value > 0.0 && value <= 1.0 + CUMULATIVE_EPSILON) {
                return Err(DistributionError::OutOfRange { index, value });
            }
            if index > 0 && value <= previous {
                return Err(DistributionError::NotIncreasing { index, value, previous });
            }
            previous = value;
        }

        if (last - 1.0).abs() > CUMULATIVE_EPSILON {
            return Err(DistributionError::Incomplete(last));
        }

        Ok(Self { cuts, last: final_cut.category })
    }

    /// Shorthand for `(category, cumulative)` tuples
    pub fn from_pairs(pairs: &[(C, f64)]) -> Result<Self, DistributionError> {
        Self::new(
            pairs
                .iter()
                .map(|&(category, cumulative)| OutcomeCut { category, cumulative })
                .collect(),
        )
    }

    /// First category whose cut point exceeds `r`
    pub fn pick(&self, r: f64) -> C {
        self.cuts
            .iter()
            .find(|cut| r < cut.cumulative)
            .map_or(self.last, |cut| cut.category)
    }

    /// Draw one category
    pub fn sample(&self, rng: &mut dyn RandomSource) -> C {
        self.pick(rng.next_unit())
    }

    pub fn cuts(&self) -> &[OutcomeCut<C>] {
        &self.cuts
    }
}

impl<C: Copy + PartialEq> OutcomeDistribution<C> {
    /// Point probability of one category
    pub fn probability_of(&self, category: C) -> f64 {
        let mut previous = 0.0;
        for cut in &self.cuts {
            if cut.category == category {
                return cut.cumulative - previous;
            }
            previous = cut.cumulative;
        }
        0.0
    }
}

impl<C: Copy> TryFrom<Vec<OutcomeCut<C>>> for OutcomeDistribution<C> {
    type Error = DistributionError;

    fn try_from(cuts: Vec<OutcomeCut<C>>) -> Result<Self, Self::Error> {
        Self::new(cuts)
    }
}

impl<C> From<OutcomeDistribution<C>> for Vec<OutcomeCut<C>> {
    fn from(dist: OutcomeDistribution<C>) -> Self {
        dist.cuts
    }
}

impl Default for OutcomeDistribution<DetectionVerdict> {
    /// 65% genuine, 20% suspicious, 15% synthetic
    fn default() -> Self {
        Self {
            cuts: vec![
                OutcomeCut { category: DetectionVerdict::Genuine, cumulative: 0.65 },
                OutcomeCut { category: DetectionVerdict::Suspicious, cumulative: 0.85 },
                OutcomeCut { category: DetectionVerdict::Synthetic, cumulative: 1.0 },
            ],
            last: DetectionVerdict::Synthetic,
        }
    }
}

impl Default for OutcomeDistribution<VerificationDecision> {
    /// 60% match, 25% suspicious, 15% mismatch
    fn default() -> Self {
        Self {
            cuts: vec![
                OutcomeCut { category: VerificationDecision::Match, cumulative: 0.60 },
                OutcomeCut { category: VerificationDecision::Suspicious, cumulative: 0.85 },
                OutcomeCut { category: VerificationDecision::Mismatch, cumulative: 1.0 },
            ],
            last: VerificationDecision::Mismatch,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
