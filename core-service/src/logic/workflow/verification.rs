//! Verification Workflow - AwaitingSamples -> Ready -> Analyzing -> Decided
//!
//! Both the reference and the test sample must be provided (either order)
//! before a run is allowed.

use serde::{Deserialize, Serialize};

use crate::logic::error::WorkflowError;
use crate::logic::generation::{RunGeneration, RunToken};
use crate::logic::outcome::{
    AnalysisResult, MetricSynthesizer, OutcomeDistribution, VerificationDecision,
    VerificationResult,
};
use crate::logic::random::RandomSource;

const WORKFLOW: &str = "verification";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationPhase {
    AwaitingSamples,
    Ready,
    Analyzing,
    Decided,
}

impl VerificationPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationPhase::AwaitingSamples => "awaiting_samples",
            VerificationPhase::Ready => "ready",
            VerificationPhase::Analyzing => "analyzing",
            VerificationPhase::Decided => "decided",
        }
    }
}

impl std::fmt::Display for VerificationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which of the two uploads an event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleSlot {
    Reference,
    Test,
}

/// Read-only view for the verification screen
#[derive(Debug, Clone, Serialize)]
pub struct VerificationSnapshot {
    pub phase: VerificationPhase,
    pub reference_provided: bool,
    pub test_provided: bool,
    pub decision: Option<VerificationResult>,
}

#[derive(Debug, Clone)]
pub struct VerificationWorkflow {
    phase: VerificationPhase,
    reference_provided: bool,
    test_provided: bool,
    decision: Option<VerificationResult>,
    analysis: RunGeneration,
    distribution: OutcomeDistribution<VerificationDecision>,
    synthesizer: MetricSynthesizer,
}

impl VerificationWorkflow {
    pub fn new(
        distribution: OutcomeDistribution<VerificationDecision>,
        synthesizer: MetricSynthesizer,
    ) -> Self {
        Self {
            phase: VerificationPhase::AwaitingSamples,
            reference_provided: false,
            test_provided: false,
            decision: None,
            analysis: RunGeneration::new(),
            distribution,
            synthesizer,
        }
    }

    /// Mark one sample as provided; repeated uploads before a run are harmless
    pub fn provide(&mut self, slot: SampleSlot) -> Result<VerificationPhase, WorkflowError> {
        match self.phase {
            VerificationPhase::AwaitingSamples | VerificationPhase::Ready => {}
            phase => {
                let action = match slot {
                    SampleSlot::Reference => "provide reference sample",
                    SampleSlot::Test => "provide test sample",
                };
                return Err(WorkflowError::invalid(WORKFLOW, action, phase.as_str()));
            }
        }

        match slot {
            SampleSlot::Reference => self.reference_provided = true,
            SampleSlot::Test => self.test_provided = true,
        }

        if self.reference_provided && self.test_provided && self.phase != VerificationPhase::Ready {
            self.phase = VerificationPhase::Ready;
            log::info!("Verification: both samples provided, ready");
        }
        Ok(self.phase)
    }

    pub fn provide_reference(&mut self) -> Result<VerificationPhase, WorkflowError> {
        self.provide(SampleSlot::Reference)
    }

    pub fn provide_test(&mut self) -> Result<VerificationPhase, WorkflowError> {
        self.provide(SampleSlot::Test)
    }

    /// Ready -> Analyzing. Token gates the delayed decision.
    pub fn run(&mut self) -> Result<RunToken, WorkflowError> {
        match self.phase {
            VerificationPhase::Ready => {}
            VerificationPhase::AwaitingSamples => {
                return Err(WorkflowError::SamplesMissing {
                    reference: self.reference_provided,
                    test: self.test_provided,
                });
            }
            phase => return Err(WorkflowError::invalid(WORKFLOW, "run", phase.as_str())),
        }
        self.phase = VerificationPhase::Analyzing;
        let token = self.analysis.start();
        log::info!("Verification: analyzing samples ({})", token);
        Ok(token)
    }

    /// Analyzing -> Decided; sample + synthesize exactly once per run
    pub fn complete(
        &mut self,
        token: RunToken,
        rng: &mut dyn RandomSource,
    ) -> Option<VerificationResult> {
        if self.phase != VerificationPhase::Analyzing || !self.analysis.is_current(token) {
            log::debug!("Verification: dropping stale completion ({})", token);
            return None;
        }
        self.analysis.cancel();

        let decision = self.distribution.sample(rng);
        let metrics = self.synthesizer.verification(decision, rng);
        let result = AnalysisResult::new(decision, metrics);

        log::info!(
            "Verification: {} (cosine {:.2}, probability {}%)",
            decision.label(),
            metrics.cosine_similarity,
            metrics.match_probability
        );

        self.decision = Some(result.clone());
        self.phase = VerificationPhase::Decided;
        Some(result)
    }

    /// Back to AwaitingSamples with both flags cleared; invalidates a pending run.
    ///
    /// Returns false when nothing was there to reset.
    pub fn reset(&mut self) -> bool {
        let pristine = self.phase == VerificationPhase::AwaitingSamples
            && !self.reference_provided
            && !self.test_provided;
        if pristine {
            return false;
        }
        if self.phase == VerificationPhase::Analyzing {
            log::info!("Verification: reset while analyzing, pending run discarded");
        }
        self.analysis.cancel();
        self.phase = VerificationPhase::AwaitingSamples;
        self.reference_provided = false;
        self.test_provided = false;
        self.decision = None;
        true
    }

    pub fn phase(&self) -> VerificationPhase {
        self.phase
    }

    pub fn decision(&self) -> Option<&VerificationResult> {
        self.decision.as_ref()
    }

    pub fn snapshot(&self) -> VerificationSnapshot {
        VerificationSnapshot {
            phase: self.phase,
            reference_provided: self.reference_provided,
            test_provided: self.test_provided,
            decision: self.decision.clone(),
        }
    }
}

impl Default for VerificationWorkflow {
    fn default() -> Self {
        Self::new(OutcomeDistribution::default(), MetricSynthesizer::default())
    }
}
