//! Detection Workflow - Idle -> Recording -> Processing -> Result -> Idle
//!
//! Recording has a per-second elapsed counter; Processing resolves after a
//! fixed delay by sampling a verdict and synthesizing its metrics once.

use serde::{Deserialize, Serialize};

use crate::logic::error::WorkflowError;
use crate::logic::generation::{RunGeneration, RunToken};
use crate::logic::outcome::{
    AnalysisResult, DetectionResult, DetectionVerdict, MetricSynthesizer, OutcomeDistribution,
};
use crate::logic::random::RandomSource;

const WORKFLOW: &str = "detection";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionPhase {
    Idle,
    Recording,
    Processing,
    Result,
}

impl DetectionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionPhase::Idle => "idle",
            DetectionPhase::Recording => "recording",
            DetectionPhase::Processing => "processing",
            DetectionPhase::Result => "result",
        }
    }
}

impl std::fmt::Display for DetectionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Read-only view for the detection screen
#[derive(Debug, Clone, Serialize)]
pub struct DetectionSnapshot {
    pub phase: DetectionPhase,
    pub elapsed_secs: u32,
    /// `mm:ss`
    pub elapsed_display: String,
    pub result: Option<DetectionResult>,
}

#[derive(Debug, Clone)]
pub struct DetectionWorkflow {
    phase: DetectionPhase,
    elapsed_secs: u32,
    result: Option<DetectionResult>,
    recording: RunGeneration,
    processing: RunGeneration,
    distribution: OutcomeDistribution<DetectionVerdict>,
    synthesizer: MetricSynthesizer,
}

impl DetectionWorkflow {
    pub fn new(
        distribution: OutcomeDistribution<DetectionVerdict>,
        synthesizer: MetricSynthesizer,
    ) -> Self {
        Self {
            phase: DetectionPhase::Idle,
            elapsed_secs: 0,
            result: None,
            recording: RunGeneration::new(),
            processing: RunGeneration::new(),
            distribution,
            synthesizer,
        }
    }

    /// Idle -> Recording. Token drives the elapsed counter.
    pub fn start(&mut self) -> Result<RunToken, WorkflowError> {
        if self.phase != DetectionPhase::Idle {
            return Err(WorkflowError::invalid(WORKFLOW, "start capture", self.phase.as_str()));
        }
        self.phase = DetectionPhase::Recording;
        self.elapsed_secs = 0;
        self.result = None;
        let token = self.recording.start();
        log::info!("Detection: recording started ({})", token);
        Ok(token)
    }

    /// Elapsed-second callback; returns the new count, or None for a stale token
    pub fn tick(&mut self, token: RunToken) -> Option<u32> {
        if self.phase != DetectionPhase::Recording || !self.recording.is_current(token) {
            log::debug!("Detection: dropping stale elapsed tick ({})", token);
            return None;
        }
        self.elapsed_secs += 1;
        Some(self.elapsed_secs)
    }

    /// Recording -> Processing. Token gates the delayed completion.
    pub fn stop(&mut self) -> Result<RunToken, WorkflowError> {
        if self.phase != DetectionPhase::Recording {
            return Err(WorkflowError::invalid(WORKFLOW, "stop capture", self.phase.as_str()));
        }
        self.recording.cancel();
        self.phase = DetectionPhase::Processing;
        let token = self.processing.start();
        log::info!(
            "Detection: captured {}s of audio, analyzing ({})",
            self.elapsed_secs,
            token
        );
        Ok(token)
    }

    /// Processing -> Result; sample + synthesize exactly once per run
    pub fn complete(
        &mut self,
        token: RunToken,
        rng: &mut dyn RandomSource,
    ) -> Option<DetectionResult> {
        if self.phase != DetectionPhase::Processing || !self.processing.is_current(token) {
            log::debug!("Detection: dropping stale completion ({})", token);
            return None;
        }
        self.processing.cancel();

        let verdict = self.distribution.sample(rng);
        let metrics = self.synthesizer.detection(verdict, rng);
        let result = AnalysisResult::new(verdict, metrics);

        log::info!(
            "Detection: {} (confidence {}%, speaker match {}%)",
            verdict.label(),
            metrics.confidence,
            metrics.speaker_match
        );

        self.result = Some(result.clone());
        self.phase = DetectionPhase::Result;
        Some(result)
    }

    /// Back to Idle from any phase; invalidates pending timers.
    ///
    /// Returns false when already idle.
    pub fn reset(&mut self) -> bool {
        if self.phase == DetectionPhase::Idle {
            return false;
        }
        if self.phase != DetectionPhase::Result {
            log::info!("Detection: reset while {}, pending run discarded", self.phase);
        }
        self.recording.cancel();
        self.processing.cancel();
        self.phase = DetectionPhase::Idle;
        self.elapsed_secs = 0;
        self.result = None;
        true
    }

    pub fn phase(&self) -> DetectionPhase {
        self.phase
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn result(&self) -> Option<&DetectionResult> {
        self.result.as_ref()
    }

    pub fn snapshot(&self) -> DetectionSnapshot {
        DetectionSnapshot {
            phase: self.phase,
            elapsed_secs: self.elapsed_secs,
            elapsed_display: format_elapsed(self.elapsed_secs),
            result: self.result.clone(),
        }
    }
}

impl Default for DetectionWorkflow {
    fn default() -> Self {
        Self::new(OutcomeDistribution::default(), MetricSynthesizer::default())
    }
}

/// `mm:ss`, minutes not capped at 59
pub fn format_elapsed(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
