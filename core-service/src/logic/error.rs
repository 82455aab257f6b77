//! Error types for workflow protocol violations and invalid configuration

use thiserror::Error;

use super::outcome::DistributionError;

/// Rejected event; state is left untouched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("cannot {action} while {workflow} is {phase}")]
    InvalidTransition {
        workflow: &'static str,
        action: &'static str,
        phase: &'static str,
    },

    #[error("verification needs both samples (reference: {reference}, test: {test})")]
    SamplesMissing { reference: bool, test: bool },

    #[error("risk monitor is already running")]
    MonitorAlreadyRunning,
}

impl WorkflowError {
    pub(crate) fn invalid(workflow: &'static str, action: &'static str, phase: &'static str) -> Self {
        WorkflowError::InvalidTransition { workflow, action, phase }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid {workflow} distribution: {source}")]
    Distribution {
        workflow: &'static str,
        #[source]
        source: DistributionError,
    },

    #[error("{field} must be within {min}..={max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("alert bands are not ordered: medium_from={medium_from}, high_from={high_from}")]
    UnorderedBands { medium_from: u8, high_from: u8 },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}
