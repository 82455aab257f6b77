//! VoiceShield Core - simulated voice-authenticity dashboard
//!
//! All numbers are synthetic: no audio is captured or analyzed.

pub mod constants;
pub mod logic;

pub use logic::config::{SettingsPatch, SimulationConfig};
pub use logic::engine::{DashboardEngine, DashboardSnapshot};
pub use logic::error::{ConfigError, WorkflowError};
pub use logic::events::DashboardEvent;
