//! Logic Module - Simulation Engines
//!
//! Chứa toàn bộ logic mô phỏng: risk monitor, detection/verification
//! workflows, outcome sampling và engine điều phối timers.
//!
//! ## Structure
//! - `monitor/` - Bounded random walk, history window, alerting
//! - `outcome/` - Categorical sampling & metric synthesis
//! - `workflow/` - Detection and verification state machines
//! - `engine/` - Tokio timers, event fan-out, settings

// Primitives
pub mod random;
pub mod generation;
pub mod error;
pub mod config;

// Simulation
pub mod monitor;
pub mod outcome;
pub mod workflow;
pub mod forensic;

// Runtime
pub mod events;
pub mod engine;
