//! HTTP handlers

pub mod health;
pub mod monitor;
pub mod detection;
pub mod verification;
pub mod forensics;
pub mod history;
pub mod settings;
