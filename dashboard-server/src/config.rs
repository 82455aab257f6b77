//! Configuration module

use std::env;

use voiceshield_core::constants::env_flag;
use voiceshield_core::{ConfigError, SimulationConfig};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Completed analyses kept in the history log
    pub history_log_capacity: usize,

    /// Start the risk monitor on boot
    pub auto_start_monitoring: bool,

    /// Simulation parameters (`VOICESHIELD_*`)
    pub simulation: SimulationConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),

            history_log_capacity: env::var("HISTORY_LOG_CAPACITY")
                .ok()
                .and_then(|c| c.parse().ok())
                .filter(|c| *c > 0)
                .unwrap_or(100),

            auto_start_monitoring: env_flag("AUTO_START_MONITORING", true),

            simulation: SimulationConfig::from_env()?,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            environment: "development".to_string(),
            history_log_capacity: 100,
            auto_start_monitoring: true,
            simulation: SimulationConfig::default(),
        }
    }
}
