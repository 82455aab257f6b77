//! Central Configuration Constants
//!
//! Single source of truth for all simulation defaults.
//! Every value here can be overridden through `SimulationConfig`.

/// Initial risk shown before the first tick
pub const DEFAULT_INITIAL_RISK: f64 = 15.0;

/// Resting point the risk signal reverts toward
pub const DEFAULT_BASELINE: f64 = 25.0;

/// Mean-reversion coefficient per tick
pub const DEFAULT_REVERSION: f64 = 0.08;

/// Half-width of the uniform noise band (+-)
pub const DEFAULT_NOISE_AMPLITUDE: f64 = 7.0;

/// Probability of an anomalous burst per tick
pub const DEFAULT_SHOCK_PROBABILITY: f64 = 0.05;

/// Size of an anomalous burst
pub const DEFAULT_SHOCK_MAGNITUDE: f64 = 30.0;

/// Samples kept for the timeline view
pub const DEFAULT_HISTORY_CAPACITY: usize = 30;

/// Risk tick interval (milliseconds)
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1500;

/// Recording counter interval (milliseconds)
pub const DEFAULT_ELAPSED_TICK_MS: u64 = 1000;

/// Delay between stop/run and the result (milliseconds)
pub const DEFAULT_PROCESSING_DELAY_MS: u64 = 2500;

/// Severity bands and alert threshold
pub const DEFAULT_MEDIUM_FROM: u8 = 40;
pub const DEFAULT_HIGH_FROM: u8 = 70;
pub const DEFAULT_ALERT_ABOVE: u8 = 70;

/// Cosmetic descriptors shown on the settings view
pub const MODEL_VERSION: &str = "v2.4.1";
pub const SAMPLE_RATE: &str = "48kHz";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "VoiceShield";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Read a parseable value from the environment or use the default
pub fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

/// Read an optional parseable value from the environment
pub fn env_opt<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

/// Read a boolean flag ("false"/"0" disable, anything else enables)
pub fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|s| s.to_lowercase() != "false" && s != "0")
        .unwrap_or(default)
}
