//! Monitor Module - Continuous voice risk monitoring
//!
//! Mô phỏng tín hiệu rủi ro liên tục: random walk có mean-reversion,
//! thỉnh thoảng có shock, cộng với cửa sổ lịch sử và cảnh báo.
//!
//! ## Structure
//! - `walk`: RiskSample + BoundedRandomWalk
//! - `history`: HistoryWindow (ring buffer, 30 samples)
//! - `alert`: AlertEvaluator (bands + strict threshold)

pub mod walk;
pub mod history;
pub mod alert;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants;
use crate::logic::error::WorkflowError;
use crate::logic::generation::{RunGeneration, RunToken};
use crate::logic::outcome::RiskLevel;
use crate::logic::random::RandomSource;

pub use alert::{AlertEvaluator, AlertState, AlertThresholds};
pub use history::HistoryWindow;
pub use walk::{BoundedRandomWalk, RiskSample, RiskStep, WalkParams};

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Value shown before the first tick
    pub initial_risk: f64,
    pub walk: WalkParams,
    pub thresholds: AlertThresholds,
    pub history_capacity: usize,
    pub tick_interval_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            initial_risk: constants::DEFAULT_INITIAL_RISK,
            walk: WalkParams::default(),
            thresholds: AlertThresholds::default(),
            history_capacity: constants::DEFAULT_HISTORY_CAPACITY,
            tick_interval_ms: constants::DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

// ============================================================================
// READINGS
// ============================================================================

/// Latest observed point plus its derived alert state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonitorReading {
    pub sample: RiskSample,
    pub raw: f64,
    pub alert: AlertState,
    pub shocked: bool,
    pub tick: u64,
    pub at: DateTime<Utc>,
}

impl MonitorReading {
    /// Needle angle: 0% = -90deg, 100% = +90deg
    pub fn gauge_angle(&self) -> f64 {
        -90.0 + self.sample.as_f64() / 100.0 * 180.0
    }
}

/// Alert flag change caused by a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertTransition {
    Raised,
    Cleared,
    Unchanged,
}

impl AlertTransition {
    pub fn between(was_active: bool, now_active: bool) -> Self {
        match (was_active, now_active) {
            (false, true) => AlertTransition::Raised,
            (true, false) => AlertTransition::Cleared,
            _ => AlertTransition::Unchanged,
        }
    }
}

/// Result of an accepted tick
#[derive(Debug, Clone, Copy)]
pub struct MonitorTick {
    pub reading: MonitorReading,
    pub transition: AlertTransition,
}

/// Read-only view for the monitoring and timeline screens
#[derive(Debug, Clone, Serialize)]
pub struct MonitorSnapshot {
    pub running: bool,
    pub risk: u8,
    pub raw: f64,
    pub severity: RiskLevel,
    pub label: &'static str,
    pub alert_active: bool,
    pub alert_threshold: u8,
    pub gauge_angle: f64,
    pub ticks: u64,
    pub tick_interval_ms: u64,
    pub history: Vec<RiskSample>,
}

// ============================================================================
// MONITOR
// ============================================================================

/// Risk process + history + alerting, advanced one tick at a time
#[derive(Debug, Clone)]
pub struct RiskMonitor {
    walk: BoundedRandomWalk,
    evaluator: AlertEvaluator,
    history: HistoryWindow,
    current: MonitorReading,
    runs: RunGeneration,
    tick_interval_ms: u64,
}

impl RiskMonitor {
    pub fn new(config: &MonitorConfig) -> Self {
        let evaluator = AlertEvaluator::new(config.thresholds);
        let raw = config.initial_risk.clamp(0.0, 100.0);
        let sample = RiskSample::from_raw(raw);
        let current = MonitorReading {
            sample,
            raw,
            alert: evaluator.evaluate(sample),
            shocked: false,
            tick: 0,
            at: Utc::now(),
        };

        let mut history = HistoryWindow::new(config.history_capacity);
        history.push(sample);

        Self {
            walk: BoundedRandomWalk::new(config.walk),
            evaluator,
            history,
            current,
            runs: RunGeneration::new(),
            tick_interval_ms: config.tick_interval_ms,
        }
    }

    /// Begin ticking; the token must accompany every tick
    pub fn start(&mut self) -> Result<RunToken, WorkflowError> {
        if self.runs.is_active() {
            return Err(WorkflowError::MonitorAlreadyRunning);
        }
        let token = self.runs.start();
        log::info!("Risk monitor started ({}, every {}ms)", token, self.tick_interval_ms);
        Ok(token)
    }

    /// Stop ticking; returns false if it was not running
    pub fn stop(&mut self) -> bool {
        if !self.runs.is_active() {
            return false;
        }
        self.runs.cancel();
        log::info!("Risk monitor stopped after {} ticks", self.current.tick);
        true
    }

    pub fn is_running(&self) -> bool {
        self.runs.is_active()
    }

    /// Timer callback; stale tokens are ignored
    pub fn tick(&mut self, token: RunToken, rng: &mut dyn RandomSource) -> Option<MonitorTick> {
        if !self.runs.is_current(token) {
            log::debug!("Dropping stale monitor tick ({})", token);
            return None;
        }
        Some(self.advance(rng))
    }

    /// One unguarded step of the process
    pub fn advance(&mut self, rng: &mut dyn RandomSource) -> MonitorTick {
        let step = self.walk.step(self.current.sample.as_f64(), rng);
        let alert = self.evaluator.evaluate(step.sample);

        let transition = AlertTransition::between(self.current.alert.active, alert.active);

        match transition {
            AlertTransition::Raised => log::warn!(
                "High risk alert: {} exceeds {}% threshold{}",
                step.sample,
                self.evaluator.thresholds().alert_above,
                if step.shocked { " (burst)" } else { "" }
            ),
            AlertTransition::Cleared => log::info!("Risk alert cleared at {}", step.sample),
            AlertTransition::Unchanged => {}
        }

        self.history.push(step.sample);
        self.current = MonitorReading {
            sample: step.sample,
            raw: step.raw,
            alert,
            shocked: step.shocked,
            tick: self.current.tick + 1,
            at: Utc::now(),
        };

        MonitorTick {
            reading: self.current,
            transition,
        }
    }

    /// Apply new walk/alert/history parameters; current sample and history are kept.
    ///
    /// The alert is re-derived against the new thresholds right away, so a
    /// threshold change alone can raise or clear it.
    pub fn reconfigure(&mut self, config: &MonitorConfig) -> AlertTransition {
        self.walk.set_params(config.walk);
        self.evaluator.set_thresholds(config.thresholds);
        self.history.set_capacity(config.history_capacity);
        self.tick_interval_ms = config.tick_interval_ms;

        let alert = self.evaluator.evaluate(self.current.sample);
        let transition = AlertTransition::between(self.current.alert.active, alert.active);
        match transition {
            AlertTransition::Raised => log::warn!(
                "High risk alert: {} exceeds new {}% threshold",
                self.current.sample,
                config.thresholds.alert_above
            ),
            AlertTransition::Cleared => log::info!(
                "Risk alert cleared at {}, threshold now {}%",
                self.current.sample,
                config.thresholds.alert_above
            ),
            AlertTransition::Unchanged => {}
        }
        self.current.alert = alert;
        transition
    }

    pub fn current(&self) -> &MonitorReading {
        &self.current
    }

    pub fn history(&self) -> &HistoryWindow {
        &self.history
    }

    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            running: self.is_running(),
            risk: self.current.sample.value(),
            raw: self.current.raw,
            severity: self.current.alert.severity,
            label: self.current.alert.label(),
            alert_active: self.current.alert.active,
            alert_threshold: self.evaluator.thresholds().alert_above,
            gauge_angle: self.current.gauge_angle(),
            ticks: self.current.tick,
            tick_interval_ms: self.tick_interval_ms,
            history: self.history.to_vec(),
        }
    }
}

impl Default for RiskMonitor {
    fn default() -> Self {
        Self::new(&MonitorConfig::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================
