//! Dashboard Engine - drives the simulation on Tokio timers
//!
//! Owns the risk monitor, both workflows, the random source and one timer
//! slot per timer. All state lives behind a single mutex, so callbacks and
//! user events are serialized. Timer tasks only hold a weak reference: once
//! the last engine handle is dropped the state (and its timer slots) go away
//! and the tasks are aborted.
//!
//! Every `start_*`/`stop_*`/`run_*` method spawns Tokio tasks and must be
//! called from inside a Tokio runtime.

pub mod timer;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::logic::config::{SettingsPatch, SimulationConfig};
use crate::logic::error::{ConfigError, WorkflowError};
use crate::logic::events::{DashboardEvent, EventBus};
use crate::logic::forensic::{self, ForensicReport};
use crate::logic::generation::RunToken;
use crate::logic::monitor::{AlertTransition, MonitorSnapshot, RiskMonitor};
use crate::logic::outcome::MetricSynthesizer;
use crate::logic::random::{RandomSource, SimRng};
use crate::logic::workflow::{
    DetectionPhase, DetectionSnapshot, DetectionWorkflow, SampleSlot, VerificationSnapshot,
    VerificationWorkflow,
};

use timer::TimerSlot;

// ============================================================================
// STATE
// ============================================================================

struct Timers {
    monitor: TimerSlot,
    recording: TimerSlot,
    processing: TimerSlot,
    analysis: TimerSlot,
}

impl Timers {
    fn new() -> Self {
        Self {
            monitor: TimerSlot::new("monitor-tick"),
            recording: TimerSlot::new("recording-elapsed"),
            processing: TimerSlot::new("detection-processing"),
            analysis: TimerSlot::new("verification-analysis"),
        }
    }
}

struct EngineState {
    config: SimulationConfig,
    monitor: RiskMonitor,
    detection: DetectionWorkflow,
    verification: VerificationWorkflow,
    rng: Box<dyn RandomSource + Send>,
    timers: Timers,
}

/// Combined read-only view of every screen
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub monitor: MonitorSnapshot,
    pub detection: DetectionSnapshot,
    pub verification: VerificationSnapshot,
}

// ============================================================================
// ENGINE
// ============================================================================

/// Cloneable handle; all clones share the same state
#[derive(Clone)]
pub struct DashboardEngine {
    state: Arc<Mutex<EngineState>>,
    events: EventBus,
}

impl DashboardEngine {
    /// Engine with the configured seed (or entropy)
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        let rng = SimRng::from_seed_opt(config.seed);
        Self::with_source(config, Box::new(rng))
    }

    /// Engine with an injected random source
    pub fn with_source(
        config: SimulationConfig,
        rng: Box<dyn RandomSource + Send>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let synthesizer = MetricSynthesizer::new(config.metrics.clone());
        let state = EngineState {
            monitor: RiskMonitor::new(&config.monitor),
            detection: DetectionWorkflow::new(config.workflows.detection.clone(), synthesizer.clone()),
            verification: VerificationWorkflow::new(config.workflows.verification.clone(), synthesizer),
            rng,
            timers: Timers::new(),
            config,
        };

        log::info!(
            "Dashboard engine ready (tick {}ms, processing {}ms, alert > {}%)",
            state.config.monitor.tick_interval_ms,
            state.config.workflows.processing_delay_ms,
            state.config.monitor.thresholds.alert_above
        );

        Ok(Self {
            state: Arc::new(Mutex::new(state)),
            events: EventBus::new(),
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    pub fn config(&self) -> SimulationConfig {
        self.state.lock().config.clone()
    }

    // ------------------------------------------------------------------------
    // Continuous monitoring
    // ------------------------------------------------------------------------

    pub fn start_monitoring(&self) -> Result<MonitorSnapshot, WorkflowError> {
        let mut st = self.state.lock();
        let token = st.monitor.start()?;
        let handle = self.spawn_monitor_loop(token, st.config.tick_interval());
        st.timers.monitor.arm(handle);
        Ok(st.monitor.snapshot())
    }

    /// Returns false if monitoring was not running
    pub fn stop_monitoring(&self) -> bool {
        let mut st = self.state.lock();
        st.timers.monitor.cancel();
        st.monitor.stop()
    }

    pub fn monitor_snapshot(&self) -> MonitorSnapshot {
        self.state.lock().monitor.snapshot()
    }

    fn spawn_monitor_loop(&self, token: RunToken, period: Duration) -> JoinHandle<()> {
        let weak = Arc::downgrade(&self.state);
        let events = self.events.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                let Some(state) = weak.upgrade() else { break };

                let tick = {
                    let mut guard = state.lock();
                    let st = &mut *guard;
                    st.monitor.tick(token, st.rng.as_mut())
                };
                let Some(tick) = tick else { break };

                events.emit(DashboardEvent::RiskSampled(tick.reading));
                match tick.transition {
                    AlertTransition::Raised => events.emit(DashboardEvent::AlertRaised(tick.reading)),
                    AlertTransition::Cleared => events.emit(DashboardEvent::AlertCleared(tick.reading)),
                    AlertTransition::Unchanged => {}
                }
            }
        })
    }

    // ------------------------------------------------------------------------
    // Live detection
    // ------------------------------------------------------------------------

    pub fn start_capture(&self) -> Result<DetectionSnapshot, WorkflowError> {
        let snapshot = {
            let mut st = self.state.lock();
            let token = st.detection.start()?;
            let handle = self.spawn_recording_counter(token, st.config.elapsed_tick());
            st.timers.recording.arm(handle);
            st.detection.snapshot()
        };
        self.emit_detection_phase(&snapshot);
        Ok(snapshot)
    }

    pub fn stop_capture(&self) -> Result<DetectionSnapshot, WorkflowError> {
        let snapshot = {
            let mut st = self.state.lock();
            let token = st.detection.stop()?;
            st.timers.recording.cancel();
            let handle = self.spawn_detection_completion(token, st.config.processing_delay());
            st.timers.processing.arm(handle);
            st.detection.snapshot()
        };
        self.emit_detection_phase(&snapshot);
        Ok(snapshot)
    }

    /// Always succeeds; resetting an idle workflow changes nothing
    pub fn reset_detection(&self) -> DetectionSnapshot {
        let (changed, snapshot) = {
            let mut st = self.state.lock();
            st.timers.recording.cancel();
            st.timers.processing.cancel();
            let changed = st.detection.reset();
            (changed, st.detection.snapshot())
        };
        if changed {
            self.emit_detection_phase(&snapshot);
        }
        snapshot
    }

    pub fn detection_snapshot(&self) -> DetectionSnapshot {
        self.state.lock().detection.snapshot()
    }

    fn emit_detection_phase(&self, snapshot: &DetectionSnapshot) {
        self.events.emit(DashboardEvent::DetectionPhaseChanged {
            phase: snapshot.phase,
            elapsed_secs: snapshot.elapsed_secs,
        });
    }

    fn spawn_recording_counter(&self, token: RunToken, period: Duration) -> JoinHandle<()> {
        let weak = Arc::downgrade(&self.state);
        let events = self.events.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                let Some(state) = weak.upgrade() else { break };

                let elapsed = state.lock().detection.tick(token);
                let Some(elapsed_secs) = elapsed else { break };

                events.emit(DashboardEvent::DetectionPhaseChanged {
                    phase: DetectionPhase::Recording,
                    elapsed_secs,
                });
            }
        })
    }

    fn spawn_detection_completion(&self, token: RunToken, delay: Duration) -> JoinHandle<()> {
        let weak = Arc::downgrade(&self.state);
        let events = self.events.clone();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(state) = weak.upgrade() else { return };

            let outcome = {
                let mut guard = state.lock();
                let st = &mut *guard;
                st.detection
                    .complete(token, st.rng.as_mut())
                    .map(|result| (result, st.detection.snapshot()))
            };

            if let Some((result, snapshot)) = outcome {
                events.emit(DashboardEvent::DetectionCompleted(result));
                events.emit(DashboardEvent::DetectionPhaseChanged {
                    phase: snapshot.phase,
                    elapsed_secs: snapshot.elapsed_secs,
                });
            }
        })
    }

    // ------------------------------------------------------------------------
    // Speaker verification
    // ------------------------------------------------------------------------

    pub fn provide_sample(&self, slot: SampleSlot) -> Result<VerificationSnapshot, WorkflowError> {
        let (before, snapshot) = {
            let mut st = self.state.lock();
            let before = st.verification.phase();
            st.verification.provide(slot)?;
            (before, st.verification.snapshot())
        };
        if before != snapshot.phase {
            self.emit_verification_phase(&snapshot);
        }
        Ok(snapshot)
    }

    pub fn provide_reference_sample(&self) -> Result<VerificationSnapshot, WorkflowError> {
        self.provide_sample(SampleSlot::Reference)
    }

    pub fn provide_test_sample(&self) -> Result<VerificationSnapshot, WorkflowError> {
        self.provide_sample(SampleSlot::Test)
    }

    pub fn run_verification(&self) -> Result<VerificationSnapshot, WorkflowError> {
        let snapshot = {
            let mut st = self.state.lock();
            let token = st.verification.run()?;
            let handle = self.spawn_verification_completion(token, st.config.processing_delay());
            st.timers.analysis.arm(handle);
            st.verification.snapshot()
        };
        self.emit_verification_phase(&snapshot);
        Ok(snapshot)
    }

    /// Always succeeds; clears both sample flags and any decision
    pub fn reset_verification(&self) -> VerificationSnapshot {
        let (changed, snapshot) = {
            let mut st = self.state.lock();
            st.timers.analysis.cancel();
            let changed = st.verification.reset();
            (changed, st.verification.snapshot())
        };
        if changed {
            self.emit_verification_phase(&snapshot);
        }
        snapshot
    }

    pub fn verification_snapshot(&self) -> VerificationSnapshot {
        self.state.lock().verification.snapshot()
    }

    fn emit_verification_phase(&self, snapshot: &VerificationSnapshot) {
        self.events.emit(DashboardEvent::VerificationPhaseChanged { phase: snapshot.phase });
    }

    fn spawn_verification_completion(&self, token: RunToken, delay: Duration) -> JoinHandle<()> {
        let weak = Arc::downgrade(&self.state);
        let events = self.events.clone();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(state) = weak.upgrade() else { return };

            let outcome = {
                let mut guard = state.lock();
                let st = &mut *guard;
                st.verification
                    .complete(token, st.rng.as_mut())
                    .map(|result| (result, st.verification.phase()))
            };

            if let Some((result, phase)) = outcome {
                events.emit(DashboardEvent::VerificationCompleted(result));
                events.emit(DashboardEvent::VerificationPhaseChanged { phase });
            }
        })
    }

    // ------------------------------------------------------------------------
    // Misc views & settings
    // ------------------------------------------------------------------------

    pub fn snapshot(&self) -> DashboardSnapshot {
        let st = self.state.lock();
        DashboardSnapshot {
            monitor: st.monitor.snapshot(),
            detection: st.detection.snapshot(),
            verification: st.verification.snapshot(),
        }
    }

    /// Fresh randomized forensic report
    pub fn forensic_report(&self) -> ForensicReport {
        let mut st = self.state.lock();
        forensic::generate(st.rng.as_mut())
    }

    /// Apply a validated settings patch; a running monitor picks up a new interval
    pub fn apply_settings(&self, patch: &SettingsPatch) -> Result<SimulationConfig, ConfigError> {
        let (config, transition, reading) = {
            let mut st = self.state.lock();
            let next = patch.applied_to(&st.config)?;
            let interval_changed =
                next.monitor.tick_interval_ms != st.config.monitor.tick_interval_ms;

            let transition = st.monitor.reconfigure(&next.monitor);
            st.config = next;

            if interval_changed && st.monitor.is_running() {
                st.timers.monitor.cancel();
                st.monitor.stop();
                // cannot fail: just stopped
                if let Ok(token) = st.monitor.start() {
                    let handle = self.spawn_monitor_loop(token, st.config.tick_interval());
                    st.timers.monitor.arm(handle);
                }
            }

            (st.config.clone(), transition, *st.monitor.current())
        };

        match transition {
            AlertTransition::Raised => self.events.emit(DashboardEvent::AlertRaised(reading)),
            AlertTransition::Cleared => self.events.emit(DashboardEvent::AlertCleared(reading)),
            AlertTransition::Unchanged => {}
        }

        log::info!("Settings updated: {:?}", patch);
        Ok(config)
    }

    /// Stop every timer and return both workflows to their initial phase
    pub fn shutdown(&self) {
        let mut st = self.state.lock();
        st.timers.monitor.cancel();
        st.timers.recording.cancel();
        st.timers.processing.cancel();
        st.timers.analysis.cancel();
        st.monitor.stop();
        st.detection.reset();
        st.verification.reset();
        log::info!("Dashboard engine shut down");
    }
}
