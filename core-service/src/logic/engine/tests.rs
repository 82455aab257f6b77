use std::time::Duration;

use tokio::time::sleep;

use super::*;
use crate::logic::events::names;
use crate::logic::outcome::{DetectionVerdict, VerificationDecision};
use crate::logic::random::ScriptedSource;
use crate::logic::workflow::VerificationPhase;

/// Constant 0.5 draws: zero noise, no shock, Genuine / Match outcomes
fn engine() -> DashboardEngine {
    engine_with(SimulationConfig::default())
}

fn engine_with(config: SimulationConfig) -> DashboardEngine {
    DashboardEngine::with_source(config, Box::new(ScriptedSource::constant(0.5))).unwrap()
}

// ============================================================================
// MONITORING
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_monitor_ticks_on_interval() {
    let engine = engine();
    let snap = engine.start_monitoring().unwrap();
    assert!(snap.running);
    assert_eq!(snap.history, vec![crate::logic::monitor::RiskSample::new(15)]);

    sleep(Duration::from_millis(4600)).await;

    let snap = engine.monitor_snapshot();
    assert_eq!(snap.ticks, 3);
    assert_eq!(snap.history.len(), 4);
    // 15 -> 15.8 -> 16 pulled toward 25 each step
    assert_eq!(snap.history[1].value(), 16);
    assert!(!snap.alert_active);
}

#[tokio::test(start_paused = true)]
async fn test_monitor_double_start_rejected() {
    let engine = engine();
    engine.start_monitoring().unwrap();
    assert_eq!(
        engine.start_monitoring().unwrap_err(),
        WorkflowError::MonitorAlreadyRunning
    );
}

#[tokio::test(start_paused = true)]
async fn test_stop_monitoring_halts_ticks() {
    let engine = engine();
    engine.start_monitoring().unwrap();
    sleep(Duration::from_millis(1600)).await;
    assert!(engine.stop_monitoring());
    assert!(!engine.stop_monitoring());

    sleep(Duration::from_secs(10)).await;
    let snap = engine.monitor_snapshot();
    assert!(!snap.running);
    assert_eq!(snap.ticks, 1);
}

#[tokio::test(start_paused = true)]
async fn test_alert_raised_event() {
    let mut config = SimulationConfig::default();
    config.monitor.initial_risk = 60.0;
    config.monitor.walk.baseline = 100.0;
    config.monitor.walk.reversion = 0.5;
    let engine = engine_with(config);
    let mut rx = engine.subscribe();

    engine.start_monitoring().unwrap();

    let first = rx.recv().await.unwrap();
    let DashboardEvent::RiskSampled(reading) = first else {
        panic!("expected a sample, got {:?}", first);
    };
    assert_eq!(reading.sample.value(), 80);

    match rx.recv().await.unwrap() {
        DashboardEvent::AlertRaised(reading) => assert!(reading.alert.active),
        other => panic!("expected alert, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_apply_settings_restarts_loop_with_new_interval() {
    let engine = engine();
    engine.start_monitoring().unwrap();

    let patch = SettingsPatch {
        alert_threshold: Some(10),
        tick_interval_ms: Some(500),
        ..Default::default()
    };
    let config = engine.apply_settings(&patch).unwrap();
    assert_eq!(config.monitor.tick_interval_ms, 500);

    // view re-derived against the new threshold before any tick
    let snap = engine.monitor_snapshot();
    assert!(snap.alert_active);
    assert_eq!(snap.alert_threshold, 10);

    sleep(Duration::from_millis(1100)).await;
    let snap = engine.monitor_snapshot();
    assert!(snap.running);
    assert_eq!(snap.ticks, 2);
    assert_eq!(snap.tick_interval_ms, 500);
}

#[tokio::test(start_paused = true)]
async fn test_threshold_change_emits_alert_transitions() {
    let mut config = SimulationConfig::default();
    config.monitor.initial_risk = 60.0;
    config.monitor.walk.baseline = 60.0;
    let engine = engine_with(config);
    let mut rx = engine.subscribe();
    engine.start_monitoring().unwrap();

    let lowered = SettingsPatch { alert_threshold: Some(50), ..Default::default() };
    engine.apply_settings(&lowered).unwrap();
    assert!(engine.monitor_snapshot().alert_active);

    match rx.try_recv().unwrap() {
        DashboardEvent::AlertRaised(reading) => {
            assert_eq!(reading.sample.value(), 60);
            assert!(reading.alert.active);
        }
        other => panic!("expected alert, got {:?}", other),
    }

    // steady at 60: ticks only sample, no further transitions
    sleep(Duration::from_millis(4600)).await;
    let mut names = Vec::new();
    while let Ok(event) = rx.try_recv() {
        names.push(event.name());
    }
    assert_eq!(names, vec![names::RISK_SAMPLED; 3]);

    let restored = SettingsPatch { alert_threshold: Some(70), ..Default::default() };
    engine.apply_settings(&restored).unwrap();
    assert!(matches!(rx.try_recv().unwrap(), DashboardEvent::AlertCleared(_)));
    assert!(!engine.monitor_snapshot().alert_active);
}

#[tokio::test(start_paused = true)]
async fn test_apply_settings_rejects_invalid_patch() {
    let engine = engine();
    let bad = SettingsPatch {
        shock_probability: Some(3.0),
        ..Default::default()
    };
    assert!(engine.apply_settings(&bad).is_err());
    assert_eq!(engine.config(), SimulationConfig::default());
}

// ============================================================================
// DETECTION
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_detection_full_flow() {
    let engine = engine();
    engine.start_capture().unwrap();

    sleep(Duration::from_millis(3500)).await;
    let snap = engine.detection_snapshot();
    assert_eq!(snap.phase, DetectionPhase::Recording);
    assert_eq!(snap.elapsed_secs, 3);
    assert_eq!(snap.elapsed_display, "00:03");

    let snap = engine.stop_capture().unwrap();
    assert_eq!(snap.phase, DetectionPhase::Processing);
    assert!(snap.result.is_none());

    sleep(Duration::from_millis(2400)).await;
    assert_eq!(engine.detection_snapshot().phase, DetectionPhase::Processing);

    sleep(Duration::from_millis(200)).await;
    let snap = engine.detection_snapshot();
    assert_eq!(snap.phase, DetectionPhase::Result);
    // counter froze at stop
    assert_eq!(snap.elapsed_secs, 3);
    let result = snap.result.unwrap();
    assert_eq!(result.category, DetectionVerdict::Genuine);
}

#[tokio::test(start_paused = true)]
async fn test_detection_invalid_transitions() {
    let engine = engine();
    assert!(engine.stop_capture().is_err());
    engine.start_capture().unwrap();
    assert!(engine.start_capture().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_reset_during_processing_discards_pending_result() {
    let engine = engine();
    engine.start_capture().unwrap();
    sleep(Duration::from_millis(1200)).await;
    engine.stop_capture().unwrap();

    let snap = engine.reset_detection();
    assert_eq!(snap.phase, DetectionPhase::Idle);
    engine.start_capture().unwrap();

    // past the old processing deadline
    sleep(Duration::from_millis(3300)).await;
    let snap = engine.detection_snapshot();
    assert_eq!(snap.phase, DetectionPhase::Recording);
    assert!(snap.result.is_none());
    assert_eq!(snap.elapsed_secs, 3);
}

#[tokio::test(start_paused = true)]
async fn test_detection_events() {
    let engine = engine();
    let mut rx = engine.subscribe();

    engine.start_capture().unwrap();
    sleep(Duration::from_millis(1100)).await;
    engine.stop_capture().unwrap();

    let mut phases = Vec::new();
    let completed = loop {
        match rx.recv().await.unwrap() {
            DashboardEvent::DetectionPhaseChanged { phase, .. } => phases.push(phase),
            DashboardEvent::DetectionCompleted(result) => break result,
            other => panic!("unexpected event {:?}", other),
        }
    };

    assert_eq!(completed.category, DetectionVerdict::Genuine);
    assert_eq!(
        phases,
        vec![
            DetectionPhase::Recording,
            DetectionPhase::Recording,
            DetectionPhase::Processing
        ]
    );
    match rx.recv().await.unwrap() {
        DashboardEvent::DetectionPhaseChanged { phase, .. } => {
            assert_eq!(phase, DetectionPhase::Result)
        }
        other => panic!("unexpected event {:?}", other),
    }
}

// ============================================================================
// VERIFICATION
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_verification_full_flow() {
    let engine = engine();
    assert!(matches!(
        engine.run_verification(),
        Err(WorkflowError::SamplesMissing { reference: false, test: false })
    ));

    let snap = engine.provide_reference_sample().unwrap();
    assert_eq!(snap.phase, VerificationPhase::AwaitingSamples);
    let snap = engine.provide_test_sample().unwrap();
    assert_eq!(snap.phase, VerificationPhase::Ready);

    let snap = engine.run_verification().unwrap();
    assert_eq!(snap.phase, VerificationPhase::Analyzing);
    assert!(engine.provide_test_sample().is_err());

    sleep(Duration::from_millis(2600)).await;
    let snap = engine.verification_snapshot();
    assert_eq!(snap.phase, VerificationPhase::Decided);
    let decision = snap.decision.unwrap();
    assert_eq!(decision.category, VerificationDecision::Match);
    assert!(decision.metrics.match_probability >= 95);

    let snap = engine.reset_verification();
    assert_eq!(snap.phase, VerificationPhase::AwaitingSamples);
    assert!(!snap.reference_provided && !snap.test_provided);
}

#[tokio::test(start_paused = true)]
async fn test_verification_reset_while_analyzing() {
    let engine = engine();
    engine.provide_reference_sample().unwrap();
    engine.provide_test_sample().unwrap();
    engine.run_verification().unwrap();
    engine.reset_verification();

    sleep(Duration::from_secs(5)).await;
    let snap = engine.verification_snapshot();
    assert_eq!(snap.phase, VerificationPhase::AwaitingSamples);
    assert!(snap.decision.is_none());
}

// ============================================================================
// MISC
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_everything() {
    let engine = engine();
    engine.start_monitoring().unwrap();
    engine.start_capture().unwrap();

    engine.shutdown();
    sleep(Duration::from_secs(5)).await;

    let snap = engine.snapshot();
    assert!(!snap.monitor.running);
    assert_eq!(snap.monitor.ticks, 0);
    assert_eq!(snap.detection.phase, DetectionPhase::Idle);
}

#[test]
fn test_invalid_config_rejected() {
    let mut config = SimulationConfig::default();
    config.monitor.tick_interval_ms = 0;
    assert!(DashboardEngine::new(config).is_err());
}

#[test]
fn test_forensic_report_uses_engine_source() {
    let engine = engine();
    let report = engine.forensic_report();
    // constant 0.5: nothing anomalous, all heat cells Low
    assert_eq!(report.spectrogram_anomalies, 0);
}
