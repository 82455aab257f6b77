//! Event Emitter - broadcast of dashboard state changes
//!
//! Cho phép emit events từ engine tới mọi subscriber (server, CLI, tests).
//! Không có subscriber thì event bị bỏ qua, không phải lỗi.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::logic::monitor::MonitorReading;
use crate::logic::outcome::{DetectionResult, VerificationResult};
use crate::logic::workflow::{DetectionPhase, VerificationPhase};

/// Buffered events per subscriber before lagging
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Event names
pub mod names {
    pub const RISK_SAMPLED: &str = "monitor:sampled";
    pub const ALERT_RAISED: &str = "monitor:alert-raised";
    pub const ALERT_CLEARED: &str = "monitor:alert-cleared";
    pub const DETECTION_PHASE: &str = "detection:phase";
    pub const DETECTION_COMPLETED: &str = "detection:completed";
    pub const VERIFICATION_PHASE: &str = "verification:phase";
    pub const VERIFICATION_COMPLETED: &str = "verification:completed";
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum DashboardEvent {
    RiskSampled(MonitorReading),
    AlertRaised(MonitorReading),
    AlertCleared(MonitorReading),
    DetectionPhaseChanged { phase: DetectionPhase, elapsed_secs: u32 },
    DetectionCompleted(DetectionResult),
    VerificationPhaseChanged { phase: VerificationPhase },
    VerificationCompleted(VerificationResult),
}

impl DashboardEvent {
    pub fn name(&self) -> &'static str {
        match self {
            DashboardEvent::RiskSampled(_) => names::RISK_SAMPLED,
            DashboardEvent::AlertRaised(_) => names::ALERT_RAISED,
            DashboardEvent::AlertCleared(_) => names::ALERT_CLEARED,
            DashboardEvent::DetectionPhaseChanged { .. } => names::DETECTION_PHASE,
            DashboardEvent::DetectionCompleted(_) => names::DETECTION_COMPLETED,
            DashboardEvent::VerificationPhaseChanged { .. } => names::VERIFICATION_PHASE,
            DashboardEvent::VerificationCompleted(_) => names::VERIFICATION_COMPLETED,
        }
    }
}

/// Fan-out bus
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DashboardEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Emit event to all listeners
    pub fn emit(&self, event: DashboardEvent) {
        let name = event.name();
        if self.sender.send(event).is_err() {
            log::trace!("No subscribers, event '{}' dropped", name);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.emit(DashboardEvent::VerificationPhaseChanged {
            phase: VerificationPhase::Ready,
        });
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_subscriber_receives() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        bus.emit(DashboardEvent::DetectionPhaseChanged {
            phase: DetectionPhase::Recording,
            elapsed_secs: 0,
        });

        let event = rx.try_recv().unwrap();
        assert_eq!(event.name(), names::DETECTION_PHASE);
    }

    #[test]
    fn test_event_json_shape() {
        let event = DashboardEvent::VerificationPhaseChanged {
            phase: VerificationPhase::AwaitingSamples,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "verification_phase_changed");
        assert_eq!(json["payload"]["phase"], "awaiting_samples");
    }
}
