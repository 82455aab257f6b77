//! Analysis history model
//!
//! In-memory, bounded log of completed analyses. Oldest entries are evicted
//! once capacity is reached.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use voiceshield_core::logic::outcome::{DetectionResult, VerificationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    Detection,
    Verification,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisLogEntry {
    /// Same id as the originating result
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub kind: AnalysisKind,
    pub verdict: &'static str,
    pub label: &'static str,
    /// Detection confidence or verification match probability (percent)
    pub confidence: u8,
}

impl AnalysisLogEntry {
    pub fn from_detection(result: &DetectionResult) -> Self {
        Self {
            id: result.id,
            recorded_at: result.completed_at,
            kind: AnalysisKind::Detection,
            verdict: result.category.as_str(),
            label: result.category.label(),
            confidence: result.metrics.confidence,
        }
    }

    pub fn from_verification(result: &VerificationResult) -> Self {
        Self {
            id: result.id,
            recorded_at: result.completed_at,
            kind: AnalysisKind::Verification,
            verdict: result.category.as_str(),
            label: result.category.label(),
            confidence: result.metrics.match_probability,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct HistoryFilter {
    pub kind: Option<AnalysisKind>,
    pub limit: Option<usize>,
}

/// Shared handle, cheap to clone
#[derive(Debug, Clone)]
pub struct AnalysisLog {
    entries: Arc<RwLock<VecDeque<AnalysisLogEntry>>>,
    capacity: usize,
}

impl AnalysisLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn record(&self, entry: AnalysisLogEntry) {
        let mut entries = self.entries.write();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        tracing::debug!("History: recorded {:?} {} ({})", entry.kind, entry.verdict, entry.id);
        entries.push_back(entry);
    }

    /// Newest first
    pub fn list(&self, filter: &HistoryFilter) -> Vec<AnalysisLogEntry> {
        let entries = self.entries.read();
        entries
            .iter()
            .rev()
            .filter(|e| filter.kind.map_or(true, |k| e.kind == k))
            .take(filter.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }

    pub fn find_by_id(&self, id: Uuid) -> Option<AnalysisLogEntry> {
        self.entries.read().iter().find(|e| e.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
