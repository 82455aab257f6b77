//! History Window - fixed-capacity timeline of recent risk samples
//!
//! Chronological, most recent last. Oldest evicted first.

use std::collections::VecDeque;

use super::walk::RiskSample;
use crate::constants::DEFAULT_HISTORY_CAPACITY;

#[derive(Debug, Clone)]
pub struct HistoryWindow {
    samples: VecDeque<RiskSample>,
    capacity: usize,
}

impl HistoryWindow {
    /// Capacity is at least 1
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append, evicting the oldest sample when full
    pub fn push(&mut self, sample: RiskSample) {
        while self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn latest(&self) -> Option<RiskSample> {
        self.samples.back().copied()
    }

    pub fn oldest(&self) -> Option<RiskSample> {
        self.samples.front().copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Shrinking drops the oldest samples
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RiskSample> {
        self.samples.iter()
    }

    pub fn to_vec(&self) -> Vec<RiskSample> {
        self.samples.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Default for HistoryWindow {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_oldest_after_capacity() {
        let mut window = HistoryWindow::new(30);
        for v in 0..31u8 {
            window.push(RiskSample::new(v));
        }

        assert_eq!(window.len(), 30);
        let values: Vec<u8> = window.iter().map(|s| s.value()).collect();
        assert_eq!(values, (1..31u8).collect::<Vec<_>>());
        assert_eq!(window.oldest(), Some(RiskSample::new(1)));
        assert_eq!(window.latest(), Some(RiskSample::new(30)));
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut window = HistoryWindow::default();
        for i in 0..500u32 {
            window.push(RiskSample::new((i % 101) as u8));
            assert!(window.len() <= 30);
        }
        assert!(window.is_full());
    }

    #[test]
    fn test_shrink_keeps_newest() {
        let mut window = HistoryWindow::new(5);
        for v in 1..=5u8 {
            window.push(RiskSample::new(v));
        }
        window.set_capacity(2);
        assert_eq!(window.to_vec(), vec![RiskSample::new(4), RiskSample::new(5)]);
    }

    #[test]
    fn test_zero_capacity_is_one() {
        let mut window = HistoryWindow::new(0);
        window.push(RiskSample::new(3));
        window.push(RiskSample::new(4));
        assert_eq!(window.capacity(), 1);
        assert_eq!(window.to_vec(), vec![RiskSample::new(4)]);
    }
}
