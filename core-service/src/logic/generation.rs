//! Run Generation - stale-callback guard
//!
//! Each component that schedules delayed work owns a `RunGeneration`.
//! Starting a run hands out a `RunToken`; cancelling or starting again bumps
//! the generation, so any callback still carrying an older token is dropped.

use serde::{Deserialize, Serialize};

/// Ticket carried by a scheduled callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RunToken(u64);

impl std::fmt::Display for RunToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "run#{}", self.0)
    }
}

/// Monotonic generation counter
#[derive(Debug, Clone, Default)]
pub struct RunGeneration {
    current: u64,
    active: bool,
}

impl RunGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new run, invalidating every earlier token
    pub fn start(&mut self) -> RunToken {
        self.current += 1;
        self.active = true;
        RunToken(self.current)
    }

    /// Invalidate the current run without starting another
    pub fn cancel(&mut self) {
        self.current += 1;
        self.active = false;
    }

    pub fn is_current(&self, token: RunToken) -> bool {
        self.active && token.0 == self.current
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_invalidates_previous() {
        let mut gen = RunGeneration::new();
        let first = gen.start();
        assert!(gen.is_current(first));

        let second = gen.start();
        assert!(!gen.is_current(first));
        assert!(gen.is_current(second));
        assert!(second > first);
    }

    #[test]
    fn test_cancel_invalidates_current() {
        let mut gen = RunGeneration::new();
        let token = gen.start();
        gen.cancel();
        assert!(!gen.is_current(token));
        assert!(!gen.is_active());

        // restart after cancel never revives the old token
        let next = gen.start();
        assert!(!gen.is_current(token));
        assert!(gen.is_current(next));
    }
}
