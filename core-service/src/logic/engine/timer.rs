//! Timer Slot - owned handle to one background timer task
//!
//! Arming a slot aborts whatever it held before; dropping the slot aborts
//! the task too. Abort is best effort: a callback already past its last
//! await still runs, which is why every callback also carries a `RunToken`.

use tokio::task::JoinHandle;

#[derive(Debug)]
pub struct TimerSlot {
    name: &'static str,
    handle: Option<JoinHandle<()>>,
}

impl TimerSlot {
    pub fn new(name: &'static str) -> Self {
        Self { name, handle: None }
    }

    /// Install a new task, aborting the previous one
    pub fn arm(&mut self, handle: JoinHandle<()>) {
        if self.cancel() {
            log::debug!("Timer '{}' re-armed, previous task aborted", self.name);
        }
        self.handle = Some(handle);
    }

    /// Abort the task if it is still pending; true if one was running
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn delayed_flag(fired: &Arc<AtomicBool>) -> JoinHandle<()> {
        let fired = fired.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            fired.store(true, Ordering::SeqCst);
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_aborts_previous() {
        let first = Arc::new(AtomicBool::new(false));
        let second = Arc::new(AtomicBool::new(false));

        let mut slot = TimerSlot::new("test");
        slot.arm(delayed_flag(&first));
        slot.arm(delayed_flag(&second));

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(!first.load(Ordering::SeqCst));
        assert!(second.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_and_drop() {
        let mut slot = TimerSlot::new("test");
        assert!(!slot.cancel());

        let cancelled = Arc::new(AtomicBool::new(false));
        slot.arm(delayed_flag(&cancelled));
        assert!(slot.cancel());

        let dropped = Arc::new(AtomicBool::new(false));
        slot.arm(delayed_flag(&dropped));
        drop(slot);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(!cancelled.load(Ordering::SeqCst));
        assert!(!dropped.load(Ordering::SeqCst));
    }
}
