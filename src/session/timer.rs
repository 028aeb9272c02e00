use std::time::{Duration, Instant};

/// One-shot cancellable deadline.
///
/// `fire_if_due` and `cancel` both consume the pending deadline, so whichever
/// runs first wins and the other sees nothing to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AutoAdvance {
    deadline: Option<Instant>,
}

impl AutoAdvance {
    pub fn schedule(now: Instant, delay: Duration) -> Self {
        Self {
            deadline: Some(now + delay),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Returns true if a pending deadline was cancelled.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}
