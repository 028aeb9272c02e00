use std::time::Instant;

use crate::session::timer::AutoAdvance;

/// Where a single drill (sentence or word) stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrillPhase {
    AwaitingInput,
    Checked { correct: bool },
    AdvancingDelay(AutoAdvance),
}

impl DrillPhase {
    pub fn is_advancing(&self) -> bool {
        matches!(self, DrillPhase::AdvancingDelay(_))
    }

    /// Finished drills have advanced and are waiting to be replaced.
    pub fn is_finished(&self) -> bool {
        matches!(self, DrillPhase::Checked { correct: true })
    }

    pub fn accepts_input(&self) -> bool {
        matches!(
            self,
            DrillPhase::AwaitingInput | DrillPhase::Checked { correct: false }
        )
    }

    /// Fire the auto-advance if its deadline passed. True exactly once.
    pub fn tick(&mut self, now: Instant) -> bool {
        if let DrillPhase::AdvancingDelay(timer) = self
            && timer.fire_if_due(now)
        {
            *self = DrillPhase::Checked { correct: true };
            return true;
        }
        false
    }

    /// Manual continue: cancel the pending auto-advance and advance now.
    /// False if nothing was pending, so a racing tick cannot advance twice.
    pub fn continue_now(&mut self) -> bool {
        if let DrillPhase::AdvancingDelay(timer) = self
            && timer.cancel()
        {
            *self = DrillPhase::Checked { correct: true };
            return true;
        }
        false
    }
}
