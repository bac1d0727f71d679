//! Single-slot hold deadline.

use std::time::Duration;

use tokio::time::Instant;

/// One-shot deadline with a fired flag.
///
/// At most one deadline is pending. The event loop sleeps until
/// [`deadline`](Self::deadline) and then calls [`expire`](Self::expire);
/// the fired flag stays set until the next [`disarm`](Self::disarm) or
/// [`arm`](Self::arm).
#[derive(Debug)]
pub struct GestureTimer {
    hold: Duration,
    deadline: Option<Instant>,
    fired: bool,
}

impl GestureTimer {
    pub fn new(hold: Duration) -> Self {
        Self {
            hold,
            deadline: None,
            fired: false,
        }
    }

    /// Arm for `hold` from `now`, superseding any pending deadline.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.hold);
        self.fired = false;
    }

    pub fn disarm(&mut self) {
        self.deadline = None;
        self.fired = false;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_fired(&self) -> bool {
        self.fired
    }

    /// Mark the deadline fired if it has elapsed by `now`.
    ///
    /// Returns false when nothing is armed or the deadline is still in
    /// the future.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                self.fired = true;
                true
            }
            _ => false,
        }
    }
}
