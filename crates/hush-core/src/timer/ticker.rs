//! Owned, cancelable periodic tick.
//!
//! A `Ticker` is a deadline plus an interval. It has no thread and registers
//! nothing globally: the owner polls it with the current instant and it
//! reports whether a tick is due. Cancelling clears the deadline, after which
//! `poll` never fires until `start` is called again.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next_due: Option<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// Arm the ticker; the first tick is due one interval from `now`.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    /// Disarm. Returns whether the ticker was armed.
    pub fn cancel(&mut self) -> bool {
        self.next_due.take().is_some()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// Returns `true` at most once per call when a tick is due.
    ///
    /// Missed intervals are coalesced: after a long stall the next deadline
    /// is rescheduled relative to `now` instead of firing a burst.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                let mut next = due + self.interval;
                if next <= now {
                    next = now + self.interval;
                }
                self.next_due = Some(next);
                true
            }
            _ => false,
        }
    }
}
