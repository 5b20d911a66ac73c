//! Timer engine implementation.
//!
//! The timer engine is a clock-sampling state machine. It does not use
//! internal threads - the caller is responsible for calling `tick()` periodically
//! (see [`TimerEngine::next_deadline`] for when the next tick is due).
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!            |          |
//!            +--> Complete <--+
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(600, system_clock());
//! engine.start();
//! // In a loop:
//! if let Some(TimerEvent::Completed { .. }) = engine.tick() { break; }
//! ```

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::clock::SharedClock;
use super::ticker::Ticker;

/// Interval between progress ticks while running.
pub const TIMER_TICK: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Complete,
}

/// Notification produced by [`TimerEngine::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEvent {
    Progress { remaining_secs: f64, elapsed_secs: f64 },
    Completed { elapsed_secs: f64 },
}

/// Pause-aware elapsed time accumulator.
pub struct TimerEngine {
    clock: SharedClock,
    duration: Duration,
    /// Time accumulated up to `last_sample`.
    elapsed: Duration,
    state: TimerState,
    /// Reference point for the running segment; `None` unless running.
    last_sample: Option<Instant>,
    ticker: Ticker,
}

impl TimerEngine {
    pub fn new(duration_secs: u64, clock: SharedClock) -> Self {
        Self::with_duration(Duration::from_secs(duration_secs), clock)
    }

    pub fn with_duration(duration: Duration, clock: SharedClock) -> Self {
        Self {
            clock,
            duration,
            elapsed: Duration::ZERO,
            state: TimerState::Idle,
            last_sample: None,
            ticker: Ticker::new(TIMER_TICK),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration.as_secs_f64()
    }

    /// Elapsed seconds, including the current running segment.
    pub fn elapsed_secs(&self) -> f64 {
        self.projected_elapsed().as_secs_f64()
    }

    /// Remaining seconds, never negative.
    pub fn remaining_secs(&self) -> f64 {
        self.duration
            .saturating_sub(self.projected_elapsed())
            .as_secs_f64()
    }

    /// When the next tick is due, if the timer is running.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.ticker.next_due()
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> bool {
        if self.state != TimerState::Idle {
            return false;
        }
        let now = self.clock.now();
        self.state = TimerState::Running;
        self.last_sample = Some(now);
        self.ticker.start(now);
        debug!(duration_secs = self.duration_secs(), "timer started");
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.accumulate();
        self.ticker.cancel();
        self.last_sample = None;
        self.state = TimerState::Paused;
        debug!(elapsed_secs = self.elapsed.as_secs_f64(), "timer paused");
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != TimerState::Paused {
            return false;
        }
        let now = self.clock.now();
        self.state = TimerState::Running;
        self.last_sample = Some(now);
        self.ticker.start(now);
        debug!(elapsed_secs = self.elapsed.as_secs_f64(), "timer resumed");
        true
    }

    pub fn stop(&mut self) -> bool {
        match self.state {
            TimerState::Running | TimerState::Paused => {
                if self.state == TimerState::Running {
                    self.accumulate();
                }
                self.finish();
                debug!(elapsed_secs = self.elapsed.as_secs_f64(), "timer stopped");
                true
            }
            TimerState::Idle | TimerState::Complete => false,
        }
    }

    /// Call periodically. Emits at most one event, and only once the tick
    /// interval has passed since the previous one.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if self.state != TimerState::Running {
            return None;
        }
        if !self.ticker.poll(self.clock.now()) {
            return None;
        }
        self.accumulate();

        if self.elapsed >= self.duration {
            self.finish();
            debug!("timer complete");
            return Some(TimerEvent::Completed {
                elapsed_secs: self.duration_secs(),
            });
        }

        Some(TimerEvent::Progress {
            remaining_secs: self.duration_secs() - self.elapsed.as_secs_f64(),
            elapsed_secs: self.elapsed.as_secs_f64(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn projected_elapsed(&self) -> Duration {
        match (self.state, self.last_sample) {
            (TimerState::Running, Some(last)) => {
                self.elapsed + self.clock.now().saturating_duration_since(last)
            }
            _ => self.elapsed,
        }
    }

    fn accumulate(&mut self) {
        if let Some(last) = self.last_sample {
            let now = self.clock.now();
            self.elapsed += now.saturating_duration_since(last);
            self.last_sample = Some(now);
        }
    }

    fn finish(&mut self) {
        self.elapsed = self.elapsed.min(self.duration);
        self.ticker.cancel();
        self.last_sample = None;
        self.state = TimerState::Complete;
    }
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("duration", &self.duration)
            .field("elapsed", &self.elapsed)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
