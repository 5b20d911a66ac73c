//! Breathing pacer.
//!
//! [`resolve_phase`] maps an elapsed time onto a pattern's cycle. [`Pacer`]
//! feeds it from its own pausable clock ticking every 100 ms. The pacer is
//! deliberately independent of the session timer: both sample the same kind
//! of monotonic clock and may drift apart by up to one tick, which is fine for
//! a visual aid.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

use crate::pattern::{BreathingPattern, BreathingPhase};
use crate::timer::{SharedClock, Ticker};

/// Interval between pacer frames.
pub const PACER_TICK: Duration = Duration::from_millis(100);

/// Position inside a pattern cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhaseCursor {
    pub phase_index: usize,
    /// 0.0 .. 1.0 within the current phase.
    pub progress: f64,
}

impl PhaseCursor {
    pub fn phase<'a>(&self, pattern: &'a BreathingPattern) -> &'a BreathingPhase {
        &pattern.phases()[self.phase_index]
    }
}

/// Which phase is active `elapsed_ms` into the pattern, and how far through it.
pub fn resolve_phase(elapsed_ms: f64, pattern: &BreathingPattern) -> PhaseCursor {
    let position = elapsed_ms.rem_euclid(pattern.cycle_ms() as f64);

    let mut start = 0.0;
    for (phase_index, phase) in pattern.phases().iter().enumerate() {
        let duration = phase.duration_ms as f64;
        let end = start + duration;
        if position < end {
            return PhaseCursor {
                phase_index,
                progress: (position - start) / duration,
            };
        }
        start = end;
    }

    // Only reachable when rounding puts `position` exactly on the cycle end.
    PhaseCursor {
        phase_index: pattern.phases().len() - 1,
        progress: 1.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PacerState {
    Idle,
    Running,
    Paused,
    Stopped,
}

/// Pausable animation clock for one pattern.
pub struct Pacer {
    clock: SharedClock,
    pattern: BreathingPattern,
    state: PacerState,
    elapsed: Duration,
    last_sample: Option<Instant>,
    ticker: Ticker,
}

impl Pacer {
    pub fn new(pattern: BreathingPattern, clock: SharedClock) -> Self {
        Self {
            clock,
            pattern,
            state: PacerState::Idle,
            elapsed: Duration::ZERO,
            last_sample: None,
            ticker: Ticker::new(PACER_TICK),
        }
    }

    pub fn pattern(&self) -> &BreathingPattern {
        &self.pattern
    }

    pub fn state(&self) -> PacerState {
        self.state
    }

    /// Animation time as of the last frame.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_nanos() as f64 / 1_000_000.0
    }

    /// Current frame position. Only moves when `tick()` produces a frame.
    pub fn cursor(&self) -> PhaseCursor {
        resolve_phase(self.elapsed_ms(), &self.pattern)
    }

    /// Whole pattern cycles completed so far.
    pub fn cycles_completed(&self) -> u64 {
        (self.elapsed.as_millis() / u128::from(self.pattern.cycle_ms())) as u64
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.ticker.next_due()
    }

    pub fn start(&mut self) -> bool {
        if self.state != PacerState::Idle {
            return false;
        }
        self.run_from_now();
        debug!(pattern = self.pattern.id(), "pacer started");
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.state != PacerState::Running {
            return false;
        }
        self.accumulate();
        self.halt(PacerState::Paused);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != PacerState::Paused {
            return false;
        }
        self.run_from_now();
        true
    }

    pub fn stop(&mut self) -> bool {
        match self.state {
            PacerState::Running | PacerState::Paused => {
                self.halt(PacerState::Stopped);
                true
            }
            PacerState::Idle | PacerState::Stopped => false,
        }
    }

    /// Advance the animation if a frame is due, returning the new cursor.
    pub fn tick(&mut self) -> Option<PhaseCursor> {
        if self.state != PacerState::Running {
            return None;
        }
        if !self.ticker.poll(self.clock.now()) {
            return None;
        }
        self.accumulate();
        Some(self.cursor())
    }

    fn run_from_now(&mut self) {
        let now = self.clock.now();
        self.state = PacerState::Running;
        self.last_sample = Some(now);
        self.ticker.start(now);
    }

    fn halt(&mut self, state: PacerState) {
        self.ticker.cancel();
        self.last_sample = None;
        self.state = state;
    }

    fn accumulate(&mut self) {
        if let Some(last) = self.last_sample {
            let now = self.clock.now();
            self.elapsed += now.saturating_duration_since(last);
            self.last_sample = Some(now);
        }
    }
}

impl std::fmt::Debug for Pacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pacer")
            .field("pattern", &self.pattern.id())
            .field("state", &self.state)
            .field("elapsed", &self.elapsed)
            .finish_non_exhaustive()
    }
}
