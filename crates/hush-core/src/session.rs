//! Meditation session lifecycle.
//!
//! A [`Session`] owns one [`TimerEngine`] and layers the user-facing states on
//! top of it:
//!
//! ```text
//! Idle -> (Preparing) -> Active <-> Paused -> Complete
//! ```
//!
//! Every transition method is a no-op (returning `false`) when called from a
//! state it does not apply to, so duplicated or out-of-order key presses are
//! harmless. Notifications are delivered synchronously, in order, through the
//! [`SessionListener`] given at construction; the session performs no I/O.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::timer::{system_clock, SharedClock, TimerEngine, TimerEvent, TimerState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Preparing,
    Active,
    Paused,
    Complete,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Preparing => "preparing",
            SessionState::Active => "active",
            SessionState::Paused => "paused",
            SessionState::Complete => "complete",
        }
    }
}

/// Receives session notifications. All methods default to doing nothing.
pub trait SessionListener {
    fn on_state_change(&mut self, _state: SessionState) {}
    fn on_tick(&mut self, _remaining_secs: f64, _elapsed_secs: f64) {}
    fn on_complete(&mut self) {}
}

impl SessionListener for () {}

pub struct Session<L: SessionListener = ()> {
    clock: SharedClock,
    duration_secs: u64,
    listener: L,
    state: SessionState,
    timer: Option<TimerEngine>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl<L: SessionListener> Session<L> {
    pub fn new(duration_secs: u64, listener: L) -> Self {
        Self::with_clock(duration_secs, system_clock(), listener)
    }

    pub fn with_clock(duration_secs: u64, clock: SharedClock, listener: L) -> Self {
        Self {
            clock,
            duration_secs,
            listener,
            state: SessionState::Idle,
            timer: None,
            started_at: None,
            completed_at: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn timer_state(&self) -> Option<TimerState> {
        self.timer.as_ref().map(TimerEngine::state)
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.timer.as_ref().map_or(0.0, TimerEngine::elapsed_secs)
    }

    pub fn remaining_secs(&self) -> f64 {
        self.timer
            .as_ref()
            .map_or(self.duration_secs as f64, TimerEngine::remaining_secs)
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Whether the session ran its full planned duration, as opposed to
    /// being stopped early.
    pub fn is_full_completion(&self) -> bool {
        self.state == SessionState::Complete
            && self
                .timer
                .as_ref()
                .is_some_and(|timer| timer.remaining_secs() == 0.0)
    }

    /// When the owned timer next needs a `tick()`.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.as_ref().and_then(TimerEngine::next_deadline)
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Show instructions before starting.
    pub fn prepare(&mut self) -> bool {
        if self.state != SessionState::Idle {
            return false;
        }
        self.set_state(SessionState::Preparing);
        true
    }

    pub fn start(&mut self) -> bool {
        if !matches!(self.state, SessionState::Idle | SessionState::Preparing) {
            return false;
        }
        self.started_at = Some(Utc::now());
        let mut timer = TimerEngine::new(self.duration_secs, self.clock.clone());
        self.set_state(SessionState::Active);
        timer.start();
        self.timer = Some(timer);
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.state != SessionState::Active {
            return false;
        }
        if let Some(timer) = self.timer.as_mut() {
            timer.pause();
        }
        self.set_state(SessionState::Paused);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != SessionState::Paused {
            return false;
        }
        if let Some(timer) = self.timer.as_mut() {
            timer.resume();
        }
        self.set_state(SessionState::Active);
        true
    }

    /// End the session early.
    pub fn stop(&mut self) -> bool {
        if !matches!(self.state, SessionState::Active | SessionState::Paused) {
            return false;
        }
        self.completed_at = Some(Utc::now());
        if let Some(timer) = self.timer.as_mut() {
            timer.stop();
        }
        self.set_state(SessionState::Complete);
        true
    }

    /// Poll the owned timer and forward whatever it reports.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        let event = self.timer.as_mut()?.tick()?;
        match event {
            TimerEvent::Progress {
                remaining_secs,
                elapsed_secs,
            } => {
                self.listener.on_tick(remaining_secs, elapsed_secs);
            }
            TimerEvent::Completed { elapsed_secs } => {
                self.listener.on_tick(0.0, elapsed_secs);
                self.completed_at = Some(Utc::now());
                self.set_state(SessionState::Complete);
                self.listener.on_complete();
            }
        }
        Some(event)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn set_state(&mut self, next: SessionState) {
        debug!(from = self.state.as_str(), to = next.as_str(), "session state");
        self.state = next;
        self.listener.on_state_change(next);
    }
}

impl<L: SessionListener> std::fmt::Debug for Session<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("duration_secs", &self.duration_secs)
            .field("state", &self.state)
            .field("timer", &self.timer)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::SessionEvent;
    use crate::timer::ManualClock;
    use std::sync::Arc;

    fn session(secs: u64) -> (Session<Vec<SessionEvent>>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        (Session::with_clock(secs, clock.clone(), Vec::new()), clock)
    }

    fn states(events: &[SessionEvent]) -> Vec<SessionState> {
        events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::StateChanged { state, .. } => Some(*state),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn prepare_then_start() {
        let (mut s, _clock) = session(60);
        assert!(s.prepare());
        assert!(!s.prepare());
        assert!(s.start());
        assert_eq!(s.state(), SessionState::Active);
        assert_eq!(s.timer_state(), Some(TimerState::Running));
        assert!(s.started_at().is_some());
        assert_eq!(
            states(s.listener()),
            [SessionState::Preparing, SessionState::Active]
        );
    }

    #[test]
    fn start_directly_from_idle() {
        let (mut s, _clock) = session(60);
        assert!(s.start());
        assert_eq!(s.state(), SessionState::Active);
        assert!(!s.start());
        assert_eq!(states(s.listener()), [SessionState::Active]);
    }

    #[test]
    fn idle_session_reports_full_remaining() {
        let (s, _clock) = session(90);
        assert_eq!(s.remaining_secs(), 90.0);
        assert_eq!(s.elapsed_secs(), 0.0);
        assert!(s.timer_state().is_none());
        assert!(!s.is_full_completion());
    }

    #[test]
    fn early_stop_is_not_full_completion() {
        let (mut s, clock) = session(10);
        s.start();
        clock.advance_ms(3000);
        assert!(s.stop());
        assert_eq!(s.state(), SessionState::Complete);
        assert!(s.completed_at().is_some());
        assert!(!s.is_full_completion());
        assert!(!s.stop());
        assert!(!s.listener().iter().any(|e| matches!(e, SessionEvent::Completed { .. })));
    }

    #[test]
    fn natural_completion_notifies_in_order() {
        let (mut s, clock) = session(1);
        s.start();
        clock.advance_ms(1000);
        assert!(matches!(s.tick(), Some(TimerEvent::Completed { .. })));
        assert!(s.is_full_completion());

        let tail: Vec<_> = s.listener().iter().skip(1).cloned().collect();
        assert!(matches!(
            tail[0],
            SessionEvent::Tick { remaining_secs, .. } if remaining_secs == 0.0
        ));
        assert!(matches!(
            tail[1],
            SessionEvent::StateChanged { state: SessionState::Complete, .. }
        ));
        assert!(matches!(tail[2], SessionEvent::Completed { .. }));
        assert_eq!(tail.len(), 3);
    }

    #[test]
    fn pause_twice_is_idempotent() {
        let (mut s, clock) = session(10);
        s.start();
        clock.advance_ms(2000);
        assert!(s.pause());
        let elapsed = s.elapsed_secs();
        clock.advance_ms(2000);
        assert!(!s.pause());
        assert_eq!(s.state(), SessionState::Paused);
        assert_eq!(s.elapsed_secs(), elapsed);
        assert_eq!(s.timer_state(), Some(TimerState::Paused));
    }

    #[test]
    fn resume_only_from_paused() {
        let (mut s, _clock) = session(10);
        assert!(!s.resume());
        s.start();
        assert!(!s.resume());
        s.pause();
        assert!(s.resume());
        assert_eq!(s.timer_state(), Some(TimerState::Running));
    }

    #[test]
    fn stop_from_idle_is_noop() {
        let (mut s, _clock) = session(10);
        assert!(!s.stop());
        assert_eq!(s.state(), SessionState::Idle);
        assert!(s.completed_at().is_none());
        assert!(s.listener().is_empty());
    }

    #[test]
    fn tick_without_timer_is_none() {
        let (mut s, _clock) = session(10);
        assert!(s.tick().is_none());
        assert!(s.next_deadline().is_none());
    }
}
