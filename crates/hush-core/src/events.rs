use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{SessionListener, SessionState};

/// Message form of the session notifications.
///
/// A `Vec<SessionEvent>` is itself a [`SessionListener`], which gives drivers
/// (and tests) an ordered log instead of callbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    StateChanged {
        state: SessionState,
        at: DateTime<Utc>,
    },
    Tick {
        remaining_secs: f64,
        elapsed_secs: f64,
    },
    Completed {
        at: DateTime<Utc>,
    },
}

impl SessionListener for Vec<SessionEvent> {
    fn on_state_change(&mut self, state: SessionState) {
        self.push(SessionEvent::StateChanged {
            state,
            at: Utc::now(),
        });
    }

    fn on_tick(&mut self, remaining_secs: f64, elapsed_secs: f64) {
        self.push(SessionEvent::Tick {
            remaining_secs,
            elapsed_secs,
        });
    }

    fn on_complete(&mut self) {
        self.push(SessionEvent::Completed { at: Utc::now() });
    }
}
