//! # Hush Core Library
//!
//! This library provides the core logic for the `hs` terminal meditation
//! timer: a session timer with pause/resume, a breathing pacer that walks a
//! cyclic multi-phase pattern, and the local history the CLI reports on.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A clock-sampling state machine that requires the caller
//!   to periodically invoke `tick()`; no internal threads
//! - **Session**: Lifecycle (idle, preparing, active, paused, complete) on top
//!   of the timer, reporting to a [`SessionListener`]
//! - **Pacer**: Maps elapsed time onto a [`BreathingPattern`] phase on its own
//!   pausable clock
//! - **Storage**: SQLite-based session history and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`Session`]: Session lifecycle and notifications
//! - [`Pacer`]: Breathing phase tracking
//! - [`Database`]: Session history and statistics
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod export;
pub mod format;
pub mod pacer;
pub mod pattern;
pub mod session;
pub mod stats;
pub mod storage;
pub mod theme;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::SessionEvent;
pub use export::ExportFormat;
pub use pacer::{resolve_phase, Pacer, PacerState, PhaseCursor, PACER_TICK};
pub use pattern::{
    builtin_patterns, lookup_pattern, parse_custom_pattern, resolve_pattern, BreathingPattern,
    BreathingPhase,
};
pub use session::{Session, SessionListener, SessionState};
pub use stats::{Bucket, Summary};
pub use storage::{Config, Database, MeditationType, NewSession, SessionRecord};
pub use theme::{Theme, ThemeName};
pub use timer::{
    system_clock, Clock, ManualClock, SharedClock, SystemClock, Ticker, TimerEngine, TimerEvent,
    TimerState, TIMER_TICK,
};
