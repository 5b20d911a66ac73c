mod clock;
mod engine;
mod ticker;

pub use clock::{system_clock, Clock, ManualClock, SharedClock, SystemClock};
pub use engine::{TimerEngine, TimerEvent, TimerState, TIMER_TICK};
pub use ticker::Ticker;
