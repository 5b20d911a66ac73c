//! Statistics over the session history.
//!
//! Streaks and day buckets are computed on local calendar days: a session
//! started at 23:30 counts for the day the user sat down, whatever its UTC
//! date is.

mod calendar;
mod streak;

pub use calendar::{local_day, local_midnight, week_start};
pub use streak::{current_streak, longest_streak};

use serde::{Deserialize, Serialize};

/// Count and total time of the sessions in some time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bucket {
    pub count: u64,
    pub total_seconds: u64,
}

/// Practice summary shown by `hs stats`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub total_sessions: u64,
    pub total_seconds: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub today: Bucket,
    pub yesterday: Bucket,
    pub this_week: Bucket,
}
