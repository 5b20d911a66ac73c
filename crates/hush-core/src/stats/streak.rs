use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};

/// Length of the run of consecutive practice days ending today.
///
/// A run ending yesterday still counts (today's session may not have happened
/// yet); anything older breaks the streak.
pub fn current_streak(days: &[NaiveDate], today: NaiveDate) -> u32 {
    let days: BTreeSet<_> = days.iter().copied().collect();
    let yesterday = today - Duration::days(1);

    let mut cursor = if days.contains(&today) {
        today
    } else if days.contains(&yesterday) {
        yesterday
    } else {
        return 0;
    };

    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        cursor = cursor - Duration::days(1);
    }
    streak
}

/// Longest run of consecutive practice days anywhere in the history.
pub fn longest_streak(days: &[NaiveDate]) -> u32 {
    let days: BTreeSet<_> = days.iter().copied().collect();
    let mut longest = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;
    for day in days {
        run = match prev {
            Some(p) if day - p == Duration::days(1) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(day);
    }
    longest
}
