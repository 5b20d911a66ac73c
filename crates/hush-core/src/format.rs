//! Human-facing duration formatting and parsing.

/// Format seconds as `M:SS`, or `H:MM:SS` from one hour up.
///
/// Fractions round up so a countdown shows `0:01` until it truly hits zero.
pub fn format_clock(total_secs: f64) -> String {
    let s = total_secs.max(0.0).ceil() as u64;
    let hours = s / 3600;
    let minutes = (s % 3600) / 60;
    let seconds = s % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Format a total as `N min` or `Xh Ym` for summaries.
pub fn format_minutes(total_secs: u64) -> String {
    let m = total_secs / 60;
    if m < 60 {
        return format!("{m} min");
    }
    let (h, rm) = (m / 60, m % 60);
    if rm > 0 {
        format!("{h}h {rm}m")
    } else {
        format!("{h}h")
    }
}

pub fn pluralize(count: u64, singular: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {singular}s")
    }
}

/// Parse `"5"` (minutes), `"90s"`, `"5m"`, `"1h30m"`, `"5m30s"` into seconds.
///
/// Units must appear in h, m, s order, each at most once. Input is trimmed
/// and case-insensitive. Returns `None` for anything else.
pub fn parse_duration(input: &str) -> Option<u64> {
    let trimmed = input.trim().to_ascii_lowercase();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return trimmed.parse::<u64>().ok()?.checked_mul(60);
    }

    let mut total: u64 = 0;
    let mut digits = String::new();
    // Index into "hms" of the last unit seen; units must strictly increase.
    let mut last_unit: Option<usize> = None;
    for c in trimmed.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let unit = "hms".find(c)?;
        if digits.is_empty() || last_unit.is_some_and(|prev| unit <= prev) {
            return None;
        }
        let value: u64 = digits.parse().ok()?;
        let factor = [3600, 60, 1][unit];
        total = total.checked_add(value.checked_mul(factor)?)?;
        digits.clear();
        last_unit = Some(unit);
    }
    if !digits.is_empty() {
        return None;
    }
    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_under_a_minute() {
        assert_eq!(format_clock(0.0), "0:00");
        assert_eq!(format_clock(5.0), "0:05");
        assert_eq!(format_clock(59.0), "0:59");
    }

    #[test]
    fn clock_minutes_and_hours() {
        assert_eq!(format_clock(90.0), "1:30");
        assert_eq!(format_clock(125.0), "2:05");
        assert_eq!(format_clock(3600.0), "1:00:00");
        assert_eq!(format_clock(3661.0), "1:01:01");
    }

    #[test]
    fn clock_clamps_and_ceils() {
        assert_eq!(format_clock(-10.0), "0:00");
        assert_eq!(format_clock(0.1), "0:01");
        assert_eq!(format_clock(59.1), "1:00");
    }

    #[test]
    fn minutes_summary() {
        assert_eq!(format_minutes(0), "0 min");
        assert_eq!(format_minutes(59 * 60 + 59), "59 min");
        assert_eq!(format_minutes(3600), "1h");
        assert_eq!(format_minutes(5400), "1h 30m");
    }

    #[test]
    fn pluralizes() {
        assert_eq!(pluralize(1, "day"), "1 day");
        assert_eq!(pluralize(0, "day"), "0 days");
        assert_eq!(pluralize(3, "session"), "3 sessions");
    }

    #[test]
    fn bare_numbers_are_minutes() {
        assert_eq!(parse_duration("5"), Some(300));
        assert_eq!(parse_duration("0"), Some(0));
    }

    #[test]
    fn unit_notation() {
        assert_eq!(parse_duration("90s"), Some(90));
        assert_eq!(parse_duration("5m"), Some(300));
        assert_eq!(parse_duration("2h"), Some(7200));
        assert_eq!(parse_duration("1h30m"), Some(5400));
        assert_eq!(parse_duration("5m30s"), Some(330));
        assert_eq!(parse_duration("1h5m10s"), Some(3910));
    }

    #[test]
    fn trims_and_ignores_case() {
        assert_eq!(parse_duration("  5M  "), Some(300));
        assert_eq!(parse_duration("1H30M"), Some(5400));
    }

    #[test]
    fn rejects_malformed_durations() {
        for bad in ["", "abc", "5x", "m", "30s5m", "5m5m", "1.5m", "-5", "5 m", "10m3"] {
            assert_eq!(parse_duration(bad), None, "accepted {bad:?}");
        }
    }
}
