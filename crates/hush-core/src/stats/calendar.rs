use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};

/// The local calendar day an instant falls on.
pub fn local_day(at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&Local).date_naive()
}

/// First instant of a local calendar day.
///
/// If midnight falls in a DST gap the day is taken to start at the UTC
/// instant with the same wall-clock reading.
pub fn local_midnight(day: NaiveDate) -> DateTime<Utc> {
    let naive = day.and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}

/// The Sunday that starts the week containing `day`.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_sunday()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weeks_start_on_sunday() {
        // 2025-06-18 is a Wednesday.
        assert_eq!(week_start(ymd(2025, 6, 18)), ymd(2025, 6, 15));
        assert_eq!(week_start(ymd(2025, 6, 15)), ymd(2025, 6, 15));
        assert_eq!(week_start(ymd(2025, 6, 21)), ymd(2025, 6, 15));
    }

    #[test]
    fn midnight_maps_back_to_same_day() {
        let day = ymd(2025, 6, 15);
        assert_eq!(local_day(local_midnight(day)), day);
        assert_eq!(local_day(local_midnight(day) - Duration::seconds(1)), ymd(2025, 6, 14));
    }
}
