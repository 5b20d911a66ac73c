//! Integration tests for streaks and day/week buckets over the history database.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use hush_core::{Bucket, Database, MeditationType, NewSession};

fn local(day: u32, hour: u32) -> DateTime<Utc> {
    Local
        .with_ymd_and_hms(2025, 6, day, hour, 0, 0)
        .unwrap()
        .with_timezone(&Utc)
}

fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
}

fn record(db: &Database, started_at: DateTime<Utc>, secs: u64, completed: bool) {
    db.insert_session(&NewSession {
        started_at,
        completed_at: completed.then_some(started_at + chrono::Duration::seconds(secs as i64)),
        duration_seconds: secs,
        planned_duration: secs,
        meditation_type: MeditationType::BreathAwareness.as_str().into(),
        completed,
    })
    .unwrap();
}

#[test]
fn test_three_day_streak() {
    let db = Database::open_memory().unwrap();
    for day in [13, 14, 15] {
        record(&db, local(day, 10), 300, true);
    }
    assert_eq!(db.current_streak(june(15)).unwrap(), 3);
    assert_eq!(db.current_streak(june(16)).unwrap(), 3);
    assert_eq!(db.current_streak(june(17)).unwrap(), 0);
    assert_eq!(db.longest_streak().unwrap(), 3);
}

#[test]
fn test_old_session_gives_no_streak() {
    let db = Database::open_memory().unwrap();
    record(&db, local(10, 10), 300, true);
    assert_eq!(db.current_streak(june(15)).unwrap(), 0);
    assert_eq!(db.longest_streak().unwrap(), 1);
}

#[test]
fn test_empty_history() {
    let db = Database::open_memory().unwrap();
    assert_eq!(db.current_streak(june(15)).unwrap(), 0);
    assert_eq!(db.longest_streak().unwrap(), 0);
    let summary = db.summary(june(15)).unwrap();
    assert_eq!(summary.total_sessions, 0);
    assert_eq!(summary.today, Bucket::default());
}

#[test]
fn test_cancelled_sessions_do_not_extend_streaks() {
    let db = Database::open_memory().unwrap();
    record(&db, local(14, 10), 300, true);
    record(&db, local(15, 10), 30, false);
    assert_eq!(db.current_streak(june(15)).unwrap(), 1);

    // They still count towards totals and buckets.
    assert_eq!(db.total_sessions().unwrap(), 2);
    assert_eq!(db.sessions_on(june(15)).unwrap().count, 1);
}

#[test]
fn test_several_sessions_on_one_day_count_once() {
    let db = Database::open_memory().unwrap();
    record(&db, local(14, 8), 300, true);
    record(&db, local(15, 7), 300, true);
    record(&db, local(15, 21), 300, true);
    assert_eq!(db.current_streak(june(15)).unwrap(), 2);
    assert_eq!(
        db.sessions_on(june(15)).unwrap(),
        Bucket { count: 2, total_seconds: 600 }
    );
}

#[test]
fn test_summary_buckets() {
    let db = Database::open_memory().unwrap();
    // 2025-06-18 is a Wednesday; its week runs Sunday 15th to Saturday 21st.
    record(&db, local(14, 10), 500, true);
    record(&db, local(15, 10), 100, true);
    record(&db, local(17, 10), 200, true);
    record(&db, local(18, 10), 350, true);
    record(&db, local(22, 10), 50, true);

    let summary = db.summary(june(18)).unwrap();
    assert_eq!(summary.total_sessions, 5);
    assert_eq!(summary.total_seconds, 1200);
    assert_eq!(summary.today, Bucket { count: 1, total_seconds: 350 });
    assert_eq!(summary.yesterday, Bucket { count: 1, total_seconds: 200 });
    assert_eq!(summary.this_week, Bucket { count: 3, total_seconds: 650 });
    assert_eq!(summary.current_streak, 2);
    assert_eq!(summary.longest_streak, 2);
}

#[test]
fn test_recent_sessions_default_window() {
    let db = Database::open_memory().unwrap();
    for day in 1..=12 {
        record(&db, local(day, 9), 60, true);
    }
    let recent = db.recent_sessions(10).unwrap();
    assert_eq!(recent.len(), 10);
    assert_eq!(recent[0].started_at, local(12, 9));
    assert_eq!(recent[9].started_at, local(3, 9));
}

#[test]
fn test_history_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.db");
    {
        let db = Database::open_at(&path).unwrap();
        record(&db, local(15, 10), 300, true);
    }
    let db = Database::open_at(&path).unwrap();
    assert_eq!(db.total_sessions().unwrap(), 1);
    assert_eq!(db.current_streak(june(15)).unwrap(), 1);
}
