//! SQLite-based session history.
//!
//! Provides persistent storage for:
//! - Finished (or cancelled) meditation sessions
//! - Aggregates over them: totals, streaks, per-day and per-week buckets
//!
//! Timestamps are stored as RFC 3339 UTC strings with millisecond precision,
//! so ordering and range filters work directly on the text column.

use std::path::Path;

use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{DatabaseError, Result};
use crate::session::{Session, SessionListener};
use crate::stats::{self, Bucket, Summary};

use super::data_dir;

/// What kind of practice a session was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeditationType {
    BreathAwareness,
    MindfulBreak,
    BoxBreathing,
}

impl MeditationType {
    /// Name stored in the `meditation_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            MeditationType::BreathAwareness => "Breath Awareness",
            MeditationType::MindfulBreak => "Mindful Break",
            MeditationType::BoxBreathing => "Box Breathing",
        }
    }
}

impl std::fmt::Display for MeditationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored session row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: i64,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_seconds: u64,
    pub planned_duration: u64,
    pub meditation_type: String,
    pub completed: bool,
}

/// Insert payload for [`Database::insert_session`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSession {
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_seconds: u64,
    pub planned_duration: u64,
    pub meditation_type: String,
    pub completed: bool,
}

impl NewSession {
    /// Build a record from a session that has been started.
    ///
    /// Returns `None` if the session never left idle/preparing.
    pub fn from_session<L: SessionListener>(session: &Session<L>, kind: MeditationType) -> Option<Self> {
        let started_at = session.started_at()?;
        Some(Self {
            started_at,
            completed_at: session.completed_at(),
            duration_seconds: session.elapsed_secs().round() as u64,
            planned_duration: session.duration_secs(),
            meditation_type: kind.as_str().to_string(),
            completed: session.is_full_completion(),
        })
    }
}

fn to_db_time(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn from_db_time(id: i64, raw: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| DatabaseError::CorruptRow {
            id,
            message: format!("bad timestamp '{raw}': {e}"),
        })
}

/// Raw column values, decoded outside the rusqlite row closure.
struct RawRow {
    id: i64,
    started_at: String,
    completed_at: Option<String>,
    duration_seconds: u64,
    planned_duration: u64,
    meditation_type: String,
    completed: bool,
}

impl RawRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            started_at: row.get(1)?,
            completed_at: row.get(2)?,
            duration_seconds: row.get(3)?,
            planned_duration: row.get(4)?,
            meditation_type: row.get(5)?,
            completed: row.get(6)?,
        })
    }

    fn decode(self) -> Result<SessionRecord, DatabaseError> {
        Ok(SessionRecord {
            id: self.id,
            started_at: from_db_time(self.id, &self.started_at)?,
            completed_at: self
                .completed_at
                .as_deref()
                .map(|raw| from_db_time(self.id, raw))
                .transpose()?,
            duration_seconds: self.duration_seconds,
            planned_duration: self.planned_duration,
            meditation_type: self.meditation_type,
            completed: self.completed,
        })
    }
}

const SELECT_COLUMNS: &str = "SELECT id, started_at, completed_at, duration_seconds,
        planned_duration, meditation_type, completed FROM sessions";

/// SQLite database for session history.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data dir>/history.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("history.db");
        Self::open_at(&path)
    }

    /// Open (or create) a database file at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        debug!(journal_mode = %mode, "journal mode set");
        let db = Self { conn };
        db.migrate()?;
        debug!(path = %path.display(), "history database opened");
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sessions (
                id               INTEGER PRIMARY KEY AUTOINCREMENT,
                started_at       TEXT NOT NULL,
                completed_at     TEXT,
                duration_seconds INTEGER NOT NULL,
                planned_duration INTEGER NOT NULL,
                meditation_type  TEXT NOT NULL,
                completed        BOOLEAN DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_started_at ON sessions(started_at);",
        )
    }

    /// Record a session. Returns the new row id.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn insert_session(&self, session: &NewSession) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO sessions (started_at, completed_at, duration_seconds, planned_duration, meditation_type, completed)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                to_db_time(&session.started_at),
                session.completed_at.as_ref().map(to_db_time),
                session.duration_seconds,
                session.planned_duration,
                session.meditation_type,
                session.completed,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(
            id,
            kind = %session.meditation_type,
            duration_seconds = session.duration_seconds,
            completed = session.completed,
            "session recorded"
        );
        Ok(id)
    }

    /// Most recent sessions first.
    pub fn recent_sessions(&self, limit: usize) -> Result<Vec<SessionRecord>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.query_records(
            &format!("{SELECT_COLUMNS} ORDER BY started_at DESC, id DESC LIMIT ?1"),
            params![limit],
        )
    }

    /// Every session, most recent first.
    pub fn all_sessions(&self) -> Result<Vec<SessionRecord>> {
        self.query_records(
            &format!("{SELECT_COLUMNS} ORDER BY started_at DESC, id DESC"),
            [],
        )
    }

    pub fn total_sessions(&self) -> Result<u64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?)
    }

    pub fn total_seconds(&self) -> Result<u64> {
        Ok(self.conn.query_row(
            "SELECT COALESCE(SUM(duration_seconds), 0) FROM sessions",
            [],
            |row| row.get(0),
        )?)
    }

    /// Local calendar days that contain at least one completed session.
    pub fn practice_days(&self) -> Result<Vec<NaiveDate>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, started_at FROM sessions WHERE completed = 1")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut days = rows
            .iter()
            .map(|(id, raw)| from_db_time(*id, raw).map(stats::local_day))
            .collect::<Result<Vec<_>, _>>()?;
        days.sort_unstable();
        days.dedup();
        Ok(days)
    }

    /// Consecutive practice days ending today (or yesterday, if today has
    /// no session yet).
    pub fn current_streak(&self, today: NaiveDate) -> Result<u32> {
        Ok(stats::current_streak(&self.practice_days()?, today))
    }

    pub fn longest_streak(&self) -> Result<u32> {
        Ok(stats::longest_streak(&self.practice_days()?))
    }

    /// Sessions started within `[from, until)`.
    pub fn bucket_between(&self, from: DateTime<Utc>, until: DateTime<Utc>) -> Result<Bucket> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(duration_seconds), 0)
             FROM sessions
             WHERE started_at >= ?1 AND started_at < ?2",
            params![to_db_time(&from), to_db_time(&until)],
            |row| {
                Ok(Bucket {
                    count: row.get(0)?,
                    total_seconds: row.get(1)?,
                })
            },
        )?)
    }

    /// Sessions started on a local calendar day.
    pub fn sessions_on(&self, day: NaiveDate) -> Result<Bucket> {
        self.bucket_between(
            stats::local_midnight(day),
            stats::local_midnight(day + Duration::days(1)),
        )
    }

    /// Sessions in the Sunday-to-Saturday week containing `day`.
    pub fn sessions_in_week_of(&self, day: NaiveDate) -> Result<Bucket> {
        let start = stats::week_start(day);
        self.bucket_between(
            stats::local_midnight(start),
            stats::local_midnight(start + Duration::days(7)),
        )
    }

    /// Everything the `stats` screen shows, relative to `today`.
    pub fn summary(&self, today: NaiveDate) -> Result<Summary> {
        let days = self.practice_days()?;
        Ok(Summary {
            total_sessions: self.total_sessions()?,
            total_seconds: self.total_seconds()?,
            current_streak: stats::current_streak(&days, today),
            longest_streak: stats::longest_streak(&days),
            today: self.sessions_on(today)?,
            yesterday: self.sessions_on(today - Duration::days(1))?,
            this_week: self.sessions_in_week_of(today)?,
        })
    }

    fn query_records<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<SessionRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let raw = stmt
            .query_map(params, RawRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(raw
            .into_iter()
            .map(RawRow::decode)
            .collect::<Result<Vec<_>, _>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
    }

    fn new_session(started: &str, secs: u64, completed: bool) -> NewSession {
        NewSession {
            started_at: at(started),
            completed_at: None,
            duration_seconds: secs,
            planned_duration: secs,
            meditation_type: MeditationType::BreathAwareness.as_str().into(),
            completed,
        }
    }

    #[test]
    fn insert_returns_incrementing_ids() {
        let db = Database::open_memory().unwrap();
        let id1 = db.insert_session(&new_session("2025-01-01T00:00:00Z", 300, true)).unwrap();
        let id2 = db.insert_session(&new_session("2025-01-01T00:05:00Z", 600, false)).unwrap();
        assert_eq!(id1, 1);
        assert_eq!(id2, id1 + 1);
    }

    #[test]
    fn completed_is_stored_as_integer_and_completed_at_defaults_null() {
        let db = Database::open_memory().unwrap();
        db.insert_session(&new_session("2025-01-01T00:00:00Z", 300, true)).unwrap();
        let (completed, completed_at): (i64, Option<String>) = db
            .conn()
            .query_row("SELECT completed, completed_at FROM sessions WHERE id = 1", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(completed, 1);
        assert!(completed_at.is_none());
    }

    #[test]
    fn totals() {
        let db = Database::open_memory().unwrap();
        assert_eq!(db.total_sessions().unwrap(), 0);
        assert_eq!(db.total_seconds().unwrap(), 0);
        db.insert_session(&new_session("2025-01-01T00:00:00Z", 100, true)).unwrap();
        db.insert_session(&new_session("2025-01-01T00:02:00Z", 200, false)).unwrap();
        assert_eq!(db.total_sessions().unwrap(), 2);
        assert_eq!(db.total_seconds().unwrap(), 300);
    }

    #[test]
    fn recent_sessions_newest_first_with_limit() {
        let db = Database::open_memory().unwrap();
        for day in 1..=5 {
            db.insert_session(&new_session(&format!("2025-01-0{day}T00:00:00Z"), 60, true))
                .unwrap();
        }
        let recent = db.recent_sessions(3).unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].started_at, at("2025-01-05T00:00:00Z"));
        assert_eq!(recent[2].started_at, at("2025-01-03T00:00:00Z"));
        assert_eq!(db.all_sessions().unwrap().len(), 5);
    }

    #[test]
    fn round_trips_completed_at() {
        let db = Database::open_memory().unwrap();
        let mut s = new_session("2025-01-01T00:00:00Z", 300, true);
        s.completed_at = Some(at("2025-01-01T00:05:00.250Z"));
        db.insert_session(&s).unwrap();
        let stored = &db.all_sessions().unwrap()[0];
        assert_eq!(stored.completed_at, s.completed_at);
        assert!(stored.completed);
        assert_eq!(stored.meditation_type, "Breath Awareness");
    }

    #[test]
    fn bucket_is_half_open() {
        let db = Database::open_memory().unwrap();
        db.insert_session(&new_session("2025-03-01T00:00:00Z", 10, true)).unwrap();
        db.insert_session(&new_session("2025-03-02T00:00:00Z", 20, true)).unwrap();
        let from = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let until = Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap();
        assert_eq!(
            db.bucket_between(from, until).unwrap(),
            Bucket { count: 1, total_seconds: 10 }
        );
    }

    #[test]
    fn corrupt_timestamp_is_reported() {
        let db = Database::open_memory().unwrap();
        db.conn()
            .execute(
                "INSERT INTO sessions (started_at, duration_seconds, planned_duration, meditation_type, completed)
                 VALUES ('yesterday', 1, 1, 'x', 1)",
                [],
            )
            .unwrap();
        assert!(db.all_sessions().is_err());
    }
}
