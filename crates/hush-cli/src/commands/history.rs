use chrono::Local;
use hush_core::format::format_clock;
use hush_core::storage::{Database, SessionRecord};

fn history_line(record: &SessionRecord) -> String {
    let started = record.started_at.with_timezone(&Local).format("%Y-%m-%d %H:%M");
    let mark = if record.completed { "done" } else { "ended early" };
    format!(
        "{started}  {:<17} {:>8}  {mark}",
        record.meditation_type,
        format_clock(record.duration_seconds as f64)
    )
}

pub fn run(limit: usize, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let sessions = db.recent_sessions(limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!("No sessions yet. Try `hs breathe`.");
        return Ok(());
    }
    for record in &sessions {
        println!("{}", history_line(record));
    }
    Ok(())
}
