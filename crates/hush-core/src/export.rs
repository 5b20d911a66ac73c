//! Session history export (JSON and CSV).

use std::str::FromStr;

use chrono::SecondsFormat;

use crate::error::{Result, ValidationError};
use crate::storage::SessionRecord;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl FromStr for ExportFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(ValidationError::InvalidValue {
                field: "format".into(),
                message: format!("unknown export format '{other}' (expected json or csv)"),
            }),
        }
    }
}

const CSV_HEADER: &str =
    "id,started_at,completed_at,duration_seconds,planned_duration,meditation_type,completed";

/// Render records in the requested format.
///
/// # Errors
/// Returns an error if JSON serialization fails.
pub fn export(records: &[SessionRecord], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => to_json(records),
        ExportFormat::Csv => Ok(to_csv(records)),
    }
}

/// Pretty-printed JSON array of records.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn to_json(records: &[SessionRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// CSV with a header row. `completed_at` is empty for sessions that never
/// finished; `completed` is `true`/`false`.
pub fn to_csv(records: &[SessionRecord]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for r in records {
        let fields = [
            r.id.to_string(),
            r.started_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            r.completed_at
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
                .unwrap_or_default(),
            r.duration_seconds.to_string(),
            r.planned_duration.to_string(),
            csv_field(&r.meditation_type),
            r.completed.to_string(),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
