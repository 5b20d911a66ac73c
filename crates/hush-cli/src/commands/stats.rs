use chrono::Local;
use hush_core::format::{format_minutes, pluralize};
use hush_core::storage::Database;
use hush_core::Bucket;

fn bucket_line(bucket: &Bucket) -> String {
    format!(
        "{} ({})",
        pluralize(bucket.count, "session"),
        format_minutes(bucket.total_seconds)
    )
}

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let summary = db.summary(Local::now().date_naive())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!();
    println!("  Practice Summary");
    println!();
    println!("  Total sessions:     {}", summary.total_sessions);
    println!("  Total time:         {}", format_minutes(summary.total_seconds));
    println!(
        "  Current streak:     {}",
        pluralize(u64::from(summary.current_streak), "day")
    );
    println!(
        "  Longest streak:     {}",
        pluralize(u64::from(summary.longest_streak), "day")
    );
    println!();
    println!("  Recent practice:");
    println!("  Today:      {}", bucket_line(&summary.today));
    println!("  Yesterday:  {}", bucket_line(&summary.yesterday));
    println!("  This week:  {}", bucket_line(&summary.this_week));
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_line_pluralizes() {
        let one = Bucket { count: 1, total_seconds: 300 };
        assert_eq!(bucket_line(&one), "1 session (5 min)");
        let many = Bucket { count: 3, total_seconds: 4500 };
        assert_eq!(bucket_line(&many), "3 sessions (1h 15m)");
    }
}
