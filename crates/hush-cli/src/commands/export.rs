use hush_core::storage::Database;
use hush_core::{export, ExportFormat};

pub fn run(format: ExportFormat) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let sessions = db.all_sessions()?;
    print!("{}", export::export(&sessions, format)?);
    if format == ExportFormat::Json {
        println!();
    }
    Ok(())
}
