mod config;
pub mod database;

pub use config::Config;
pub use database::{Database, MeditationType, NewSession, SessionRecord};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the hush data directory, creating it if needed.
///
/// Resolution order:
/// - `HUSH_DATA_DIR`, used verbatim
/// - `<platform data dir>/hush-dev` when `HUSH_ENV=dev`
/// - `<platform data dir>/hush`
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("HUSH_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
            let env = std::env::var("HUSH_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base.join("hush-dev")
            } else {
                base.join("hush")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
