mod config;
pub mod migrations;
mod repository;
pub mod schedule_db;
mod writer;

pub use config::Config;
pub use repository::{MemoryRepository, ScheduleRepository};
pub use schedule_db::ScheduleDb;
pub use writer::{CommitWriter, WriteOutcome};

use std::path::PathBuf;

/// Returns the shiftgrid data directory, creating it if needed.
///
/// `SHIFTGRID_DATA_DIR` wins when set. Otherwise `~/.config/shiftgrid/`, or
/// `~/.config/shiftgrid-dev/` with `SHIFTGRID_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("SHIFTGRID_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("SHIFTGRID_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("shiftgrid-dev")
            } else {
                base_dir.join("shiftgrid")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
