mod config;
pub mod database;
pub mod sink_store;

pub use config::Config;
pub use database::Database;
pub use sink_store::StoredSink;

use std::path::PathBuf;

/// Returns `~/.config/workday-alerts[-dev]/` based on WORKDAY_ENV.
///
/// Set WORKDAY_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if the config directory cannot be created.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("WORKDAY_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("workday-alerts-dev")
    } else {
        base_dir.join("workday-alerts")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
