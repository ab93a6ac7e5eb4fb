mod config;
mod event_store;

pub use config::{Config, DisplayConfig, ExpanderConfig, ExportConfig};
pub use event_store::{EventStore, STORAGE_SLOT};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the directory holding `config.toml` and the event list.
///
/// Resolution order:
/// - `COUNTDOWN_DATA_DIR` if set
/// - `~/.config/countdown-dev/` when `COUNTDOWN_ENV=dev`
/// - `~/.config/countdown/`
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("COUNTDOWN_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("COUNTDOWN_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("countdown-dev")
            } else {
                base_dir.join("countdown")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
