//! On-disk configuration.
//!
//! Tasks are never written to disk; the only file taskdeck owns is the TOML
//! configuration under the config directory.

mod config;

pub use config::{Config, HabitConfig, PlannerConfig, SchedulingConfig, DEFAULT_TIMEZONE};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/taskdeck[-dev]/` based on TASKDECK_ENV.
///
/// Set TASKDECK_ENV=dev to use a development config directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TASKDECK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("taskdeck-dev")
    } else {
        base_dir.join("taskdeck")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::NoConfigDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
