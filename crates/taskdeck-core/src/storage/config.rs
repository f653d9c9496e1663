//! TOML-based application configuration.
//!
//! Stores planning preferences:
//! - Default timezone for wall-clock placement
//! - Priority-tier hours and work-day bounds for the AI sort
//! - Meeting buffers, break thresholds and split rules for slot scheduling
//! - Habit limits and notification hour
//!
//! Configuration is stored at `~/.config/taskdeck/config.toml`.
//! `TASKDECK_TIMEZONE` overrides the stored timezone at load time.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, Result};

pub const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";

/// Wall-clock rules for the dashboard "AI sort".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default = "default_high_hour")]
    pub high_priority_hour: u32,
    #[serde(default = "default_medium_hour")]
    pub medium_priority_hour: u32,
    #[serde(default = "default_low_hour")]
    pub low_priority_hour: u32,
    #[serde(default = "default_day_start")]
    pub work_day_start_hour: u32,
    #[serde(default = "default_day_end")]
    pub work_day_end_hour: u32,
    /// Tasks without a due date spread over days in chunks of this size.
    #[serde(default = "default_tasks_per_day")]
    pub tasks_per_day: u32,
}

/// Rules for fitting tasks into free calendar slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingConfig {
    #[serde(default = "default_meeting_buffer")]
    pub meeting_buffer_minutes: i64,
    #[serde(default = "default_long_break_after")]
    pub long_break_after_minutes: i64,
    #[serde(default = "default_long_break")]
    pub long_break_minutes: i64,
    #[serde(default = "default_short_break_after")]
    pub short_break_after_minutes: i64,
    #[serde(default = "default_short_break")]
    pub short_break_minutes: i64,
    #[serde(default = "default_true")]
    pub allow_split: bool,
    #[serde(default = "default_min_split")]
    pub min_split_minutes: i64,
}

/// Habit tracking limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitConfig {
    #[serde(default = "default_max_active")]
    pub max_active: usize,
    #[serde(default = "default_notification_hour")]
    pub notification_hour: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/taskdeck/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// IANA timezone used when a request does not name one.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub scheduling: SchedulingConfig,
    #[serde(default)]
    pub habits: HabitConfig,
}

// Default functions
fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}
fn default_high_hour() -> u32 {
    9
}
fn default_medium_hour() -> u32 {
    13
}
fn default_low_hour() -> u32 {
    15
}
fn default_day_start() -> u32 {
    8
}
fn default_day_end() -> u32 {
    18
}
fn default_tasks_per_day() -> u32 {
    3
}
fn default_meeting_buffer() -> i64 {
    30
}
fn default_long_break_after() -> i64 {
    90
}
fn default_long_break() -> i64 {
    15
}
fn default_short_break_after() -> i64 {
    50
}
fn default_short_break() -> i64 {
    5
}
fn default_true() -> bool {
    true
}
fn default_min_split() -> i64 {
    15
}
fn default_max_active() -> usize {
    3
}
fn default_notification_hour() -> u32 {
    8
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            high_priority_hour: default_high_hour(),
            medium_priority_hour: default_medium_hour(),
            low_priority_hour: default_low_hour(),
            work_day_start_hour: default_day_start(),
            work_day_end_hour: default_day_end(),
            tasks_per_day: default_tasks_per_day(),
        }
    }
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            meeting_buffer_minutes: default_meeting_buffer(),
            long_break_after_minutes: default_long_break_after(),
            long_break_minutes: default_long_break(),
            short_break_after_minutes: default_short_break_after(),
            short_break_minutes: default_short_break(),
            allow_split: true,
            min_split_minutes: default_min_split(),
        }
    }
}

impl Default for HabitConfig {
    fn default() -> Self {
        Self {
            max_active: default_max_active(),
            notification_hour: default_notification_hour(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            planner: PlannerConfig::default(),
            scheduling: SchedulingConfig::default(),
            habits: HabitConfig::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => value
                        .parse::<bool>()
                        .map(serde_json::Value::Bool)
                        .map_err(|e| invalid(e.to_string()))?,
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as integer")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("cannot replace a whole section".to_string()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Path of the config file inside [`data_dir`].
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or is
    /// invalid, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        let mut cfg = if path.exists() {
            Self::load_from(&path)?
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            cfg
        };
        if let Ok(tz) = std::env::var("TASKDECK_TIMEZONE") {
            if !tz.trim().is_empty() {
                cfg.timezone = tz.trim().to_string();
            }
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load and validate a config file at an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Config = toml::from_str(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(error = %e, "falling back to default configuration");
                Self::default()
            }
        }
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, keeping the existing type.
    ///
    /// The change is validated but not saved; call [`Config::save`] after.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Resolved timezone.
    pub fn tz(&self) -> Result<Tz> {
        crate::time::parse_tz(&self.timezone)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };

        if self.timezone.parse::<Tz>().is_err() {
            return Err(invalid("timezone", "unknown IANA timezone"));
        }

        let p = &self.planner;
        if p.work_day_start_hour >= p.work_day_end_hour || p.work_day_end_hour > 24 {
            return Err(invalid(
                "planner.work_day_end_hour",
                "work day must end after it starts and no later than 24",
            ));
        }
        for (key, hour) in [
            ("planner.high_priority_hour", p.high_priority_hour),
            ("planner.medium_priority_hour", p.medium_priority_hour),
            ("planner.low_priority_hour", p.low_priority_hour),
        ] {
            if hour > 23 {
                return Err(invalid(key, "hour must be between 0 and 23"));
            }
        }
        if p.tasks_per_day == 0 {
            return Err(invalid("planner.tasks_per_day", "must be at least 1"));
        }

        let s = &self.scheduling;
        if s.meeting_buffer_minutes < 0 {
            return Err(invalid("scheduling.meeting_buffer_minutes", "must not be negative"));
        }
        if s.long_break_minutes <= 0 || s.short_break_minutes <= 0 {
            return Err(invalid("scheduling", "break lengths must be positive"));
        }
        if s.short_break_after_minutes > s.long_break_after_minutes {
            return Err(invalid(
                "scheduling.short_break_after_minutes",
                "must not exceed long_break_after_minutes",
            ));
        }
        if s.min_split_minutes <= 0 {
            return Err(invalid("scheduling.min_split_minutes", "must be positive"));
        }

        if self.habits.notification_hour > 23 {
            return Err(invalid("habits.notification_hour", "hour must be between 0 and 23"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.timezone, "America/Los_Angeles");
        assert_eq!(cfg.planner.high_priority_hour, 9);
        assert_eq!(cfg.planner.tasks_per_day, 3);
        assert_eq!(cfg.scheduling.meeting_buffer_minutes, 30);
        assert_eq!(cfg.scheduling.long_break_after_minutes, 90);
        assert_eq!(cfg.scheduling.long_break_minutes, 15);
        assert_eq!(cfg.scheduling.short_break_after_minutes, 50);
        assert_eq!(cfg.scheduling.short_break_minutes, 5);
        assert_eq!(cfg.habits.max_active, 3);
        assert_eq!(cfg.habits.notification_hour, 8);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str("timezone = \"UTC\"\n[planner]\ntasks_per_day = 5\n").unwrap();
        assert_eq!(cfg.timezone, "UTC");
        assert_eq!(cfg.planner.tasks_per_day, 5);
        assert_eq!(cfg.planner.high_priority_hour, 9);
        assert_eq!(cfg.habits.max_active, 3);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("planner.high_priority_hour").as_deref(), Some("9"));
        assert_eq!(cfg.get("scheduling.allow_split").as_deref(), Some("true"));
        assert_eq!(cfg.get("timezone").as_deref(), Some("America/Los_Angeles"));
        assert!(cfg.get("planner.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_number_bool_and_string() {
        let mut cfg = Config::default();
        cfg.set("planner.tasks_per_day", "4").unwrap();
        cfg.set("scheduling.allow_split", "false").unwrap();
        cfg.set("timezone", "Europe/Berlin").unwrap();
        assert_eq!(cfg.planner.tasks_per_day, 4);
        assert!(!cfg.scheduling.allow_split);
        assert_eq!(cfg.timezone, "Europe/Berlin");
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.set("planner.nonexistent", "1").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(_)));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("scheduling.allow_split", "sometimes").is_err());
        assert!(cfg.set("planner.tasks_per_day", "many").is_err());
        assert!(cfg.set("planner", "1").is_err());
    }

    #[test]
    fn set_rejects_out_of_range_and_keeps_old_value() {
        let mut cfg = Config::default();
        assert!(cfg.set("planner.work_day_end_hour", "6").is_err());
        assert_eq!(cfg.planner.work_day_end_hour, 18);
        assert!(cfg.set("timezone", "Nowhere/City").is_err());
        assert_eq!(cfg.timezone, "America/Los_Angeles");
    }

    #[test]
    fn save_and_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.habits.max_active = 2;
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.habits.max_active, 2);
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "planner = 3").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseFailed(_)));
    }

    #[test]
    fn tz_resolves_configured_zone() {
        let cfg = Config::default();
        assert_eq!(cfg.tz().unwrap(), chrono_tz::America::Los_Angeles);
    }
}
