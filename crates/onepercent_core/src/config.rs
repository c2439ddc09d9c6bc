//! Environment-driven runtime configuration.
//!
//! # Responsibility
//! - Resolve database path, log settings and auto-save quiet period.
//!
//! # Invariants
//! - Resolution never fails; invalid or empty values fall back to defaults
//!   and are reported with a `warn` event.

use crate::logging::{default_log_level, normalize_level};
use log::warn;
use std::path::PathBuf;
use std::time::Duration;

pub const DB_PATH_ENV: &str = "ONEPERCENT_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "ONEPERCENT_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "ONEPERCENT_LOG_DIR";
pub const AUTOSAVE_MS_ENV: &str = "ONEPERCENT_AUTOSAVE_MS";

const DEFAULT_DB_FILE_NAME: &str = "onepercent.db";
const DEFAULT_AUTOSAVE_MS: u64 = 500;

/// Resolved journal configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// `None` leaves file logging disabled.
    pub log_dir: Option<PathBuf>,
    /// Quiet period before a burst of entry edits is written.
    pub autosave_quiet_period: Duration,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
            autosave_quiet_period: Duration::from_millis(DEFAULT_AUTOSAVE_MS),
        }
    }
}

impl JournalConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its raw value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(path) = read(DB_PATH_ENV) {
            config.db_path = PathBuf::from(path);
        }

        if let Some(level) = read(LOG_LEVEL_ENV) {
            match normalize_level(&level) {
                Ok(level) => config.log_level = level,
                Err(err) => warn!(
                    "event=config_load module=config status=fallback key={LOG_LEVEL_ENV} \
                     error={err}"
                ),
            }
        }

        config.log_dir = read(LOG_DIR_ENV).map(PathBuf::from);

        if let Some(raw) = read(AUTOSAVE_MS_ENV) {
            match raw.parse::<u64>() {
                Ok(ms) => config.autosave_quiet_period = Duration::from_millis(ms),
                Err(err) => warn!(
                    "event=config_load module=config status=fallback key={AUTOSAVE_MS_ENV} \
                     error={err}"
                ),
            }
        }

        config
    }
}
