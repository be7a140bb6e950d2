mod alarm_store;
mod config;

pub use alarm_store::{AlarmStore, DEFAULT_STORE_FILE};
pub use config::{Config, DemoAlarm, DemoConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `<config_dir>/alarm-demo/`, e.g. `~/.config/alarm-demo/` on Linux.
///
/// The directory is not created; reading a missing config falls back to defaults.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("alarm-demo"))
        .ok_or(ConfigError::NoConfigDir)
}
