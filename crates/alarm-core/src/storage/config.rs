//! TOML-based application configuration.
//!
//! Holds:
//! - Location of the alarm file
//! - The password accepted by the mock credential check
//! - The message attached to scheduled alarms
//! - The demo scenario (user, alarms, polling cadence)
//!
//! Configuration lives at `<config_dir>/alarm-demo/config.toml`. A missing
//! file means defaults; every field may be omitted.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{config_dir, DEFAULT_STORE_FILE};
use crate::alarm::Channel;
use crate::auth::DEFAULT_EXPECTED_PASSWORD;
use crate::error::ConfigError;
use crate::service::DEFAULT_MESSAGE;

/// One alarm the demo schedules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoAlarm {
    pub offset_secs: i64,
    pub channel: Channel,
}

/// Demo scenario configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_password")]
    pub password: String,
    /// Per-user index deleted after listing.
    #[serde(default = "default_delete_index")]
    pub delete_index: usize,
    #[serde(default = "default_poll_iterations")]
    pub poll_iterations: u32,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_demo_alarms")]
    pub alarms: Vec<DemoAlarm>,
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Alarm file; relative paths resolve against the working directory.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    #[serde(default = "default_password")]
    pub expected_password: String,
    #[serde(default = "default_message_template")]
    pub message_template: String,
    #[serde(default)]
    pub demo: DemoConfig,
}

// Default functions
fn default_store_path() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_FILE)
}
fn default_username() -> String {
    "nicole.dominic".into()
}
fn default_password() -> String {
    DEFAULT_EXPECTED_PASSWORD.into()
}
fn default_message_template() -> String {
    DEFAULT_MESSAGE.into()
}
fn default_demo_alarms() -> Vec<DemoAlarm> {
    vec![
        DemoAlarm { offset_secs: 5, channel: Channel::Email },
        DemoAlarm { offset_secs: 10, channel: Channel::Sms },
        DemoAlarm { offset_secs: 15, channel: Channel::Push },
    ]
}
fn default_delete_index() -> usize {
    1
}
fn default_poll_iterations() -> u32 {
    20
}
fn default_poll_interval_ms() -> u64 {
    1000
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            password: default_password(),
            delete_index: default_delete_index(),
            poll_iterations: default_poll_iterations(),
            poll_interval_ms: default_poll_interval_ms(),
            alarms: default_demo_alarms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            expected_password: default_password(),
            message_template: default_message_template(),
            demo: DemoConfig::default(),
        }
    }
}

impl Config {
    /// `<config_dir>/alarm-demo/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load from the default location, or defaults if nothing is there.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::default_path()?)
    }

    /// Load from `path`, or return defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed,
    /// or if a parsed value fails validation.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Config = toml::from_str(&content).map_err(|source| ConfigError::ParseFailed {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to `path`, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };

        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
            }
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.store_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "store_path".into(),
                message: "must not be empty".into(),
            });
        }
        if self.message_template.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "message_template".into(),
                message: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_demo_scenario() {
        let cfg = Config::default();
        assert_eq!(cfg.store_path, PathBuf::from("alarms.json"));
        assert_eq!(cfg.demo.username, "nicole.dominic");
        let offsets: Vec<_> = cfg.demo.alarms.iter().map(|a| a.offset_secs).collect();
        assert_eq!(offsets, vec![5, 10, 15]);
        assert_eq!(cfg.demo.delete_index, 1);
        assert_eq!(cfg.demo.poll_iterations, 20);
        assert_eq!(cfg.demo.poll_interval_ms, 1000);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::load_from(dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg.expected_password, "correct_password");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
store_path = "/tmp/other.json"

[demo]
poll_iterations = 3
alarms = [{ offset_secs = 1, channel = "sms" }]
"#,
        )
        .unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.store_path, PathBuf::from("/tmp/other.json"));
        assert_eq!(cfg.demo.poll_iterations, 3);
        assert_eq!(cfg.demo.poll_interval_ms, 1000);
        assert_eq!(
            cfg.demo.alarms,
            vec![DemoAlarm { offset_secs: 1, channel: Channel::Sms }]
        );
        assert_eq!(cfg.message_template, "Your alarm went off!");
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "store_path = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseFailed { .. }));
    }

    #[test]
    fn test_empty_template_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "message_template = \"  \"").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sub").join("config.toml");
        let mut cfg = Config::default();
        cfg.demo.username = "someone".into();
        cfg.demo.poll_interval_ms = 10;

        cfg.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();

        assert_eq!(loaded.demo.username, "someone");
        assert_eq!(loaded.demo.poll_interval_ms, 10);
        assert_eq!(loaded.demo.alarms, cfg.demo.alarms);
    }
}
