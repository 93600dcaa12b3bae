//! Configuration management for nudge.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "nudge";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "nudge.db";

/// Prefix of environment variables that override the file.
const ENV_PREFIX: &str = "NUDGE_";

/// Storage key the reminder collection is kept under.
pub const DEFAULT_STORAGE_KEY: &str = "reminders";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `NUDGE_`, sections split on `__`,
///    e.g. `NUDGE_SCHEDULER__CHECK_INTERVAL_SECS`)
/// 2. TOML config file at `~/.config/nudge/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Scheduler configuration.
    pub scheduler: SchedulerConfig,
    /// Notification configuration.
    pub notifications: NotificationConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/nudge/nudge.db`
    pub database_path: Option<PathBuf>,
    /// Key of the entry holding the serialized reminders.
    pub key: String,
}

/// Scheduler-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Seconds between due-reminder checks.
    pub check_interval_secs: u64,
}

/// Which notification backend delivers due reminders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Native desktop notifications.
    #[default]
    Desktop,
    /// Write notifications to the log only.
    Log,
    /// Never show notifications.
    None,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Desktop => write!(f, "desktop"),
            Self::Log => write!(f, "log"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Notification-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Backend used to show notifications.
    pub backend: BackendKind,
    /// Notification title; the reminder message is the body.
    pub title: String,
    /// Application name reported to the notification server.
    pub app_name: String,
    /// How long a notification stays visible, in milliseconds.
    /// Set to 0 to use the backend default.
    pub timeout_ms: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Resolved at runtime
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: 60,
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Desktop,
            title: "Reminder".to_string(),
            app_name: "nudge".to_string(),
            timeout_ms: 0,
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);
        Self::extract(&config_file, ENV_PREFIX)
    }

    fn extract(config_file: &Path, env_prefix: &str) -> Result<Self> {
        // Top-level tables are config sections, not figment profiles
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(env_prefix).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.scheduler.check_interval_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "check_interval_secs must be greater than 0".to_string(),
            });
        }

        if self.storage.key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "storage key must not be empty".to_string(),
            });
        }

        if self.notifications.title.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "notification title must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the scheduler check period as a Duration.
    #[must_use]
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.scheduler.check_interval_secs)
    }

    /// Get the notification timeout, if one is configured.
    #[must_use]
    pub fn notification_timeout(&self) -> Option<Duration> {
        if self.notifications.timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(u64::from(self.notifications.timeout_ms)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.storage.key, "reminders");
        assert_eq!(config.scheduler.check_interval_secs, 60);
        assert_eq!(config.notifications.backend, BackendKind::Desktop);
        assert_eq!(config.notifications.title, "Reminder");
    }

    #[test]
    fn test_default_storage_config() {
        let storage = StorageConfig::default();

        assert!(storage.database_path.is_none());
        assert_eq!(storage.key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn test_default_notification_config() {
        let notifications = NotificationConfig::default();

        assert_eq!(notifications.app_name, "nudge");
        assert_eq!(notifications.timeout_ms, 0);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_check_interval() {
        let mut config = Config::default();
        config.scheduler.check_interval_secs = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("check_interval_secs"));
    }

    #[test]
    fn test_validate_empty_storage_key() {
        let mut config = Config::default();
        config.storage.key = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("storage key"));
    }

    #[test]
    fn test_validate_empty_title() {
        let mut config = Config::default();
        config.notifications.title = String::new();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("title"));
    }

    #[test]
    fn test_database_path_default() {
        let path = Config::default().database_path();
        assert!(path.to_string_lossy().contains("nudge.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_check_interval() {
        assert_eq!(Config::default().check_interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_notification_timeout() {
        let mut config = Config::default();
        assert!(config.notification_timeout().is_none());

        config.notifications.timeout_ms = 5000;
        assert_eq!(
            config.notification_timeout(),
            Some(Duration::from_millis(5000))
        );
    }

    #[test]
    fn test_backend_kind_display() {
        assert_eq!(BackendKind::Desktop.to_string(), "desktop");
        assert_eq!(BackendKind::Log.to_string(), "log");
        assert_eq!(BackendKind::None.to_string(), "none");
    }

    #[test]
    fn test_backend_kind_deserialize() {
        let kind: BackendKind = serde_json::from_str("\"log\"").unwrap();
        assert_eq!(kind, BackendKind::Log);
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("nudge"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!("nudge_config_{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[scheduler]\ncheck_interval_secs = 5\n\n[notifications]\nbackend = \"log\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path.clone())).unwrap();
        assert_eq!(config.scheduler.check_interval_secs, 5);
        assert_eq!(config.notifications.backend, BackendKind::Log);
        assert_eq!(config.storage.key, DEFAULT_STORAGE_KEY);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let path = std::env::temp_dir().join(format!(
            "nudge_bad_config_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[scheduler]\ncheck_interval_secs = 0\n").unwrap();

        let result = Config::load_from(Some(path.clone()));
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_file_sections_and_storage_path() {
        let path = std::env::temp_dir().join(format!(
            "nudge_sections_config_{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "[storage]\ndatabase_path = \"/tmp/nudge-test.db\"\nkey = \"mine\"\n\n\
             [notifications]\ntitle = \"Heads up\"\ntimeout_ms = 2500\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path.clone())).unwrap();
        assert_eq!(config.database_path(), PathBuf::from("/tmp/nudge-test.db"));
        assert_eq!(config.storage.key, "mine");
        assert_eq!(config.notifications.title, "Heads up");
        assert_eq!(
            config.notification_timeout(),
            Some(Duration::from_millis(2500))
        );
        assert_eq!(config.scheduler.check_interval_secs, 60);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_env_overrides_file() {
        let prefix = format!("NUDGETEST_ENV_{}_", std::process::id());
        let path = std::env::temp_dir().join(format!(
            "nudge_env_config_{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "[scheduler]\ncheck_interval_secs = 5\n\n[notifications]\nbackend = \"desktop\"\n",
        )
        .unwrap();
        std::env::set_var(format!("{prefix}SCHEDULER__CHECK_INTERVAL_SECS"), "30");
        std::env::set_var(format!("{prefix}NOTIFICATIONS__BACKEND"), "log");

        let config = Config::extract(&path, &prefix).unwrap();
        assert_eq!(config.scheduler.check_interval_secs, 30);
        assert_eq!(config.notifications.backend, BackendKind::Log);

        std::env::remove_var(format!("{prefix}SCHEDULER__CHECK_INTERVAL_SECS"));
        std::env::remove_var(format!("{prefix}NOTIFICATIONS__BACKEND"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_env_invalid_value_fails_validation() {
        let prefix = format!("NUDGETEST_ZERO_{}_", std::process::id());
        std::env::set_var(format!("{prefix}SCHEDULER__CHECK_INTERVAL_SECS"), "0");

        let result = Config::extract(Path::new("/nonexistent/config.toml"), &prefix);
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));

        std::env::remove_var(format!("{prefix}SCHEDULER__CHECK_INTERVAL_SECS"));
    }
}
