//! Application configuration.

use std::path::{Path, PathBuf};

use portal_notify::{DEFAULT_BUS_CAPACITY, DEFAULT_INBOX_CAPACITY};
use portal_oms::SubmissionConfig;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Default config location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "PORTAL_CONFIG";

/// Notification sink sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Notifications kept per inbox. Default: 50.
    #[serde(default = "default_inbox_capacity")]
    pub inbox_capacity: usize,
    /// Broadcast buffer per subscriber. Default: 64.
    #[serde(default = "default_bus_capacity")]
    pub bus_capacity: usize,
}

fn default_inbox_capacity() -> usize {
    DEFAULT_INBOX_CAPACITY
}

fn default_bus_capacity() -> usize {
    DEFAULT_BUS_CAPACITY
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            inbox_capacity: default_inbox_capacity(),
            bus_capacity: default_bus_capacity(),
        }
    }
}

/// Top-level portal configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Source tag stamped on order notifications. Default: "oms".
    #[serde(default = "default_source")]
    pub source: String,
    /// Origin the host shell is served from; modules on it are not probed.
    #[serde(default = "default_host_origin")]
    pub host_origin: String,
    /// Reference data JSON. Built-in demo tables when unset.
    #[serde(default)]
    pub reference_data: Option<PathBuf>,
    /// Module manifest JSON.
    #[serde(default = "default_modules_manifest")]
    pub modules_manifest: PathBuf,
    #[serde(default)]
    pub submission: SubmissionConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

fn default_source() -> String {
    "oms".to_string()
}

fn default_host_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_modules_manifest() -> PathBuf {
    PathBuf::from("config/module.json")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            host_origin: default_host_origin(),
            reference_data: None,
            modules_manifest: default_modules_manifest(),
            submission: SubmissionConfig::default(),
            notifications: NotificationConfig::default(),
        }
    }
}

impl AppConfig {
    /// Resolve the config path: explicit > `PORTAL_CONFIG` > default.
    pub fn resolve_path(explicit: Option<String>) -> String {
        explicit
            .or_else(|| std::env::var(CONFIG_ENV).ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
    }

    /// Load from `path`, falling back to defaults when the file is missing.
    pub fn load(path: &str) -> AppResult<Self> {
        if Path::new(path).exists() {
            Self::from_file(path)
        } else {
            tracing::warn!(path = %path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a TOML file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Layer `PORTAL__*` environment overrides over an optional TOML file.
    ///
    /// Nested keys use a double underscore, e.g.
    /// `PORTAL__SUBMISSION__DELAY_MS=0`.
    pub fn load_with_env(path: &str) -> AppResult<Self> {
        if !Path::new(path).exists() {
            tracing::warn!(path = %path, "Config file not found, using defaults and environment");
        }
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("PORTAL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build config: {e}")))?;

        let config: Self = settings
            .try_deserialize()
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        self.submission
            .validate()
            .map_err(|e| AppError::Config(e.to_string()))?;
        if self.notifications.inbox_capacity == 0 || self.notifications.bus_capacity == 0 {
            return Err(AppError::Config(
                "notification capacities must be positive".to_string(),
            ));
        }
        if self.source.trim().is_empty() {
            return Err(AppError::Config("source must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.source, "oms");
        assert_eq!(config.submission.delay_ms, 1200);
        assert_eq!(config.notifications.inbox_capacity, 50);
        assert!(config.reference_data.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            host_origin = "https://portal.example.com"

            [submission]
            delay_ms = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.host_origin, "https://portal.example.com");
        assert_eq!(config.submission.delay_ms, 0);
        assert_eq!(config.submission.failure_threshold, 0.15);
        assert_eq!(config.notifications.bus_capacity, 64);
    }

    #[test]
    fn test_from_file_rejects_bad_threshold() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[submission]\nfailure_threshold = 1.5").unwrap();

        let err = AppConfig::from_file(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load("/definitely/not/here.toml").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_layered_load_reads_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "source = \"desk\"\n[notifications]\ninbox_capacity = 10").unwrap();

        let config = AppConfig::load_with_env(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.source, "desk");
        assert_eq!(config.notifications.inbox_capacity, 10);
        assert_eq!(config.notifications.bus_capacity, 64);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("host_origin"));
        let back: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(back, config);
    }
}
