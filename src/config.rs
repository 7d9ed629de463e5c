//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::{ClientConfig, DEFAULT_API_BASE};
use crate::dates::{is_valid_window_days, MAX_WINDOW_DAYS};
use crate::shell::DEFAULT_WINDOW_DAYS;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub view: ViewConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Unset means requests wait indefinitely
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

impl ApiConfig {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Transaction list configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ViewConfig {
    #[serde(default = "default_window_days")]
    pub window_days: i64,
}

fn default_window_days() -> i64 {
    DEFAULT_WINDOW_DAYS
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("weighbridge").join("config.toml")),
            Some(PathBuf::from("/etc/weighbridge/config.toml")),
            Some(PathBuf::from("./weighbridge.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// Load the first of `paths` that exists. A file that exists but does not
    /// load is an error.
    pub fn load_first(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => Self::load_with_env(path),
            None => Self::from_env(),
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = lookup("WEIGHBRIDGE_API_URL") {
            self.api.base_url = url;
        }
        if let Some(timeout) = lookup("WEIGHBRIDGE_TIMEOUT_SECS") {
            let secs = timeout.parse().map_err(|_| {
                ConfigError::Invalid(format!("WEIGHBRIDGE_TIMEOUT_SECS={:?} is not a number", timeout))
            })?;
            self.api.request_timeout_secs = Some(secs);
        }

        if let Some(days) = lookup("WEIGHBRIDGE_WINDOW_DAYS") {
            match days.parse::<i64>() {
                Ok(d) if is_valid_window_days(d) => self.view.window_days = d,
                _ => {
                    return Err(ConfigError::Invalid(format!(
                        "WEIGHBRIDGE_WINDOW_DAYS must be between 1 and {}, got {:?}",
                        MAX_WINDOW_DAYS, days
                    )))
                }
            }
        }

        if let Some(level) = lookup("WEIGHBRIDGE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("WEIGHBRIDGE_LOG_FORMAT") {
            self.logging.format = format;
        }

        self.validate()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_window_days(self.view.window_days) {
            return Err(ConfigError::Invalid(format!(
                "view.window_days must be between 1 and {}, got {}",
                MAX_WINDOW_DAYS, self.view.window_days
            )));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::Invalid(format!(
                "logging.format must be \"pretty\" or \"json\", got {:?}",
                self.logging.format
            )));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Weighbridge Configuration
#
# Environment variables override these settings:
# - WEIGHBRIDGE_API_URL
# - WEIGHBRIDGE_TIMEOUT_SECS
# - WEIGHBRIDGE_WINDOW_DAYS
# - WEIGHBRIDGE_LOG_LEVEL
# - WEIGHBRIDGE_LOG_FORMAT

[api]
# Weighing backend base URL (without the /api suffix)
base_url = "http://localhost:8080"

# Request timeout in seconds; leave unset to wait indefinitely
# request_timeout_secs = 30

[view]
# Days of history shown in the transaction list
window_days = 7

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for log shipping)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.request_timeout_secs, None);
        assert_eq!(config.view.window_days, 7);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.view.window_days, 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"http://scale:5000\"\nrequest_timeout_secs = 10"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.api.base_url, "http://scale:5000");
        assert_eq!(
            config.api.client_config().request_timeout,
            Some(Duration::from_secs(10))
        );
        assert_eq!(config.view.window_days, 7);
    }

    #[test]
    fn test_load_rejects_bad_window() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[view]\nwindow_days = 0").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_load_rejects_huge_window() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[view]\nwindow_days = 9223372036854775807").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_load_first_reports_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let broken = dir.path().join("broken.toml");
        let good = dir.path().join("good.toml");
        std::fs::write(&broken, "[api\nbase_url = ").unwrap();
        std::fs::write(&good, "[view]\nwindow_days = 3").unwrap();

        let err = Config::load_first(&[missing.clone(), broken, good.clone()]).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        let config = Config::load_first(&[missing.clone(), good]).unwrap();
        assert_eq!(config.view.window_days, 3);

        let config = Config::load_first(&[missing]).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_overrides_reject_bad_window() {
        let vars: std::collections::HashMap<&str, &str> = [
            ("WEIGHBRIDGE_API_URL", "http://scale:9000"),
            ("WEIGHBRIDGE_WINDOW_DAYS", "14"),
        ]
        .into_iter()
        .collect();
        let mut config = Config::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.api.base_url, "http://scale:9000");
        assert_eq!(config.view.window_days, 14);

        for bad in ["0", "100000000", "9223372036854775807", "week"] {
            let mut config = Config::default();
            let err = config
                .apply_overrides(|key| {
                    (key == "WEIGHBRIDGE_WINDOW_DAYS").then(|| bad.to_string())
                })
                .unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{}", bad);
            assert_eq!(config.view.window_days, 7);
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/weighbridge.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api\nbase_url = ").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
