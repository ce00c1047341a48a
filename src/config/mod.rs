//! Configuration management for the export engine
//!
//! This module handles loading, parsing, and managing configuration from:
//! - Configuration files (TOML format)
//! - Command-line arguments
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Connection configuration
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Export configuration
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Default MongoDB connection URI
    #[serde(default = "default_uri")]
    pub default_uri: String,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Maximum pool size
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: u32,

    /// Minimum pool size
    #[serde(default = "default_min_pool_size")]
    pub min_pool_size: u32,

    /// Connection idle timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout: u64,
}

/// Export engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Collection to export from
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Number of records fetched per page
    #[serde(default = "default_page_size")]
    pub page_size: u64,

    /// Per-page fetch timeout in seconds (0 disables)
    #[serde(default = "default_page_timeout")]
    pub page_timeout_secs: u64,

    /// Prefix for generated download filenames
    #[serde(default = "default_filename_prefix")]
    pub filename_prefix: String,

    /// Show a progress bar while exporting
    #[serde(default = "default_progress_bar")]
    pub progress_bar: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Include timestamps in log output
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_pool_size() -> u32 {
    10
}

fn default_min_pool_size() -> u32 {
    2
}

fn default_idle_timeout() -> u64 {
    300
}

fn default_collection() -> String {
    "pois".to_string()
}

fn default_page_size() -> u64 {
    100
}

fn default_page_timeout() -> u64 {
    30
}

fn default_filename_prefix() -> String {
    "POI-EXPORT".to_string()
}

fn default_progress_bar() -> bool {
    true
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    true
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            default_uri: default_uri(),
            timeout: default_timeout(),
            max_pool_size: default_max_pool_size(),
            min_pool_size: default_min_pool_size(),
            idle_timeout: default_idle_timeout(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            collection: default_collection(),
            page_size: default_page_size(),
            page_timeout_secs: default_page_timeout(),
            filename_prefix: default_filename_prefix(),
            progress_bar: default_progress_bar(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        if self.export.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "export.page_size".to_string(),
                value: "0".to_string(),
            }
            .into());
        }

        if self.export.collection.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "export.collection".to_string(),
                value: String::new(),
            }
            .into());
        }

        Ok(())
    }

    /// Get connection timeout as Duration
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection.timeout)
    }

    /// Get per-page fetch timeout as Duration, if enabled
    pub fn page_timeout(&self) -> Option<Duration> {
        if self.export.page_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.export.page_timeout_secs))
        }
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.connection.default_uri, "mongodb://localhost:27017");
        assert_eq!(config.export.page_size, 100);
        assert_eq!(config.export.filename_prefix, "POI-EXPORT");
    }

    #[test]
    fn test_page_timeout_disabled() {
        let mut config = Config::default();
        config.export.page_timeout_secs = 0;
        assert_eq!(config.page_timeout(), None);
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let mut config = Config::default();
        config.export.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml_src = r#"
            [export]
            collection = "waypoints"
            page_size = 50
        "#;

        let config: Config = toml::from_str(toml_src).unwrap();
        assert_eq!(config.export.collection, "waypoints");
        assert_eq!(config.export.page_size, 50);
        // Untouched sections fall back to defaults
        assert_eq!(config.connection.timeout, 30);
        assert_eq!(config.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_connection_timeout() {
        let config = Config::default();
        assert_eq!(config.connection_timeout(), Duration::from_secs(30));
    }
}
