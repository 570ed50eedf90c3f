//! Configuration management for the firechair crawler
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files. Command-line flags are applied on top by the
//! binary.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Crawler configuration
    pub crawler: CrawlerConfig,

    /// Persistence configuration
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Crawler-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Site origin, e.g. `https://www.kleinanzeigen.de`
    pub base_url: String,

    /// Category path segment appended to every listing-page URL
    pub category: String,

    /// User agent string sent with every request
    pub user_agent: String,

    /// Minimum delay before every detail-page request in milliseconds
    pub request_delay_ms: u64,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

/// Persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory receiving one `{query}.csv` per crawl
    pub output_dir: PathBuf,

    /// SQLite database path
    pub sqlite_path: PathBuf,

    /// Write the CSV file
    pub write_csv: bool,

    /// Write to the SQLite store
    pub write_database: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let base_url =
            std::env::var("FIRECHAIR_BASE_URL").unwrap_or(defaults.crawler.base_url);

        let category = std::env::var("FIRECHAIR_CATEGORY").unwrap_or(defaults.crawler.category);

        let user_agent =
            std::env::var("FIRECHAIR_USER_AGENT").unwrap_or(defaults.crawler.user_agent);

        let request_delay_ms = std::env::var("FIRECHAIR_REQUEST_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.crawler.request_delay_ms);

        let request_timeout_secs = std::env::var("FIRECHAIR_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.crawler.request_timeout_secs);

        let output_dir = std::env::var("FIRECHAIR_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.storage.output_dir);

        let sqlite_path = std::env::var("FIRECHAIR_SQLITE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.storage.sqlite_path);

        let log_level =
            std::env::var("FIRECHAIR_LOG_LEVEL").unwrap_or(defaults.logging.level);

        let log_format =
            std::env::var("FIRECHAIR_LOG_FORMAT").unwrap_or(defaults.logging.format);

        let config = Self {
            crawler: CrawlerConfig {
                base_url,
                category,
                user_agent,
                request_delay_ms,
                request_timeout_secs,
            },
            storage: StorageConfig {
                output_dir,
                sqlite_path,
                write_csv: defaults.storage.write_csv,
                write_database: defaults.storage.write_database,
            },
            logging: LoggingConfig {
                level: log_level,
                format: log_format,
            },
        };

        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Invalid TOML configuration")?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let base = url::Url::parse(&self.crawler.base_url)
            .with_context(|| format!("base_url is not a valid URL: {}", self.crawler.base_url))?;
        if !matches!(base.scheme(), "http" | "https") {
            anyhow::bail!("base_url must use http or https");
        }

        if self.crawler.category.trim().is_empty() {
            anyhow::bail!("category must not be empty");
        }

        if self.crawler.user_agent.trim().is_empty() {
            anyhow::bail!("user_agent must not be empty");
        }

        if self.crawler.request_delay_ms == 0 {
            anyhow::bail!("request_delay_ms must be greater than 0");
        }

        if self.crawler.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if !self.storage.write_csv && !self.storage.write_database {
            anyhow::bail!("at least one of write_csv and write_database must be enabled");
        }

        if !matches!(
            self.logging.level.as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        ) {
            anyhow::bail!("logging.level must be one of trace, debug, info, warn, error");
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            anyhow::bail!("logging.format must be text or json");
        }

        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.crawler.request_timeout_secs)
    }

    /// Get the detail-page request delay as Duration
    #[must_use]
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.crawler.request_delay_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig {
                base_url: String::from("https://www.kleinanzeigen.de"),
                category: String::from("k0c305"),
                user_agent: String::from("Mozilla/5.0"),
                request_delay_ms: 1500,
                request_timeout_secs: 30,
            },
            storage: StorageConfig {
                output_dir: PathBuf::from("."),
                sqlite_path: PathBuf::from("motorrad.db"),
                write_csv: true,
                write_database: true,
            },
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_delay_rejected() {
        let mut config = Config::default();
        config.crawler.request_delay_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let mut config = Config::default();
        config.crawler.base_url = String::from("not a url");
        assert!(config.validate().is_err());

        config.crawler.base_url = String::from("ftp://example.com");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_no_storage_target_rejected() {
        let mut config = Config::default();
        config.storage.write_csv = false;
        config.storage.write_database = false;
        assert!(config.validate().is_err());

        config.storage.write_database = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_logging_values_rejected() {
        let mut config = Config::default();
        config.logging.level = String::from("verbose");
        assert!(config.validate().is_err());

        config.logging.level = String::from("debug");
        config.logging.format = String::from("xml");
        assert!(config.validate().is_err());

        config.logging.format = String::from("json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_duration_conversion() {
        let config = Config::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.request_delay(), Duration::from_millis(1500));
    }

    #[test]
    fn test_from_toml_str_without_logging_section() {
        let toml = r#"
            [crawler]
            base_url = "http://127.0.0.1:8080"
            category = "k0c305"
            user_agent = "Mozilla/5.0"
            request_delay_ms = 10
            request_timeout_secs = 5

            [storage]
            output_dir = "out"
            sqlite_path = "out/test.db"
            write_csv = true
            write_database = false
        "#;
        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.crawler.request_delay_ms, 10);
        assert_eq!(config.storage.output_dir, PathBuf::from("out"));
        assert_eq!(config.logging.format, "text");
        assert!(config.validate().is_ok());
    }
}
