//! Configuration file management.
//!
//! Read from `payplan.toml` in the data directory. Every field has a
//! default, so a missing file or a partial file is fine.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Complete service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Read-model refresh settings.
    #[serde(default)]
    pub refresh: RefreshConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory. Empty = platform default.
    #[serde(default)]
    pub data_dir: String,
}

/// Read-model refresh configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Seconds between forced refreshes of every cached snapshot.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Change events buffered per subscriber before it lags.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
    /// Days of daily earnings kept in the mirror.
    #[serde(default = "default_earnings_retention")]
    pub earnings_retention_days: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace" | "debug" | "info" | "warn" | "error".
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions

fn default_poll_interval() -> u64 {
    30
}

fn default_event_buffer() -> usize {
    1000
}

fn default_earnings_retention() -> u64 {
    35
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            event_buffer: default_event_buffer(),
            earnings_retention_days: default_earnings_retention(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl RefreshConfig {
    /// Poll interval, never shorter than one second.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

impl DaemonConfig {
    /// Load configuration from the default config file location.
    ///
    /// Falls back to defaults if file does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::parse(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> PathBuf {
        if self.storage.data_dir.is_empty() {
            Self::default_data_dir()
        } else {
            PathBuf::from(&self.storage.data_dir)
        }
    }

    /// Get the config file path.
    fn config_path() -> PathBuf {
        Self::default_data_dir().join("payplan.toml")
    }

    /// Platform-specific default data directory.
    fn default_data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("PAYPLAN_DATA_DIR") {
            return PathBuf::from(dir);
        }
        #[cfg(target_os = "macos")]
        {
            dirs_fallback("Library/Application Support/Payplan")
        }
        #[cfg(target_os = "windows")]
        {
            dirs_fallback("Payplan")
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            dirs_fallback(".payplan")
        }
    }
}

/// Fallback home directory resolution.
fn dirs_fallback(subpath: &str) -> PathBuf {
    std::env::var("HOME")
        .map(|h| PathBuf::from(h).join(subpath))
        .unwrap_or_else(|_| PathBuf::from("/tmp/payplan"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DaemonConfig::default();
        assert_eq!(config.refresh.poll_interval_secs, 30);
        assert_eq!(config.refresh.event_buffer, 1000);
        assert_eq!(config.refresh.earnings_retention_days, 35);
        assert_eq!(config.logging.level, "info");
        assert!(config.storage.data_dir.is_empty());
    }

    #[test]
    fn test_partial_file() {
        let config = DaemonConfig::parse(
            "[refresh]\npoll_interval_secs = 5\n\n[storage]\ndata_dir = \"/var/lib/payplan\"\n",
        )
        .expect("parse");
        assert_eq!(config.refresh.poll_interval_secs, 5);
        assert_eq!(config.refresh.event_buffer, 1000);
        assert_eq!(config.data_dir(), PathBuf::from("/var/lib/payplan"));
    }

    #[test]
    fn test_poll_interval_floor() {
        let refresh = RefreshConfig {
            poll_interval_secs: 0,
            ..RefreshConfig::default()
        };
        assert_eq!(refresh.poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_config_serialization() {
        let config = DaemonConfig::default();
        let toml_str = toml::to_string(&config).expect("serialize");
        let _parsed: DaemonConfig = toml::from_str(&toml_str).expect("parse");
    }
}
