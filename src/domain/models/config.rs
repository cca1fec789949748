//! Configuration models: `evidence.yml` sections and the polling budget.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default number of status polls before giving up.
pub const DEFAULT_MAX_RETRIES: u32 = 30;
/// Default pause between status polls, in milliseconds.
pub const DEFAULT_RETRY_INTERVAL_MS: u64 = 5_000;

/// Top-level evidence configuration (`evidence.yml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EvidenceConfig {
    /// SonarQube integration settings
    #[serde(default)]
    pub sonar: SonarConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Problems met while loading (skipped files), reported once logging is up
    #[serde(skip)]
    pub load_warnings: Vec<String>,
}

/// `sonar:` section. Every field is optional; unset values fall back to
/// the report file, the environment or built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SonarConfig {
    /// Base URL override for the SonarQube server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Explicit path to `report-task.txt`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_task_file: Option<String>,

    /// Number of status polls before giving up
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polling_max_retries: Option<u32>,

    /// Pause between status polls, in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polling_retry_interval_ms: Option<u64>,
}

impl SonarConfig {
    /// No field is set at all.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Configured URL override, ignoring empty strings.
    pub fn url_override(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }

    /// Configured report path, ignoring empty strings.
    pub fn report_task_file(&self) -> Option<&str> {
        self.report_task_file.as_deref().filter(|p| !p.is_empty())
    }

    /// Polling budget with defaults applied.
    pub fn polling(&self) -> PollingConfig {
        PollingConfig::from_overrides(self.polling_max_retries, self.polling_retry_interval_ms)
    }
}

/// Fixed-interval polling budget for Compute Engine tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    /// Polls after the first one before timing out
    pub max_retries: u32,
    /// Pause between polls, in milliseconds
    pub retry_interval_ms: u64,
}

impl PollingConfig {
    /// Budget with explicit values.
    pub fn new(max_retries: u32, retry_interval_ms: u64) -> Self {
        Self {
            max_retries,
            retry_interval_ms,
        }
    }

    /// Apply optional overrides on top of the defaults.
    pub fn from_overrides(max_retries: Option<u32>, retry_interval_ms: Option<u64>) -> Self {
        Self {
            max_retries: max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            retry_interval_ms: retry_interval_ms.unwrap_or(DEFAULT_RETRY_INTERVAL_MS),
        }
    }

    /// Pause between polls.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }

    /// Total wall-clock budget: `max_retries * retry_interval`.
    pub fn timeout(&self) -> Duration {
        self.interval().saturating_mul(self.max_retries)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self::from_overrides(None, None)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling JSON log files; stderr only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    /// File rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}
