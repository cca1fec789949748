//! figment-based loader for `evidence.yml` with environment overrides.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use figment::providers::{Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::EvidenceConfig;

const JFROG_DIR: &str = ".jfrog";
const EVIDENCE_DIR: &str = "evidence";
const CONFIG_FILE_NAMES: [&str; 2] = ["evidence.yml", "evidence.yaml"];

/// Overrides the JFrog home directory (default `~/.jfrog`).
pub const JFROG_HOME_ENV: &str = "JFROG_CLI_HOME_DIR";

/// Server URL override.
pub const SONAR_URL_ENV: &str = "SONAR_URL";
/// Report path override; `SONAR_REPORT_TASK_FILE` is read when unset.
pub const REPORT_TASK_FILE_ENV: &str = "REPORT_TASK_FILE";
/// Secondary report path override.
pub const SONAR_REPORT_TASK_FILE_ENV: &str = "SONAR_REPORT_TASK_FILE";
/// Number of status polls before giving up.
pub const POLLING_MAX_RETRIES_ENV: &str = "POLLING_MAX_RETRIES";
/// Pause between status polls, in milliseconds.
pub const POLLING_RETRY_INTERVAL_MS_ENV: &str = "POLLING_RETRY_INTERVAL_MS";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Polling interval of zero
    #[error("Invalid pollingRetryIntervalMs: {0}. Must be positive")]
    InvalidRetryInterval(u64),

    /// Unknown log level
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Unknown log format
    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    /// Unknown rotation policy
    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    /// Numeric environment override that does not parse
    #[error("Invalid value for {var}: '{value}'. Must be a non-negative integer")]
    InvalidEnvValue {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
    },
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for the current working directory.
    ///
    /// Sources, first match wins:
    /// 1. `.jfrog/evidence/evidence.{yml,yaml}` in the nearest ancestor holding `.jfrog`
    /// 2. `$JFROG_CLI_HOME_DIR/evidence/evidence.{yml,yaml}` (default `~/.jfrog`)
    /// 3. Environment variables only
    ///
    /// Environment variables always override file values.
    pub fn load() -> Result<EvidenceConfig> {
        let cwd = std::env::current_dir().context("Failed to determine working directory")?;
        Self::load_from(&cwd, jfrog_home_dir().as_deref())
    }

    /// Load configuration starting the upstream search at `start_dir`.
    ///
    /// A candidate file that cannot be read or parsed is skipped with a
    /// warning recorded in [`EvidenceConfig::load_warnings`]. An invalid
    /// environment override fails the load.
    pub fn load_from(start_dir: &Path, jfrog_home: Option<&Path>) -> Result<EvidenceConfig> {
        let overrides = env_overrides()?;
        let mut warnings = Vec::new();

        for path in Self::candidate_files(start_dir, jfrog_home) {
            if !path.is_file() {
                continue;
            }
            match Self::extract(Some(&path), &overrides) {
                Ok(mut config) if !config.sonar.is_empty() => {
                    tracing::debug!(path = %path.display(), "loaded evidence config");
                    Self::validate(&config)?;
                    config.load_warnings = warnings;
                    return Ok(config);
                }
                Ok(_) => {}
                Err(err) => {
                    let message = format!("ignoring config file: {err:#}");
                    tracing::warn!(path = %path.display(), "{message}");
                    warnings.push(message);
                }
            }
        }

        let mut config = Self::extract(None, &overrides)?;
        Self::validate(&config)?;
        config.load_warnings = warnings;
        Ok(config)
    }

    /// Load configuration from a specific file, still honoring env overrides.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<EvidenceConfig> {
        let config = Self::extract(Some(path.as_ref()), &env_overrides()?)?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Config files to try, in precedence order.
    pub fn candidate_files(start_dir: &Path, jfrog_home: Option<&Path>) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(root) = start_dir
            .ancestors()
            .find(|dir| dir.join(JFROG_DIR).is_dir())
        {
            let dir = root.join(JFROG_DIR).join(EVIDENCE_DIR);
            candidates.extend(CONFIG_FILE_NAMES.iter().map(|name| dir.join(name)));
        }
        if let Some(home) = jfrog_home {
            let dir = home.join(EVIDENCE_DIR);
            candidates.extend(CONFIG_FILE_NAMES.iter().map(|name| dir.join(name)));
        }
        candidates
    }

    fn extract(path: Option<&Path>, overrides: &Figment) -> Result<EvidenceConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(EvidenceConfig::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(overrides.clone())
            .extract()
            .with_context(|| match path {
                Some(p) => format!("Failed to load config from {}", p.display()),
                None => "Failed to extract configuration from environment".to_string(),
            })
    }

    /// Validate configuration after loading
    pub fn validate(config: &EvidenceConfig) -> Result<(), ConfigError> {
        if let Some(interval) = config.sonar.polling_retry_interval_ms {
            if interval == 0 {
                return Err(ConfigError::InvalidRetryInterval(interval));
            }
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        Ok(())
    }
}

/// JFrog home directory: `$JFROG_CLI_HOME_DIR` or `~/.jfrog`.
pub fn jfrog_home_dir() -> Option<PathBuf> {
    match std::env::var(JFROG_HOME_ENV) {
        Ok(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::home_dir().map(|home| home.join(JFROG_DIR)),
    }
}

/// `sonar.*` values taken from the environment, one provider per variable.
fn env_overrides() -> Result<Figment, ConfigError> {
    let mut figment = Figment::new();
    if let Some(url) = env_value(SONAR_URL_ENV) {
        figment = figment.merge(Serialized::default("sonar.url", url));
    }
    if let Some(path) =
        env_value(REPORT_TASK_FILE_ENV).or_else(|| env_value(SONAR_REPORT_TASK_FILE_ENV))
    {
        figment = figment.merge(Serialized::default("sonar.reportTaskFile", path));
    }
    if let Some(retries) = env_number::<u32>(POLLING_MAX_RETRIES_ENV)? {
        figment = figment.merge(Serialized::default("sonar.pollingMaxRetries", retries));
    }
    if let Some(interval) = env_number::<u64>(POLLING_RETRY_INTERVAL_MS_ENV)? {
        figment = figment.merge(Serialized::default("sonar.pollingRetryIntervalMs", interval));
    }
    Ok(figment)
}

fn env_value(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_number<T: FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    let Some(value) = env_value(var) else {
        return Ok(None);
    };
    match value.parse() {
        Ok(number) => Ok(Some(number)),
        Err(_) => Err(ConfigError::InvalidEnvValue { var, value }),
    }
}
