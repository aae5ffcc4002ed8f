//! Process configuration read from the environment.
//!
//! A `.env` file in the working directory is loaded first when present;
//! variables already set in the environment take precedence over it.

use crate::access::{AccessPolicy, CapabilityTable};
use std::env;
use thiserror::Error;
use tracing::debug;

/// Connection string variable.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
/// Connection pool size variable.
pub const POOL_SIZE_VAR: &str = "TASKTRACK_POOL_SIZE";
/// JSON capability table variable.
pub const CAPABILITIES_VAR: &str = "TASKTRACK_CAPABILITIES";
/// Log filter directive variable.
pub const LOG_FILTER_VAR: &str = "TASKTRACK_LOG";
/// Log output format variable.
pub const LOG_FORMAT_VAR: &str = "TASKTRACK_LOG_FORMAT";

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/tasktrack";
const DEFAULT_POOL_SIZE: u32 = 8;
const DEFAULT_LOG_FILTER: &str = "tasktrack=info,warn";

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The pool size was not a positive integer.
    #[error("TASKTRACK_POOL_SIZE must be a positive integer, got {0:?}")]
    InvalidPoolSize(String),

    /// The capability table was not valid JSON.
    #[error("TASKTRACK_CAPABILITIES is not a valid capability table: {0}")]
    InvalidCapabilities(#[from] serde_json::Error),

    /// The log format was neither `compact` nor `json`.
    #[error("TASKTRACK_LOG_FORMAT must be `compact` or `json`, got {0:?}")]
    InvalidLogFormat(String),
}

/// Log line rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Single-line human-readable output.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

impl TryFrom<&str> for LogFormat {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidLogFormat(value.to_owned())),
        }
    }
}

/// Resolved application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `PostgreSQL` connection string.
    pub database_url: String,
    /// Maximum pooled connections.
    pub pool_size: u32,
    /// Role capabilities used by the access policy.
    pub capabilities: CapabilityTable,
    /// `tracing` filter directives.
    pub log_filter: String,
    /// Log rendering.
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_owned(),
            pool_size: DEFAULT_POOL_SIZE,
            capabilities: CapabilityTable::default(),
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(err) = dotenv::dotenv() {
            debug!(error = %err, "no .env file loaded");
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads configuration through `lookup`, falling back to defaults for
    /// unset or blank variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let pool_size = read(POOL_SIZE_VAR)
            .map(parse_pool_size)
            .transpose()?
            .unwrap_or(defaults.pool_size);
        let capabilities = read(CAPABILITIES_VAR)
            .map(|raw| serde_json::from_str::<CapabilityTable>(&raw))
            .transpose()?
            .unwrap_or(defaults.capabilities);
        let log_format = read(LOG_FORMAT_VAR)
            .map(|raw| LogFormat::try_from(raw.as_str()))
            .transpose()?
            .unwrap_or(defaults.log_format);

        Ok(Self {
            database_url: read(DATABASE_URL_VAR).unwrap_or(defaults.database_url),
            pool_size,
            capabilities,
            log_filter: read(LOG_FILTER_VAR).unwrap_or(defaults.log_filter),
            log_format,
        })
    }

    /// Builds the access policy described by the capability table.
    #[must_use]
    pub const fn access_policy(&self) -> AccessPolicy {
        AccessPolicy::new(self.capabilities)
    }
}

fn parse_pool_size(raw: String) -> Result<u32, ConfigError> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|size| *size > 0)
        .ok_or(ConfigError::InvalidPoolSize(raw))
}
