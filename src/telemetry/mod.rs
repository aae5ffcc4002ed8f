//! Global `tracing` subscriber setup.

use crate::config::{AppConfig, LogFormat};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*, util::TryInitError};

/// Failure to install the global subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The filter directives did not parse.
    #[error("invalid log filter {directives:?}: {source}")]
    InvalidFilter {
        /// Rejected directives.
        directives: String,
        /// Parser error.
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    /// A global subscriber was already installed.
    #[error(transparent)]
    AlreadyInstalled(#[from] TryInitError),
}

/// Builds the event filter from configured directives.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] for malformed directives.
pub fn build_filter(directives: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(directives).map_err(|source| TelemetryError::InvalidFilter {
        directives: directives.to_owned(),
        source,
    })
}

/// Installs a registry subscriber with the configured filter and format.
///
/// # Errors
///
/// Returns [`TelemetryError`] for malformed directives or when a global
/// subscriber is already set.
pub fn init_tracing(config: &AppConfig) -> Result<(), TelemetryError> {
    let filter = build_filter(&config.log_filter)?;
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_ansi(false))
            .try_init()?,
        LogFormat::Compact => registry.with(fmt::layer().compact()).try_init()?,
    }
    Ok(())
}
