//! Tracing subscriber setup for applications embedding the client

use std::io::IsTerminal;

use smartpantry_domain::{Result, SmartPantryError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Output format of the fmt layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, ANSI colours when stderr is a terminal
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Build the filter from `RUST_LOG`, falling back to `default_filter`
/// (e.g. `"info,smartpantry_infra=debug"`).
///
/// # Errors
/// Returns `SmartPantryError::Config` if `default_filter` is not a valid
/// directive string.
pub fn env_filter(default_filter: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_filter).map_err(|e| {
            SmartPantryError::Config(format!("Invalid log filter '{}': {}", default_filter, e))
        }),
    }
}

/// Install the global subscriber, writing to stderr.
///
/// # Errors
/// Returns `SmartPantryError::Config` if the filter is invalid or a global
/// subscriber is already installed.
pub fn init_logging(default_filter: &str, format: LogFormat) -> Result<()> {
    let filter = env_filter(default_filter)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match format {
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(std::io::stderr().is_terminal()),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };

    installed.map_err(|e| SmartPantryError::Config(format!("Logging already initialized: {}", e)))
}
