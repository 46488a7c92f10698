//! Shared plumbing for dressday: configuration, errors, time and logging.

pub mod clock;
pub mod config;
pub mod error;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    CacheConfig, Config, ConfigIssue, ConfigReport, LlmConfig, TemperatureUnit, WeatherConfig,
};
pub use error::{AppError, ConfigError, HttpErrorExt, NetworkError, ValidationError};

use anyhow::Result;

/// Install the stderr tracing subscriber. `RUST_LOG` overrides the `info` default.
pub fn init() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("logging already initialized: {e}"))?;

    tracing::debug!("logging initialized");
    Ok(())
}
