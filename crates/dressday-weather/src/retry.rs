//! Exponential backoff for upstream weather calls.
//!
//! Only errors whose `is_retryable()` is true get another attempt. A 4xx or an
//! unparseable payload returns at once so the service can fall back to its
//! stale cache.

use std::future::Future;
use std::time::Duration;

use crate::types::WeatherError;

const DEFAULT_RETRIES: u32 = 1;
const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(200);
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Extra attempts after the first
    pub retries: u32,
    /// Wait before the first retry; doubles for each one after
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl RetryConfig {
    pub fn new(retries: u32, base_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            retries,
            base_delay: Duration::from_millis(base_delay_ms),
            max_delay: Duration::from_millis(max_delay_ms),
        }
    }

    /// A single attempt
    pub fn none() -> Self {
        Self::new(0, 0, 0)
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Wait before retry `n` (0 is the first retry), capped at `max_delay`.
    pub fn backoff(&self, n: u32) -> Duration {
        let doubled = self
            .base_delay
            .checked_mul(2u32.saturating_pow(n))
            .unwrap_or(self.max_delay);
        doubled.min(self.max_delay)
    }
}

/// Run `operation` until it succeeds, fails permanently, or retries run out.
pub async fn with_retry<T, F, Fut>(config: &RetryConfig, mut operation: F) -> Result<T, WeatherError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, WeatherError>>,
{
    let mut retry = 0;
    loop {
        let err = match operation().await {
            Ok(value) => {
                if retry > 0 {
                    tracing::info!("Weather fetch recovered on retry {}", retry);
                }
                return Ok(value);
            }
            Err(err) => err,
        };

        if !err.is_retryable() {
            tracing::debug!("Weather fetch failed permanently: {}", err);
            return Err(err);
        }
        if retry == config.retries {
            if retry > 0 {
                tracing::error!("Weather fetch failed after {} retries: {}", retry, err);
            }
            return Err(err);
        }

        let wait = config.backoff(retry);
        retry += 1;
        tracing::warn!("Weather fetch failed ({}), retry {}/{} in {:?}", err, retry, config.retries, wait);
        tokio::time::sleep(wait).await;
    }
}
