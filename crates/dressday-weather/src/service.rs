//! Current-weather lookup with cache fallback.
//!
//! Order of preference:
//! 1. a fresh cache entry,
//! 2. a new upstream fetch (normalized and written through to the cache),
//! 3. the cached entry even though it is stale, flagged `is_stale`,
//! 4. the upstream error, when nothing was ever cached for the location.

use std::sync::Arc;
use std::time::Duration;

use dressday_core::{Clock, NetworkError};

use crate::cache::{CacheEntry, WeatherCache};
use crate::normalize::normalize;
use crate::provider::WeatherProvider;
use crate::types::{Location, WeatherError, WeatherReport};

pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
    cache: Arc<WeatherCache>,
    clock: Arc<dyn Clock>,
    fetch_timeout: Duration,
}

impl WeatherService {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        cache: Arc<WeatherCache>,
        clock: Arc<dyn Clock>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            cache,
            clock,
            fetch_timeout,
        }
    }

    pub fn cache(&self) -> &Arc<WeatherCache> {
        &self.cache
    }

    pub async fn get_current_weather(&self, lat: f64, lon: f64) -> Result<WeatherReport, WeatherError> {
        if let Some(entry) = self.cache.get(lat, lon) {
            if self.cache.is_fresh(&entry) {
                return Ok(report(entry, false, true));
            }
        }

        self.fetch_with_fallback(lat, lon).await
    }

    /// Skip the fresh-cache shortcut and go upstream, still falling back to a stale entry.
    pub async fn refresh(&self, lat: f64, lon: f64) -> Result<WeatherReport, WeatherError> {
        self.fetch_with_fallback(lat, lon).await
    }

    async fn fetch_with_fallback(&self, lat: f64, lon: f64) -> Result<WeatherReport, WeatherError> {
        match self.fetch_upstream(lat, lon).await {
            Ok(report) => Ok(report),
            Err(e) => match self.cache.get(lat, lon) {
                Some(entry) => {
                    let stale = !self.cache.is_fresh(&entry);
                    tracing::warn!(
                        "Weather fetch failed ({}), serving cached data from {}",
                        e,
                        entry.fetched_at
                    );
                    Ok(report(entry, stale, true))
                }
                None => {
                    tracing::warn!("Weather fetch failed with nothing cached: {}", e);
                    Err(e)
                }
            },
        }
    }

    async fn fetch_upstream(&self, lat: f64, lon: f64) -> Result<WeatherReport, WeatherError> {
        let location = Location::new(lat, lon);
        let raw = tokio::time::timeout(self.fetch_timeout, self.provider.fetch_current(&location))
            .await
            .map_err(|_| WeatherError::Network(NetworkError::Timeout))??;

        let snapshot = normalize(&raw)?;
        let entry = self.cache.set(lat, lon, snapshot);
        tracing::info!(
            key = %entry.key,
            temperature = entry.data.temperature,
            "Fetched current weather at {}",
            self.clock.now()
        );
        Ok(report(entry, false, false))
    }
}

fn report(entry: CacheEntry, is_stale: bool, from_cache: bool) -> WeatherReport {
    WeatherReport {
        snapshot: entry.data,
        fetched_at: entry.fetched_at,
        cache_expiry: entry.cache_expiry,
        is_stale,
        from_cache,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawWeather;
    use async_trait::async_trait;
    use chrono::Duration as ChronoDuration;
    use dressday_core::ManualClock;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct ScriptedProvider {
        responses: Mutex<Vec<Result<RawWeather, WeatherError>>>,
        calls: AtomicU32,
    }

    impl ScriptedProvider {
        fn new(responses: Vec<Result<RawWeather, WeatherError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl WeatherProvider for ScriptedProvider {
        async fn fetch_current(&self, _location: &Location) -> Result<RawWeather, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut responses = self.responses.lock();
            if responses.is_empty() {
                return Err(WeatherError::Network(NetworkError::Unreachable("no script".into())));
            }
            responses.remove(0)
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl WeatherProvider for SlowProvider {
        async fn fetch_current(&self, _location: &Location) -> Result<RawWeather, WeatherError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(raw(70.0))
        }
    }

    fn raw(temperature: f64) -> RawWeather {
        RawWeather {
            temperature: Some(temperature),
            apparent_temperature: Some(temperature),
            weather_code: Some(0),
            precipitation_probability: Some(0.0),
            wind_speed: Some(4.0),
            uv_index: Some(1.0),
            ..RawWeather::default()
        }
    }

    fn down() -> Result<RawWeather, WeatherError> {
        Err(WeatherError::Network(NetworkError::HttpStatus {
            status: 503,
            message: "down".into(),
        }))
    }

    fn service(
        provider: Arc<dyn WeatherProvider>,
    ) -> (WeatherService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let cache = Arc::new(WeatherCache::new(ChronoDuration::hours(1), 10, clock.clone()));
        (
            WeatherService::new(provider, cache, clock.clone(), Duration::from_secs(5)),
            clock,
        )
    }

    #[tokio::test]
    async fn test_fresh_cache_skips_upstream() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(raw(60.0))]));
        let (service, clock) = service(provider.clone());

        let first = service.get_current_weather(42.36, -71.06).await.unwrap();
        assert!(!first.from_cache);

        clock.advance(ChronoDuration::minutes(30));
        let second = service.get_current_weather(42.36, -71.06).await.unwrap();
        assert!(second.from_cache);
        assert!(!second.is_stale);
        assert_eq!(second.snapshot.temperature, 60.0);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_cache_refetches() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(raw(60.0)), Ok(raw(64.0))]));
        let (service, clock) = service(provider.clone());

        service.get_current_weather(1.0, 1.0).await.unwrap();
        clock.advance(ChronoDuration::minutes(61));
        let report = service.get_current_weather(1.0, 1.0).await.unwrap();

        assert_eq!(report.snapshot.temperature, 64.0);
        assert!(!report.from_cache);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_stale_fallback_on_upstream_failure() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(raw(55.0)), down()]));
        let (service, clock) = service(provider);

        service.get_current_weather(1.0, 1.0).await.unwrap();
        clock.advance(ChronoDuration::hours(3));

        let report = service.get_current_weather(1.0, 1.0).await.unwrap();
        assert!(report.is_stale);
        assert!(report.from_cache);
        assert_eq!(report.snapshot.temperature, 55.0);
    }

    #[tokio::test]
    async fn test_failure_without_cache_propagates() {
        let provider = Arc::new(ScriptedProvider::new(vec![down()]));
        let (service, _) = service(provider);

        let err = service.get_current_weather(1.0, 1.0).await.unwrap_err();
        assert!(matches!(err, WeatherError::Network(NetworkError::HttpStatus { status: 503, .. })));
    }

    #[tokio::test]
    async fn test_unparseable_payload_falls_back_like_any_failure() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(raw(48.0)),
            Ok(RawWeather::default()),
        ]));
        let (service, clock) = service(provider);

        service.get_current_weather(1.0, 1.0).await.unwrap();
        clock.advance(ChronoDuration::hours(2));
        let report = service.get_current_weather(1.0, 1.0).await.unwrap();
        assert!(report.is_stale);
        assert_eq!(report.snapshot.temperature, 48.0);
    }

    #[tokio::test]
    async fn test_refresh_failure_within_ttl_is_not_stale() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(raw(50.0)), down()]));
        let (service, _) = service(provider);

        service.get_current_weather(1.0, 1.0).await.unwrap();
        let report = service.refresh(1.0, 1.0).await.unwrap();
        assert!(report.from_cache);
        assert!(!report.is_stale);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_counts_as_failure() {
        let (service, _) = service(Arc::new(SlowProvider));
        let err = service.get_current_weather(1.0, 1.0).await.unwrap_err();
        assert!(matches!(err, WeatherError::Network(NetworkError::Timeout)));
    }
}
