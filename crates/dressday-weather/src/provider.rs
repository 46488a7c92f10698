use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dressday_core::{HttpErrorExt, NetworkError, TemperatureUnit, WeatherConfig};
use reqwest::Client;
use serde::Deserialize;

use crate::retry::{with_retry, RetryConfig};
use crate::types::{Location, RawTemperatureUnit, RawWeather, WeatherError, WindUnit};

const USER_AGENT: &str = "dressday/0.1.0";

const CURRENT_FIELDS: &str = "temperature_2m,apparent_temperature,relative_humidity_2m,weather_code,wind_speed_10m,uv_index,precipitation_probability";

/// Source of current conditions for a location.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn fetch_current(&self, location: &Location) -> Result<RawWeather, WeatherError>;
}

#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    current: Option<OpenMeteoCurrent>,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoCurrent {
    temperature_2m: Option<f64>,
    apparent_temperature: Option<f64>,
    relative_humidity_2m: Option<f64>,
    weather_code: Option<i32>,
    wind_speed_10m: Option<f64>,
    uv_index: Option<f64>,
    precipitation_probability: Option<f64>,
}

/// Open-Meteo current-conditions client (no API key required).
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    client: Arc<Client>,
    base_url: String,
    unit: RawTemperatureUnit,
    retry: RetryConfig,
}

impl OpenMeteoProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| WeatherError::Network(e.to_network_error()))?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            unit: RawTemperatureUnit::Fahrenheit,
            retry: RetryConfig::default(),
        })
    }

    pub fn from_config(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let unit = match config.temperature_unit {
            TemperatureUnit::Celsius => RawTemperatureUnit::Celsius,
            TemperatureUnit::Auto | TemperatureUnit::Fahrenheit => RawTemperatureUnit::Fahrenheit,
        };
        Ok(Self::new(&config.base_url, config.timeout())?
            .with_unit(unit)
            .with_retry(RetryConfig::default().with_retries(config.max_retries)))
    }

    pub fn with_unit(mut self, unit: RawTemperatureUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    async fn fetch_once(&self, location: &Location) -> Result<RawWeather, WeatherError> {
        let unit_param = match self.unit {
            RawTemperatureUnit::Celsius => "celsius",
            RawTemperatureUnit::Fahrenheit => "fahrenheit",
        };
        let url = format!("{}/v1/forecast", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("temperature_unit", unit_param.to_string()),
                ("wind_speed_unit", "mph".to_string()),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::Network(e.to_network_error()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherError::Network(NetworkError::HttpStatus {
                status: status.as_u16(),
                message: body,
            }));
        }

        let body: OpenMeteoResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(format!("Open-Meteo response: {}", e)))?;

        let current = body
            .current
            .ok_or_else(|| WeatherError::Parse("Open-Meteo response has no `current` block".into()))?;

        Ok(RawWeather {
            temperature: current.temperature_2m,
            apparent_temperature: current.apparent_temperature,
            weather_code: current.weather_code,
            description: None,
            precipitation_probability: current.precipitation_probability,
            wind_speed: current.wind_speed_10m,
            uv_index: current.uv_index,
            humidity: current.relative_humidity_2m,
            temperature_unit: self.unit,
            wind_unit: WindUnit::MilesPerHour,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn fetch_current(&self, location: &Location) -> Result<RawWeather, WeatherError> {
        tracing::debug!(
            "Fetching current weather for {:.2},{:.2}",
            location.latitude,
            location.longitude
        );
        with_retry(&self.retry, || self.fetch_once(location)).await
    }
}
