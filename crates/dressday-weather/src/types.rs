use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use dressday_core::{AppError, NetworkError};
use serde::{Deserialize, Serialize};

/// Lowest and highest temperature (°F) a snapshot may carry.
pub const MIN_TEMPERATURE_F: f64 = -100.0;
pub const MAX_TEMPERATURE_F: f64 = 150.0;

/// Conditions text for a WMO weather interpretation code (Open-Meteo `weather_code`).
///
/// Every precipitation code reads as something the rule keywords recognize
/// ("rain", "snow", "sleet", "thunderstorm"). Codes outside the table read as clear.
pub fn wmo_conditions(code: i32) -> &'static str {
    match code {
        1 | 2 => "Partly Cloudy",
        3 => "Overcast",
        45 | 48 => "Fog",
        51..=55 => "Light Rain",
        56 | 57 | 66 | 67 => "Freezing Rain and Sleet",
        61 | 63 | 80 => "Rain",
        65 | 81 | 82 => "Heavy Rain",
        71..=77 | 85 | 86 => "Snow",
        95..=99 => "Thunderstorm",
        _ => "Clear",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Snapshot fields the normalizer had to default because upstream omitted them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WeatherField {
    Temperature,
    FeelsLike,
    Conditions,
    PrecipitationProbability,
    WindSpeed,
    UvIndex,
}

/// Canonical point-in-time weather reading, in °F and mph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub temperature: f64,
    pub feels_like: f64,
    pub conditions: String,
    /// Percent, 0-100
    pub precipitation_probability: f64,
    pub wind_speed: f64,
    pub uv_index: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub missing_fields: BTreeSet<WeatherField>,
}

impl WeatherSnapshot {
    pub fn is_missing(&self, field: WeatherField) -> bool {
        self.missing_fields.contains(&field)
    }

    /// Lowercased conditions text for keyword matching
    pub fn conditions_lower(&self) -> String {
        self.conditions.to_lowercase()
    }

    /// Check the snapshot invariants (temperature range, percent range, non-negative wind/UV).
    pub fn check_invariants(&self) -> Result<(), WeatherError> {
        if !self.temperature.is_finite()
            || !(MIN_TEMPERATURE_F..=MAX_TEMPERATURE_F).contains(&self.temperature)
        {
            return Err(WeatherError::Parse(format!(
                "temperature {} outside {}..={}°F",
                self.temperature, MIN_TEMPERATURE_F, MAX_TEMPERATURE_F
            )));
        }
        if !(0.0..=100.0).contains(&self.precipitation_probability) {
            return Err(WeatherError::Parse(format!(
                "precipitation probability {} outside 0..=100",
                self.precipitation_probability
            )));
        }
        if self.wind_speed < 0.0 || !self.wind_speed.is_finite() {
            return Err(WeatherError::Parse(format!("wind speed {} is negative", self.wind_speed)));
        }
        if self.uv_index < 0.0 || !self.uv_index.is_finite() {
            return Err(WeatherError::Parse(format!("UV index {} is negative", self.uv_index)));
        }
        Ok(())
    }
}

/// Unit a raw temperature reading is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RawTemperatureUnit {
    Celsius,
    #[default]
    Fahrenheit,
}

/// Unit a raw wind speed is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WindUnit {
    KilometersPerHour,
    #[default]
    MilesPerHour,
    MetersPerSecond,
}

/// Provider-neutral upstream payload, before normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawWeather {
    pub temperature: Option<f64>,
    pub apparent_temperature: Option<f64>,
    pub weather_code: Option<i32>,
    pub description: Option<String>,
    pub precipitation_probability: Option<f64>,
    pub wind_speed: Option<f64>,
    pub uv_index: Option<f64>,
    pub humidity: Option<f64>,
    pub temperature_unit: RawTemperatureUnit,
    pub wind_unit: WindUnit,
}

/// What the weather service hands to the recommendation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub snapshot: WeatherSnapshot,
    pub fetched_at: DateTime<Utc>,
    pub cache_expiry: DateTime<Utc>,
    /// Served from cache after a failed refresh, past its freshness window
    pub is_stale: bool,
    pub from_cache: bool,
}

impl WeatherReport {
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        now < self.cache_expiry
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error(transparent)]
    Network(#[from] NetworkError),
    /// Upstream answered but the payload is unusable.
    #[error("bad weather payload: {0}")]
    Parse(String),
    /// Persisted cache file could not be read or written.
    #[error("weather cache: {0}")]
    Cache(String),
}

impl WeatherError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_retryable(),
            Self::Parse(_) | Self::Cache(_) => false,
        }
    }
}

impl From<WeatherError> for AppError {
    fn from(err: WeatherError) -> Self {
        match err {
            WeatherError::Network(e) => AppError::Network(e),
            other => AppError::WeatherUnavailable(other.to_string()),
        }
    }
}
