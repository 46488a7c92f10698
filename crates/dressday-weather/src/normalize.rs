//! Raw upstream payload → canonical [`WeatherSnapshot`].

use std::collections::BTreeSet;

use crate::types::{
    wmo_conditions, RawTemperatureUnit, RawWeather, WeatherError, WeatherField, WeatherSnapshot,
    WindUnit,
};

fn to_fahrenheit(value: f64, unit: RawTemperatureUnit) -> f64 {
    match unit {
        RawTemperatureUnit::Fahrenheit => value,
        RawTemperatureUnit::Celsius => value * 9.0 / 5.0 + 32.0,
    }
}

fn to_mph(value: f64, unit: WindUnit) -> f64 {
    match unit {
        WindUnit::MilesPerHour => value,
        WindUnit::KilometersPerHour => value / 1.609_344,
        WindUnit::MetersPerSecond => value * 2.236_936,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Normalize a raw provider payload.
///
/// Temperature is mandatory; everything else is defaulted and recorded in
/// `missing_fields` so the confidence scorer can see it.
pub fn normalize(raw: &RawWeather) -> Result<WeatherSnapshot, WeatherError> {
    let mut missing = BTreeSet::new();

    let temperature = finite(raw.temperature)
        .map(|t| round1(to_fahrenheit(t, raw.temperature_unit)))
        .ok_or_else(|| WeatherError::Parse("upstream payload has no temperature".into()))?;

    let feels_like = match finite(raw.apparent_temperature) {
        Some(t) => round1(to_fahrenheit(t, raw.temperature_unit)),
        None => {
            missing.insert(WeatherField::FeelsLike);
            temperature
        }
    };

    let conditions = match (raw.description.as_deref().map(str::trim), raw.weather_code) {
        (Some(text), _) if !text.is_empty() => text.to_string(),
        (_, Some(code)) => wmo_conditions(code).to_string(),
        _ => {
            missing.insert(WeatherField::Conditions);
            "Unknown".to_string()
        }
    };

    let precipitation_probability = match finite(raw.precipitation_probability) {
        Some(p) => round1(p.clamp(0.0, 100.0)),
        None => {
            missing.insert(WeatherField::PrecipitationProbability);
            0.0
        }
    };

    let wind_speed = match finite(raw.wind_speed) {
        Some(w) => round1(to_mph(w, raw.wind_unit).max(0.0)),
        None => {
            missing.insert(WeatherField::WindSpeed);
            0.0
        }
    };

    let uv_index = match finite(raw.uv_index) {
        Some(uv) => round1(uv.max(0.0)),
        None => {
            missing.insert(WeatherField::UvIndex);
            0.0
        }
    };

    let snapshot = WeatherSnapshot {
        temperature,
        feels_like,
        conditions,
        precipitation_probability,
        wind_speed,
        uv_index,
        humidity: finite(raw.humidity).map(|h| round1(h.clamp(0.0, 100.0))),
        missing_fields: missing,
    };

    snapshot.check_invariants()?;

    if !snapshot.missing_fields.is_empty() {
        tracing::debug!(missing = ?snapshot.missing_fields, "Normalized snapshot with defaulted fields");
    }

    Ok(snapshot)
}
