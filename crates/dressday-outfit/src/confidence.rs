//! Confidence scoring.

use dressday_weather::{WeatherField, WeatherSnapshot};

use crate::recommendation::Source;

pub const MIN_CONFIDENCE: f64 = 0.5;
pub const MAX_CONFIDENCE: f64 = 1.0;

pub const LLM_BASE: f64 = 0.95;
pub const RULES_BASE: f64 = 0.85;

const STALE_PENALTY: f64 = 0.2;
const MISSING_TEMPERATURE_PENALTY: f64 = 0.3;
const MISSING_FIELD_PENALTY: f64 = 0.1;

/// Score the input data: 1.0 minus penalties for stale or missing weather,
/// clamped to `[0.5, 1.0]`.
pub fn score_data_quality(snapshot: &WeatherSnapshot, stale: bool) -> f64 {
    let mut score = MAX_CONFIDENCE;
    if stale {
        score -= STALE_PENALTY;
    }
    if snapshot.is_missing(WeatherField::Temperature) {
        score -= MISSING_TEMPERATURE_PENALTY;
    }
    if snapshot.is_missing(WeatherField::PrecipitationProbability) {
        score -= MISSING_FIELD_PENALTY;
    }
    if snapshot.is_missing(WeatherField::WindSpeed) {
        score -= MISSING_FIELD_PENALTY;
    }
    score.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

pub fn source_base(source: Source) -> f64 {
    match source {
        Source::Llm => LLM_BASE,
        Source::Rules => RULES_BASE,
    }
}

/// Final confidence for a non-extreme result
pub fn confidence_for(source: Source, snapshot: &WeatherSnapshot, stale: bool) -> f64 {
    source_base(source)
        .min(score_data_quality(snapshot, stale))
        .clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}
