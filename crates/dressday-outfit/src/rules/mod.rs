//! Deterministic rule engine.
//!
//! Extreme weather is checked first and replaces everything. Otherwise the
//! temperature band sets the base outfit, the precipitation, wind and UV
//! overlays are layered on top, and the conflict resolver runs last.

pub mod bands;
pub mod conflicts;
pub mod extreme;
pub mod overlays;
pub mod wording;

use dressday_weather::WeatherSnapshot;
use serde::Serialize;

use crate::profile::Profile;
use crate::prompt::PromptAnalysis;
use crate::recommendation::RecommendationSet;

pub use bands::TemperatureBand;
pub use extreme::{classify, ExtremeWeather};

/// Rule engine output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleOutcome {
    pub recommendations: RecommendationSet,
    pub spoken_response: String,
    pub extreme: Option<ExtremeWeather>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEngine;

impl RuleEngine {
    pub fn new() -> Self {
        Self
    }

    /// Recommendation set for a snapshot and profile. Pure and deterministic.
    pub fn recommend(&self, snapshot: &WeatherSnapshot, profile: &Profile) -> RecommendationSet {
        if let Some(extreme) = classify(snapshot) {
            return extreme.safety_set();
        }

        let band = TemperatureBand::for_temperature(snapshot.temperature);
        let mut set = bands::base_outfit(band, profile);
        overlays::apply_precipitation(&mut set, snapshot);
        overlays::apply_wind(&mut set, snapshot);
        overlays::apply_uv(&mut set, snapshot);
        conflicts::resolve(&mut set, snapshot);
        set
    }

    /// Recommendations plus spoken wording for the profile and question.
    pub fn evaluate(
        &self,
        snapshot: &WeatherSnapshot,
        profile: &Profile,
        analysis: &PromptAnalysis,
    ) -> RuleOutcome {
        if let Some(extreme) = classify(snapshot) {
            tracing::info!(?extreme, temperature = snapshot.temperature, "Extreme weather override");
            return RuleOutcome {
                recommendations: extreme.safety_set(),
                spoken_response: extreme.message().to_string(),
                extreme: Some(extreme),
            };
        }

        let recommendations = self.recommend(snapshot, profile);
        let spoken_response = wording::spoken_response(&recommendations, snapshot, profile, analysis);
        tracing::debug!(
            items = recommendations.item_count(),
            notes = recommendations.special_notes.len(),
            "Rule engine produced recommendations"
        );

        RuleOutcome {
            recommendations,
            spoken_response,
            extreme: None,
        }
    }
}
