//! Extreme-weather detection and the fixed safety responses.
//!
//! These responses never vary by profile and never go through the LLM.

use dressday_weather::WeatherSnapshot;
use serde::{Deserialize, Serialize};

use crate::recommendation::{Category, ClothingItem, RecommendationSet};

pub const EXTREME_COLD_BELOW_F: f64 = 0.0;
pub const EXTREME_HEAT_ABOVE_F: f64 = 100.0;
pub const HIGH_WIND_ABOVE_MPH: f64 = 45.0;

pub const SEVERE_STORM_TERMS: &[&str] = &[
    "thunderstorm",
    "hurricane",
    "tornado",
    "severe",
    "blizzard",
    "ice storm",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtremeWeather {
    ExtremeCold,
    ExtremeHeat,
    HighWinds,
    SevereStorm,
}

/// Classify in priority order: cold, heat, wind, storm text.
pub fn classify(snapshot: &WeatherSnapshot) -> Option<ExtremeWeather> {
    if snapshot.temperature < EXTREME_COLD_BELOW_F {
        return Some(ExtremeWeather::ExtremeCold);
    }
    if snapshot.temperature > EXTREME_HEAT_ABOVE_F {
        return Some(ExtremeWeather::ExtremeHeat);
    }
    if snapshot.wind_speed > HIGH_WIND_ABOVE_MPH {
        return Some(ExtremeWeather::HighWinds);
    }
    let conditions = snapshot.conditions_lower();
    if SEVERE_STORM_TERMS.iter().any(|term| conditions.contains(term)) {
        return Some(ExtremeWeather::SevereStorm);
    }
    None
}

impl ExtremeWeather {
    /// Spoken safety message
    pub fn message(self) -> &'static str {
        match self {
            ExtremeWeather::ExtremeCold => {
                "It's dangerously cold outside. Stay indoors if you can, and only go out for a short time with a grown-up, bundled up from head to toe."
            }
            ExtremeWeather::ExtremeHeat => {
                "It's dangerously hot outside. Stay somewhere cool, drink lots of water, and only play outside for a short time with a grown-up."
            }
            ExtremeWeather::HighWinds => {
                "The wind is very strong today. Stay indoors with a grown-up and keep away from trees and windows."
            }
            ExtremeWeather::SevereStorm => {
                "There's a big storm today. Stay inside with a grown-up until it's over."
            }
        }
    }

    /// The fixed safety set for this class
    pub fn safety_set(self) -> RecommendationSet {
        let mut set = RecommendationSet::default();
        let mut put = |category: Category, item: &str, reason: &str| {
            set.add(category, ClothingItem::with_reason(item, reason));
        };

        match self {
            ExtremeWeather::ExtremeCold => {
                put(Category::BaseLayers, "Thermal base layer", "traps body heat");
                put(Category::BaseLayers, "Warm fleece top", "an extra warm layer");
                put(Category::Outerwear, "Insulated winter coat", "blocks dangerous cold");
                put(Category::Bottoms, "Insulated snow pants", "keeps legs warm");
                put(Category::Accessories, "Warm hat that covers the ears", "prevents frostbite");
                put(Category::Accessories, "Insulated mittens", "keeps fingers warm");
                put(Category::Accessories, "Scarf or face covering", "protects the face");
                put(Category::Footwear, "Insulated waterproof boots", "keeps toes warm and dry");
            }
            ExtremeWeather::ExtremeHeat => {
                put(Category::BaseLayers, "Loose, light-colored shirt", "stays cool");
                put(Category::Bottoms, "Lightweight shorts", "lets skin breathe");
                put(Category::Accessories, "Wide-brimmed sun hat", "shades the face");
                put(Category::Accessories, "Sunscreen", "protects skin");
                put(Category::Accessories, "Water bottle", "stay hydrated");
                put(Category::Footwear, "Breathable sandals", "keeps feet cool");
            }
            ExtremeWeather::HighWinds => {
                put(Category::BaseLayers, "Long-sleeve shirt", "covers arms");
                put(Category::Outerwear, "Wind-resistant jacket", "blocks the wind");
                put(Category::Bottoms, "Long pants", "covers legs");
                put(Category::Footwear, "Sturdy closed-toe shoes", "steady footing");
            }
            ExtremeWeather::SevereStorm => {
                put(Category::BaseLayers, "Comfortable indoor clothes", "stay inside");
                put(Category::Outerwear, "Raincoat", "only if you must go out");
                put(Category::Footwear, "Rain boots", "only if you must go out");
            }
        }

        set.add_note(self.message());
        set
    }
}
