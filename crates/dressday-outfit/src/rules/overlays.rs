//! Weather overlays applied on top of the temperature band.
//!
//! Overlays append; the one exception is rain footwear, which replaces
//! whatever the band chose.

use dressday_weather::WeatherSnapshot;

use crate::recommendation::{Category, ClothingItem, RecommendationSet};

pub const RAIN_LIKELY_ABOVE_PCT: f64 = 50.0;
pub const STRONG_WIND_ABOVE_MPH: f64 = 30.0;
pub const BREEZY_ABOVE_MPH: f64 = 15.0;
pub const BREEZY_WARM_ABOVE_F: f64 = 70.0;
pub const HIGH_UV_ABOVE: f64 = 6.0;
pub const MODERATE_UV_ABOVE: f64 = 3.0;

pub const STRONG_WIND_NOTE: &str = "It's very windy, so zip up your jacket.";
pub const BREEZY_NOTE: &str = "It's a little breezy, but still warm.";

pub fn is_rainy(snapshot: &WeatherSnapshot) -> bool {
    snapshot.precipitation_probability > RAIN_LIKELY_ABOVE_PCT
        || snapshot.conditions_lower().contains("rain")
}

pub fn apply_precipitation(set: &mut RecommendationSet, snapshot: &WeatherSnapshot) {
    if !is_rainy(snapshot) {
        return;
    }
    set.add(
        Category::Outerwear,
        ClothingItem::with_reason("Raincoat", "keeps you dry"),
    );
    set.add(
        Category::Accessories,
        ClothingItem::with_reason("Umbrella", "for the rain"),
    );
    set.replace(
        Category::Footwear,
        vec![ClothingItem::with_reason("Rain boots", "splash in puddles with dry feet")],
    );
}

pub fn apply_wind(set: &mut RecommendationSet, snapshot: &WeatherSnapshot) {
    if snapshot.wind_speed > STRONG_WIND_ABOVE_MPH {
        set.add(
            Category::Outerwear,
            ClothingItem::with_reason("Wind-resistant jacket", "blocks the wind"),
        );
        set.add_note(STRONG_WIND_NOTE);
    } else if snapshot.wind_speed > BREEZY_ABOVE_MPH && snapshot.temperature > BREEZY_WARM_ABOVE_F {
        set.add_note(BREEZY_NOTE);
    }
}

pub fn apply_uv(set: &mut RecommendationSet, snapshot: &WeatherSnapshot) {
    let uv = snapshot.uv_index;
    if uv > HIGH_UV_ABOVE {
        set.add(
            Category::Accessories,
            ClothingItem::with_reason("Sunglasses", "protects your eyes"),
        );
        set.add(
            Category::Accessories,
            ClothingItem::with_reason("Sun hat with a brim", "shades your face"),
        );
        set.add(
            Category::Accessories,
            ClothingItem::with_reason("Sunscreen", "protects your skin"),
        );
        set.add_note(format!("The UV index is {uv} today, so protect your skin and eyes."));
    } else if uv > MODERATE_UV_ABOVE {
        set.add(
            Category::Accessories,
            ClothingItem::with_reason("Sunscreen", "protects your skin"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            temperature: 65.0,
            feels_like: 65.0,
            conditions: "Clear".into(),
            precipitation_probability: 0.0,
            wind_speed: 0.0,
            uv_index: 0.0,
            humidity: None,
            missing_fields: BTreeSet::new(),
        }
    }

    #[test]
    fn test_rain_replaces_footwear() {
        let mut set = RecommendationSet::default();
        set.add(Category::Footwear, "Sneakers");
        let mut weather = snapshot();
        weather.precipitation_probability = 51.0;

        apply_precipitation(&mut set, &weather);

        assert_eq!(set.names(Category::Footwear), vec!["Rain boots"]);
        assert!(set.contains(Category::Outerwear, "Raincoat"));
        assert!(set.contains(Category::Accessories, "Umbrella"));
    }

    #[test]
    fn test_rain_threshold_and_conditions_text() {
        let mut weather = snapshot();
        weather.precipitation_probability = 50.0;
        assert!(!is_rainy(&weather));

        weather.conditions = "Light Rain".into();
        assert!(is_rainy(&weather));
    }

    #[test]
    fn test_strong_wind_adds_jacket_and_note() {
        let mut set = RecommendationSet::default();
        let mut weather = snapshot();
        weather.wind_speed = 31.0;

        apply_wind(&mut set, &weather);

        assert!(set.contains(Category::Outerwear, "Wind-resistant jacket"));
        assert_eq!(set.special_notes, vec![STRONG_WIND_NOTE.to_string()]);
    }

    #[test]
    fn test_breezy_warm_is_note_only() {
        let mut set = RecommendationSet::default();
        let mut weather = snapshot();
        weather.wind_speed = 20.0;
        weather.temperature = 72.0;

        apply_wind(&mut set, &weather);
        assert!(set.is_empty());
        assert_eq!(set.special_notes, vec![BREEZY_NOTE.to_string()]);

        let mut cool = RecommendationSet::default();
        weather.temperature = 70.0;
        apply_wind(&mut cool, &weather);
        assert!(cool.special_notes.is_empty());
    }

    #[test]
    fn test_high_uv_cites_index() {
        let mut set = RecommendationSet::default();
        let mut weather = snapshot();
        weather.uv_index = 8.5;

        apply_uv(&mut set, &weather);

        assert_eq!(set.accessories.len(), 3);
        assert!(set.special_notes[0].contains("8.5"));
    }

    #[test]
    fn test_moderate_uv_sunscreen_only() {
        let mut set = RecommendationSet::default();
        let mut weather = snapshot();
        weather.uv_index = 6.0;

        apply_uv(&mut set, &weather);

        assert_eq!(set.names(Category::Accessories), vec!["Sunscreen"]);
        assert!(set.special_notes.is_empty());

        let mut low = RecommendationSet::default();
        weather.uv_index = 3.0;
        apply_uv(&mut low, &weather);
        assert!(low.is_empty());
    }
}
