//! Reconciles signals the band and overlay steps can't see together.
//!
//! Every rule here is idempotent: running it twice changes nothing.

use dressday_weather::WeatherSnapshot;

use crate::recommendation::{Category, ClothingItem, RecommendationSet};

pub const SUNNY_RAIN_PCT: f64 = 40.0;
pub const WARM_WINDY_MIN_F: f64 = 75.0;
pub const WARM_WINDY_ABOVE_MPH: f64 = 20.0;
pub const COLD_SUN_BELOW_F: f64 = 50.0;
pub const COLD_SUN_UV_ABOVE: f64 = 5.0;

pub const SUNNY_RAIN_NOTE: &str = "It's sunny now, but rain may come later. Bring an umbrella just in case.";
pub const WARM_WINDY_NOTE: &str = "It's warm but windy, so a light layer might feel nice.";
pub const COLD_SUN_NOTE: &str = "It's chilly but the sun is strong, so wear sunglasses.";

fn looks_sunny(snapshot: &WeatherSnapshot) -> bool {
    let conditions = snapshot.conditions_lower();
    conditions.contains("sun") || conditions.contains("clear")
}

pub fn resolve(set: &mut RecommendationSet, snapshot: &WeatherSnapshot) {
    if looks_sunny(snapshot) && snapshot.precipitation_probability >= SUNNY_RAIN_PCT {
        set.add(
            Category::Accessories,
            ClothingItem::with_reason("Umbrella", "in case it rains later"),
        );
        set.add_note(SUNNY_RAIN_NOTE);
    }

    if snapshot.temperature >= WARM_WINDY_MIN_F && snapshot.wind_speed > WARM_WINDY_ABOVE_MPH {
        set.add_note(WARM_WINDY_NOTE);
    }

    if snapshot.temperature < COLD_SUN_BELOW_F && snapshot.uv_index > COLD_SUN_UV_ABOVE {
        set.add(
            Category::Accessories,
            ClothingItem::with_reason("Sunglasses", "the sun is bright"),
        );
        set.add_note(COLD_SUN_NOTE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn snapshot(temperature: f64, conditions: &str, precip: f64, wind: f64, uv: f64) -> WeatherSnapshot {
        WeatherSnapshot {
            temperature,
            feels_like: temperature,
            conditions: conditions.into(),
            precipitation_probability: precip,
            wind_speed: wind,
            uv_index: uv,
            humidity: None,
            missing_fields: BTreeSet::new(),
        }
    }

    #[test]
    fn test_sunny_but_rain_likely() {
        let mut set = RecommendationSet::default();
        resolve(&mut set, &snapshot(68.0, "Mostly Clear", 45.0, 0.0, 0.0));
        assert!(set.contains(Category::Accessories, "Umbrella"));
        assert_eq!(set.special_notes, vec![SUNNY_RAIN_NOTE.to_string()]);
    }

    #[test]
    fn test_umbrella_not_duplicated() {
        let mut set = RecommendationSet::default();
        set.add(Category::Accessories, "Umbrella");
        resolve(&mut set, &snapshot(68.0, "Sunny", 60.0, 0.0, 0.0));
        assert_eq!(set.accessories.len(), 1);
    }

    #[test]
    fn test_warm_windy_note_only() {
        let mut set = RecommendationSet::default();
        resolve(&mut set, &snapshot(80.0, "Cloudy", 0.0, 25.0, 0.0));
        assert!(set.is_empty());
        assert_eq!(set.special_notes, vec![WARM_WINDY_NOTE.to_string()]);
    }

    #[test]
    fn test_cold_high_uv_adds_sunglasses() {
        let mut set = RecommendationSet::default();
        resolve(&mut set, &snapshot(35.0, "Snow", 0.0, 0.0, 6.0));
        assert!(set.contains(Category::Accessories, "Sunglasses"));
        assert_eq!(set.special_notes, vec![COLD_SUN_NOTE.to_string()]);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let weather = snapshot(40.0, "Clear", 50.0, 25.0, 7.0);
        let mut once = RecommendationSet::default();
        resolve(&mut once, &weather);
        let mut twice = once.clone();
        resolve(&mut twice, &weather);
        assert_eq!(once, twice);
    }
}
