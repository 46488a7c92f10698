//! Rule engine behavior across profiles and weather.

use std::collections::BTreeSet;

use dressday_outfit::keywords::{is_coat_class, is_rain_class};
use dressday_outfit::{
    classify, extract_recommendations, Age, Category, ExtremeWeather, Gender, Profile,
    PromptAnalysis, RuleEngine,
};
use dressday_weather::WeatherSnapshot;

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

fn all_profiles() -> Vec<Profile> {
    let mut profiles = Vec::new();
    for age in [Age::Four, Age::Seven, Age::Ten] {
        for gender in [Gender::Girl, Gender::Boy] {
            profiles.push(Profile::new(format!("{}-{:?}", age.years(), gender), age, gender));
        }
    }
    profiles
}

#[test]
fn test_cold_rain_scenario() {
    let profile = Profile::new("girl-4", Age::Four, Gender::Girl);
    let set = RuleEngine::new().recommend(&snapshot(35.0, "Rain", 80.0, 12.0, 2.0), &profile);

    assert!(set.outerwear.iter().any(|i| is_rain_class(&i.item)));
    assert_eq!(set.names(Category::Footwear), vec!["Rain boots"]);
    assert!(set.contains(Category::Accessories, "Umbrella"));
}

#[test]
fn test_extreme_weather_ignores_profile() {
    let cases = [
        (snapshot(105.0, "Clear", 0.0, 5.0, 0.0), ExtremeWeather::ExtremeHeat),
        (snapshot(-10.0, "Clear", 0.0, 5.0, 0.0), ExtremeWeather::ExtremeCold),
        (snapshot(60.0, "Cloudy", 0.0, 50.0, 0.0), ExtremeWeather::HighWinds),
        (snapshot(70.0, "Thunderstorm", 90.0, 10.0, 0.0), ExtremeWeather::SevereStorm),
    ];
    let engine = RuleEngine::new();

    for (weather, expected) in cases {
        assert_eq!(classify(&weather), Some(expected));
        for profile in all_profiles() {
            let outcome = engine.evaluate(&weather, &profile, &PromptAnalysis::default());
            assert_eq!(outcome.recommendations, expected.safety_set());
            assert_eq!(outcome.spoken_response, expected.message());
        }
    }
}

#[test]
fn test_outerwear_heavier_when_colder() {
    let engine = RuleEngine::new();
    for profile in all_profiles() {
        let cold = engine.recommend(&snapshot(30.0, "Cloudy", 10.0, 5.0, 1.0), &profile);
        let warm = engine.recommend(&snapshot(80.0, "Cloudy", 10.0, 5.0, 1.0), &profile);

        assert!(!cold.outerwear.is_empty(), "{}", profile.id);
        assert!(cold.outerwear.iter().any(|i| is_coat_class(&i.item)), "{}", profile.id);
        assert!(!warm.outerwear.iter().any(|i| is_coat_class(&i.item)), "{}", profile.id);
    }
}

#[test]
fn test_identical_inputs_identical_output() {
    let engine = RuleEngine::new();
    let weather = snapshot(48.0, "Sunny", 45.0, 22.0, 7.0);
    for profile in all_profiles() {
        let a = serde_json::to_string(&engine.recommend(&weather, &profile)).unwrap();
        let b = serde_json::to_string(&engine.recommend(&weather, &profile)).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn test_every_category_serialized() {
    let set = RuleEngine::new().recommend(
        &snapshot(80.0, "Clear", 0.0, 0.0, 0.0),
        &Profile::new("p", Age::Ten, Gender::Boy),
    );
    let json = serde_json::to_value(&set).unwrap();
    for key in ["baseLayers", "outerwear", "bottoms", "accessories", "footwear", "specialNotes"] {
        assert!(json[key].is_array(), "{key}");
    }
    assert_eq!(json["outerwear"], serde_json::json!([]));
}

#[test]
fn test_labeled_markdown_extraction() {
    let set = extract_recommendations("Outerwear: **Warm coat**, *windbreaker*");
    assert_eq!(set.names(Category::Outerwear), vec!["Warm coat", "windbreaker"]);
}
