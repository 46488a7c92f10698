//! Spoken responses for rule-engine output, worded per complexity level.

use dressday_weather::WeatherSnapshot;

use crate::profile::{ComplexityLevel, Profile};
use crate::prompt::PromptAnalysis;
use crate::recommendation::{Category, RecommendationSet};
use crate::rules::bands::TemperatureBand;

/// Feels-like is only mentioned when it is at least this far from the reading.
pub const FEELS_LIKE_MENTION_F: f64 = 5.0;

fn lower_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// "a", "a and b", "a, b and c"
fn join_list(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [one] => one.clone(),
        [head @ .., last] => format!("{} and {}", head.join(", "), last),
    }
}

fn with_article(word: &str) -> String {
    if word.ends_with('s') {
        word.to_string()
    } else if word.starts_with(['a', 'e', 'i', 'o', 'u']) {
        format!("an {word}")
    } else {
        format!("a {word}")
    }
}

/// First item of each category, in the order they should be spoken
fn lead_items(set: &RecommendationSet, order: &[Category], limit: usize) -> Vec<String> {
    order
        .iter()
        .filter_map(|c| set.items(*c).first())
        .map(|i| i.item.to_lowercase())
        .take(limit)
        .collect()
}

/// "Yes, bring your umbrella." when the prompt asked about a clothing item.
fn yes_no_answer(set: &RecommendationSet, analysis: &PromptAnalysis) -> Option<String> {
    if !analysis.asks_yes_no {
        return None;
    }
    let word = analysis.asked_items.first()?.as_str();
    let singular = word.strip_suffix('s').unwrap_or(word);
    let recommended = Category::ALL
        .iter()
        .any(|c| set.mentions(*c, word) || set.mentions(*c, singular));

    Some(if recommended {
        format!("Yes, bring your {word}.")
    } else {
        format!("No, you won't need {}.", with_article(word))
    })
}

fn body(set: &RecommendationSet, snapshot: &WeatherSnapshot, profile: &Profile) -> String {
    let band = TemperatureBand::for_temperature(snapshot.temperature).describe();
    let temperature = snapshot.temperature.round();

    match profile.complexity_level {
        ComplexityLevel::Simple => {
            let items = lead_items(set, &[Category::Outerwear, Category::BaseLayers], 1)
                .into_iter()
                .chain(lead_items(set, &[Category::Footwear], 1))
                .collect::<Vec<_>>();
            if items.is_empty() {
                format!("It's {band} outside!")
            } else {
                format!("Wear your {}!", join_list(&items))
            }
        }
        ComplexityLevel::Moderate => {
            let items = lead_items(
                set,
                &[
                    Category::Outerwear,
                    Category::BaseLayers,
                    Category::Bottoms,
                    Category::Footwear,
                ],
                3,
            );
            format!(
                "It's {temperature}°F and {band}. Wear your {}.",
                join_list(&items)
            )
        }
        ComplexityLevel::Complex => {
            let mut sentence = format!("It's {temperature}°F and {band}");
            if (snapshot.feels_like - snapshot.temperature).abs() >= FEELS_LIKE_MENTION_F {
                sentence.push_str(&format!(", but it feels like {}°F", snapshot.feels_like.round()));
            }
            if snapshot.precipitation_probability > 0.0 {
                sentence.push_str(&format!(
                    ", with a {}% chance of rain",
                    snapshot.precipitation_probability.round()
                ));
            }
            let items = lead_items(
                set,
                &[
                    Category::BaseLayers,
                    Category::Outerwear,
                    Category::Bottoms,
                    Category::Footwear,
                    Category::Accessories,
                ],
                5,
            );
            format!("{sentence}. I'd suggest your {}.", join_list(&items))
        }
    }
}

/// Spoken response for a non-extreme recommendation set.
pub fn spoken_response(
    set: &RecommendationSet,
    snapshot: &WeatherSnapshot,
    profile: &Profile,
    analysis: &PromptAnalysis,
) -> String {
    let mut parts = Vec::new();

    if let Some(answer) = yes_no_answer(set, analysis) {
        parts.push(answer);
    }

    let body = body(set, snapshot, profile);
    parts.push(match analysis.timeframe {
        Some(timeframe) => format!("{}, {}", timeframe.spoken_prefix(), lower_first(&body)),
        None => body,
    });

    if profile.complexity_level != ComplexityLevel::Simple {
        parts.extend(set.special_notes.iter().cloned());
    }

    parts.join(" ")
}
