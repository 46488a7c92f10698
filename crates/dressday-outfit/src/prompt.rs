//! Free-text prompt analysis and LLM prompt construction.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::keywords::{categories_in, matcher};
use crate::profile::ComplexityLevel;
use crate::recommendation::Category;
use crate::request::RecommendationRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Morning,
    Afternoon,
    Evening,
    Today,
}

impl Timeframe {
    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::Morning => "morning",
            Timeframe::Afternoon => "afternoon",
            Timeframe::Evening => "evening",
            Timeframe::Today => "today",
        }
    }

    /// Lead-in for spoken output, e.g. "This morning"
    pub fn spoken_prefix(self) -> &'static str {
        match self {
            Timeframe::Morning => "This morning",
            Timeframe::Afternoon => "This afternoon",
            Timeframe::Evening => "This evening",
            Timeframe::Today => "Today",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "morning" => Ok(Timeframe::Morning),
            "afternoon" => Ok(Timeframe::Afternoon),
            "evening" | "tonight" => Ok(Timeframe::Evening),
            "today" => Ok(Timeframe::Today),
            other => Err(format!(
                "unknown timeframe '{other}', expected morning, afternoon, evening or today"
            )),
        }
    }
}

pub const ACTIVITY_KEYWORDS: &[&str] = &["school", "playground", "park", "soccer", "swimming", "party"];

/// What a child's question is about
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptAnalysis {
    pub timeframe: Option<Timeframe>,
    pub asked_categories: Vec<Category>,
    /// Clothing words as they appear in the prompt, lowercased
    pub asked_items: Vec<String>,
    pub asks_yes_no: bool,
    pub activity: Option<String>,
}

#[allow(clippy::expect_used)]
static TIMEFRAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(morning|afternoon|evening|tonight|today)\b").expect("static regex compiles")
});

#[allow(clippy::expect_used)]
static YES_NO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(do i need|will i need|should i|can i)\b").expect("static regex compiles")
});

#[allow(clippy::expect_used)]
static ACTIVITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    let words = ACTIVITY_KEYWORDS.join("|");
    Regex::new(&format!(r"(?i)\b({words})\b")).expect("static regex compiles")
});

/// Analyze a free-text question. The first timeframe and activity mentioned win.
pub fn analyze_prompt(text: &str) -> PromptAnalysis {
    let timeframe = TIMEFRAME_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok());

    let activity = ACTIVITY_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_lowercase());

    let mut asked_items: Vec<String> = Vec::new();
    for category in Category::ALL {
        for m in matcher(category).find_iter(text) {
            let word = m.as_str().to_lowercase();
            if !asked_items.contains(&word) {
                asked_items.push(word);
            }
        }
    }

    PromptAnalysis {
        timeframe,
        asked_categories: categories_in(text),
        asked_items,
        asks_yes_no: YES_NO_RE.is_match(text),
        activity,
    }
}

/// System and user halves of an LLM prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmPrompt {
    pub system: String,
    pub user: String,
}

const RESPONSE_CONTRACT: &str = r#"Respond with JSON only, exactly in this shape:
{
  "recommendations": {
    "baseLayers": [string], "outerwear": [string], "bottoms": [string],
    "accessories": [string], "footwear": [string]
  },
  "spokenResponse": string
}"#;

fn vocabulary_guidance(level: ComplexityLevel) -> &'static str {
    match level {
        ComplexityLevel::Simple => {
            "The child is 4. Use one or two short sentences with simple, playful words."
        }
        ComplexityLevel::Moderate => {
            "The child is 7. Use two or three friendly sentences and mention the temperature."
        }
        ComplexityLevel::Complex => {
            "The child is 10. Use descriptive sentences, mention the temperature, how it feels, and the chance of rain."
        }
    }
}

/// Build the prompt sent to the LLM for a validated request.
pub fn build_prompt(request: &RecommendationRequest, analysis: &PromptAnalysis) -> LlmPrompt {
    let system = format!(
        "You help children choose what to wear for today's weather. \
         Keep suggestions safe and practical.\n{}\n{}",
        vocabulary_guidance(request.profile.complexity_level),
        RESPONSE_CONTRACT
    );

    let weather = &request.weather;
    let mut contract = json!({
        "profile": {
            "age": request.profile.age.years(),
            "gender": request.profile.gender,
        },
        "weather": {
            "temperature": weather.temperature,
            "feelsLike": weather.feels_like,
            "conditions": weather.conditions,
            "precipitationProbability": weather.precipitation_probability,
            "windSpeed": weather.wind_speed,
            "uvIndex": weather.uv_index,
        },
    });
    if let Some(prompt) = &request.prompt {
        contract["prompt"] = json!(prompt);
    }
    if let Some(timeframe) = analysis.timeframe {
        contract["timeframe"] = json!(timeframe);
    }

    let mut user = contract.to_string();
    if let Some(activity) = &analysis.activity {
        user.push_str(&format!("\nThe child is getting ready for: {activity}."));
    }
    if analysis.asks_yes_no && !analysis.asked_categories.is_empty() {
        user.push_str("\nStart the spoken response with a clear yes or no.");
    }

    LlmPrompt { system, user }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Age, Gender, Profile};
    use dressday_weather::WeatherSnapshot;
    use std::collections::BTreeSet;

    fn request(prompt: Option<&str>) -> RecommendationRequest {
        let weather = WeatherSnapshot {
            temperature: 55.0,
            feels_like: 52.0,
            conditions: "Cloudy".into(),
            precipitation_probability: 20.0,
            wind_speed: 5.0,
            uv_index: 1.0,
            humidity: None,
            missing_fields: BTreeSet::new(),
        };
        let mut request =
            RecommendationRequest::new(Profile::new("kid", Age::Seven, Gender::Girl), weather);
        request.prompt = prompt.map(str::to_string);
        request
    }

    #[test]
    fn test_timeframe_parse() {
        assert_eq!("Morning".parse::<Timeframe>(), Ok(Timeframe::Morning));
        assert_eq!("tonight".parse::<Timeframe>(), Ok(Timeframe::Evening));
        assert!("noon".parse::<Timeframe>().is_err());
    }

    #[test]
    fn test_analyze_yes_no_category_question() {
        let analysis = analyze_prompt("Do I need an umbrella this afternoon?");
        assert_eq!(analysis.timeframe, Some(Timeframe::Afternoon));
        assert!(analysis.asks_yes_no);
        assert_eq!(analysis.asked_categories, vec![Category::Accessories]);
        assert_eq!(analysis.asked_items, vec!["umbrella".to_string()]);
        assert_eq!(analysis.activity, None);
    }

    #[test]
    fn test_analyze_activity() {
        let analysis = analyze_prompt("What should I wear to the Playground?");
        assert_eq!(analysis.activity.as_deref(), Some("playground"));
        assert!(analysis.asks_yes_no);
        assert!(analysis.asked_categories.is_empty());
    }

    #[test]
    fn test_analyze_empty() {
        assert_eq!(analyze_prompt(""), PromptAnalysis::default());
    }

    #[test]
    fn test_build_prompt_embeds_request_contract() {
        let request = request(Some("Is it jacket weather?"));
        let analysis = analyze_prompt("Is it jacket weather?");
        let prompt = build_prompt(&request, &analysis);

        assert!(prompt.system.contains("spokenResponse"));
        assert!(prompt.system.contains("The child is 7"));

        let first_line = prompt.user.lines().next().unwrap();
        let contract: serde_json::Value = serde_json::from_str(first_line).unwrap();
        assert_eq!(contract["profile"]["age"], 7);
        assert_eq!(contract["profile"]["gender"], "girl");
        assert_eq!(contract["weather"]["feelsLike"], 52.0);
        assert_eq!(contract["prompt"], "Is it jacket weather?");
        assert!(contract.get("timeframe").is_none());
    }

    #[test]
    fn test_build_prompt_requests_yes_no() {
        let request = request(Some("Do I need boots?"));
        let prompt = build_prompt(&request, &analyze_prompt("Do I need boots?"));
        assert!(prompt.user.contains("yes or no"));
    }

    #[test]
    fn test_build_prompt_mentions_activity() {
        let request = request(Some("Going to soccer"));
        let prompt = build_prompt(&request, &analyze_prompt("Going to soccer"));
        assert!(prompt.user.ends_with("getting ready for: soccer."));
    }
}
