//! LLM response parsing.
//!
//! Strict JSON is the contract. Labeled text ("Outerwear: ...") is accepted
//! for older prompt templates, and a keyword scan over prose is the last
//! resort. Only [`parse_llm_response`] can fail; the extract helpers always
//! return something, possibly empty.

pub mod labeled;
pub mod markdown;
pub mod prose;
pub mod spoken;

use serde::Deserialize;

use crate::recommendation::{Category, RecommendationSet};

pub use labeled::parse_labeled;
pub use markdown::{embedded_json, strip_code_fence, strip_markdown, strip_surrounding_quotes};
pub use prose::parse_prose;
pub use spoken::extract_spoken_response;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("LLM response is empty")]
    Empty,
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("no recommendations could be extracted")]
    NoRecommendations,
}

/// Which parser path produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    Labeled,
    Prose,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    pub recommendations: RecommendationSet,
    pub spoken_response: String,
    pub format: ResponseFormat,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonResponse {
    recommendations: Option<RecommendationSet>,
    spoken_response: Option<String>,
}

/// Rebuild through `add` so duplicates and blank items are dropped.
fn normalized(raw: RecommendationSet) -> RecommendationSet {
    let mut set = RecommendationSet::default();
    for category in Category::ALL {
        for item in raw.items(category) {
            let mut item = item.clone();
            item.item = strip_markdown(&item.item);
            set.add(category, item);
        }
    }
    for note in raw.special_notes {
        set.add_note(note.trim());
    }
    set
}

fn parse_json(text: &str) -> Result<ParsedResponse, ParseError> {
    let parsed: JsonResponse =
        serde_json::from_str(text).map_err(|e| ParseError::InvalidJson(e.to_string()))?;

    let recommendations = parsed
        .recommendations
        .map(normalized)
        .ok_or(ParseError::MissingField("recommendations"))?;
    let spoken_response = parsed
        .spoken_response
        .map(|s| spoken::clean(&s))
        .filter(|s| !s.is_empty())
        .ok_or(ParseError::MissingField("spokenResponse"))?;

    Ok(ParsedResponse {
        recommendations,
        spoken_response,
        format: ResponseFormat::Json,
    })
}

fn looks_like_json(text: &str) -> bool {
    text.starts_with('{')
}

/// JSON wrapped in chatter ("Here is the outfit: ```json {...}```").
/// `None` when there is no object or it does not satisfy the contract.
fn parse_embedded_json(text: &str) -> Option<ParsedResponse> {
    let candidate = embedded_json(text)?;
    match parse_json(candidate) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::debug!("Embedded JSON rejected, trying text formats: {}", e);
            None
        }
    }
}

fn extract_text(text: &str) -> (RecommendationSet, ResponseFormat) {
    if labeled::has_labels(text) {
        (parse_labeled(text), ResponseFormat::Labeled)
    } else {
        (parse_prose(text), ResponseFormat::Prose)
    }
}

/// Parse a raw LLM response. Errors mean the response can't be used and the
/// caller should fall back to the rule engine.
pub fn parse_llm_response(raw: &str) -> Result<ParsedResponse, ParseError> {
    let text = strip_code_fence(raw);
    if text.is_empty() {
        return Err(ParseError::Empty);
    }

    let parsed = if looks_like_json(text) {
        parse_json(text)?
    } else if let Some(parsed) = parse_embedded_json(text) {
        parsed
    } else {
        let (recommendations, format) = extract_text(text);
        ParsedResponse {
            recommendations,
            spoken_response: extract_spoken_response(text),
            format,
        }
    };

    if parsed.recommendations.is_empty() {
        return Err(ParseError::NoRecommendations);
    }

    tracing::debug!(
        format = ?parsed.format,
        items = parsed.recommendations.item_count(),
        "Parsed LLM response"
    );
    Ok(parsed)
}

/// Best-effort recommendation extraction from any of the three formats.
pub fn extract_recommendations(raw: &str) -> RecommendationSet {
    let text = strip_code_fence(raw);
    if looks_like_json(text) {
        if let Ok(parsed) = parse_json(text) {
            return parsed.recommendations;
        }
    } else if let Some(parsed) = parse_embedded_json(text) {
        return parsed.recommendations;
    }
    extract_text(text).0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_contract() {
        let raw = r#"```json
{
  "recommendations": {
    "baseLayers": ["T-shirt"],
    "outerwear": ["Raincoat", "raincoat"],
    "bottoms": [],
    "accessories": [{"item": "Umbrella", "reason": "rain"}],
    "footwear": ["**Rain boots**"]
  },
  "spokenResponse": "\"Grab your raincoat!\""
}
```"#;
        let parsed = parse_llm_response(raw).unwrap();
        assert_eq!(parsed.format, ResponseFormat::Json);
        assert_eq!(parsed.recommendations.names(Category::Outerwear), vec!["Raincoat"]);
        assert_eq!(parsed.recommendations.names(Category::Footwear), vec!["Rain boots"]);
        assert_eq!(
            parsed.recommendations.accessories[0].reason.as_deref(),
            Some("rain")
        );
        assert_eq!(parsed.spoken_response, "Grab your raincoat!");
    }

    #[test]
    fn test_json_after_preface_line() {
        let raw = "Here is the outfit:\n```json\n{\"recommendations\": {\"outerwear\": [\"Raincoat\"], \"footwear\": [\"Rain boots\"]}, \"spokenResponse\": \"Wear your raincoat!\"}\n```";
        let parsed = parse_llm_response(raw).unwrap();
        assert_eq!(parsed.format, ResponseFormat::Json);
        assert_eq!(parsed.recommendations.names(Category::Outerwear), vec!["Raincoat"]);
        assert_eq!(parsed.recommendations.names(Category::Footwear), vec!["Rain boots"]);
        assert_eq!(parsed.spoken_response, "Wear your raincoat!");
    }

    #[test]
    fn test_unfenced_json_after_preface() {
        let raw = "Sure! {\"recommendations\": {\"bottoms\": [\"Jeans\"]}, \"spokenResponse\": \"Jeans today.\"} Have fun!";
        let parsed = parse_llm_response(raw).unwrap();
        assert_eq!(parsed.format, ResponseFormat::Json);
        assert_eq!(parsed.recommendations.names(Category::Bottoms), vec!["Jeans"]);
        assert_eq!(parsed.spoken_response, "Jeans today.");
    }

    #[test]
    fn test_preface_with_contract_breaking_json_falls_through() {
        let raw = "Here you go:\n```json\n{\"outfit\": \"coat\"}\n```\nOuterwear: Warm coat";
        let parsed = parse_llm_response(raw).unwrap();
        assert_eq!(parsed.format, ResponseFormat::Labeled);
        assert_eq!(parsed.recommendations.names(Category::Outerwear), vec!["Warm coat"]);
    }

    #[test]
    fn test_json_spoken_response_loses_markdown() {
        let raw = r#"{"recommendations": {"outerwear": ["Coat"]}, "spokenResponse": "**Wear your coat**\n- and `mittens`!"}"#;
        let parsed = parse_llm_response(raw).unwrap();
        assert_eq!(parsed.spoken_response, "Wear your coat and mittens!");
    }

    #[test]
    fn test_extract_recommendations_after_preface() {
        let set = extract_recommendations(
            "Okay:\n```json\n{\"recommendations\": {\"accessories\": [\"Umbrella\"]}, \"spokenResponse\": \"Bring it.\"}\n```",
        );
        assert_eq!(set.names(Category::Accessories), vec!["Umbrella"]);
    }

    #[test]
    fn test_json_missing_keys_fail() {
        assert_eq!(
            parse_llm_response(r#"{"spokenResponse": "hi"}"#),
            Err(ParseError::MissingField("recommendations"))
        );
        assert_eq!(
            parse_llm_response(r#"{"recommendations": {"outerwear": ["Coat"]}}"#),
            Err(ParseError::MissingField("spokenResponse"))
        );
    }

    #[test]
    fn test_invalid_json_fails() {
        assert!(matches!(
            parse_llm_response(r#"{"recommendations": "#),
            Err(ParseError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_json_with_no_items_fails() {
        let raw = r#"{"recommendations": {}, "spokenResponse": "Have fun!"}"#;
        assert_eq!(parse_llm_response(raw), Err(ParseError::NoRecommendations));
    }

    #[test]
    fn test_labeled_text() {
        let raw = "Outerwear: Light jacket\nFootwear: Sneakers\n\nYou'll be comfy in your jacket!";
        let parsed = parse_llm_response(raw).unwrap();
        assert_eq!(parsed.format, ResponseFormat::Labeled);
        assert_eq!(parsed.recommendations.names(Category::Outerwear), vec!["Light jacket"]);
        assert_eq!(parsed.spoken_response, "You'll be comfy in your jacket!");
    }

    #[test]
    fn test_prose() {
        let parsed = parse_llm_response("It's chilly, so wear a sweater and jeans.").unwrap();
        assert_eq!(parsed.format, ResponseFormat::Prose);
        assert!(!parsed.recommendations.base_layers.is_empty());
        assert!(!parsed.recommendations.bottoms.is_empty());
        assert_eq!(parsed.spoken_response, "It's chilly, so wear a sweater and jeans.");
    }

    #[test]
    fn test_unusable_text_fails() {
        assert_eq!(parse_llm_response("  "), Err(ParseError::Empty));
        assert_eq!(
            parse_llm_response("Have a great day!"),
            Err(ParseError::NoRecommendations)
        );
    }

    #[test]
    fn test_extract_recommendations_labeled_markdown() {
        let set = extract_recommendations("Outerwear: **Warm coat**, *windbreaker*");
        assert_eq!(set.names(Category::Outerwear), vec!["Warm coat", "windbreaker"]);
        assert!(set
            .names(Category::Outerwear)
            .iter()
            .all(|n| !n.contains('*')));
    }

    #[test]
    fn test_extract_recommendations_never_fails() {
        assert!(extract_recommendations("").is_empty());
        assert!(extract_recommendations("{not json").is_empty());
    }
}
