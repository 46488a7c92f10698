//! Recommendation requests and their validation.

use dressday_core::ValidationError;
use dressday_weather::{WeatherReport, WeatherSnapshot};
use serde::{Deserialize, Serialize};

use crate::profile::Profile;
use crate::prompt::{analyze_prompt, PromptAnalysis, Timeframe};

pub const MAX_PROMPT_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub profile: Profile,
    pub weather: WeatherSnapshot,
    /// The weather came from a stale cache entry
    #[serde(default)]
    pub weather_stale: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<Timeframe>,
}

impl RecommendationRequest {
    pub fn new(profile: Profile, weather: WeatherSnapshot) -> Self {
        Self {
            profile,
            weather,
            weather_stale: false,
            prompt: None,
            timeframe: None,
        }
    }

    pub fn from_report(profile: Profile, report: &WeatherReport) -> Self {
        Self {
            weather_stale: report.is_stale,
            ..Self::new(profile, report.snapshot.clone())
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_timeframe(mut self, timeframe: Timeframe) -> Self {
        self.timeframe = Some(timeframe);
        self
    }

    /// Validate and normalize the request: the prompt is trimmed and an
    /// empty prompt becomes `None`.
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        self.profile.validate()?;
        self.weather
            .check_invariants()
            .map_err(|e| ValidationError::new("weather", e.to_string()))?;

        self.prompt = match self.prompt.take() {
            Some(prompt) => {
                let trimmed = prompt.trim();
                let len = trimmed.chars().count();
                if len > MAX_PROMPT_CHARS {
                    return Err(ValidationError::new(
                        "prompt",
                        format!("{len} characters, at most {MAX_PROMPT_CHARS} allowed"),
                    ));
                }
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            None => None,
        };

        Ok(self)
    }

    /// Prompt analysis with the explicit timeframe taking precedence
    pub fn analysis(&self) -> PromptAnalysis {
        let mut analysis = analyze_prompt(self.prompt.as_deref().unwrap_or_default());
        if let Some(timeframe) = self.timeframe {
            analysis.timeframe = Some(timeframe);
        }
        analysis
    }
}
