//! Outfit recommendations for children
//!
//! A deterministic rule engine is always available. When an LLM backend is
//! configured and healthy it is tried first, and any failure falls back to
//! the rules.

pub mod availability;
pub mod confidence;
pub mod keywords;
pub mod llm;
pub mod orchestrator;
pub mod parser;
pub mod profile;
pub mod prompt;
pub mod recommendation;
pub mod request;
pub mod rules;

pub use availability::AvailabilityCache;
pub use confidence::{confidence_for, score_data_quality};
pub use llm::{LlmClient, LlmError, OllamaClient};
pub use orchestrator::Orchestrator;
pub use parser::{
    extract_recommendations, extract_spoken_response, parse_llm_response, ParseError,
    ParsedResponse, ResponseFormat,
};
pub use profile::{Age, ComplexityLevel, Gender, Profile, VocabularyStyle};
pub use prompt::{analyze_prompt, build_prompt, LlmPrompt, PromptAnalysis, Timeframe};
pub use recommendation::{Category, ClothingItem, RecommendationResult, RecommendationSet, Source};
pub use request::RecommendationRequest;
pub use rules::{classify, ExtremeWeather, RuleEngine, RuleOutcome, TemperatureBand};
