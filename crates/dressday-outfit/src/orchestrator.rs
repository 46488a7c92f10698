//! Picks between the LLM and the rule engine for each request.
//!
//! The availability cache acts as a circuit breaker with a fixed retry
//! interval: one failed probe or transport error keeps the LLM off until
//! the TTL runs out.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dressday_core::{Clock, LlmConfig, ValidationError};
use uuid::Uuid;

use crate::availability::AvailabilityCache;
use crate::confidence::{confidence_for, MAX_CONFIDENCE};
use crate::llm::{LlmClient, LlmError};
use crate::parser::{parse_llm_response, ParsedResponse};
use crate::prompt::{build_prompt, PromptAnalysis};
use crate::recommendation::{RecommendationResult, RecommendationSet, Source};
use crate::request::RecommendationRequest;
use crate::rules::{classify, RuleEngine};

pub const DEFAULT_AVAILABILITY_TTL_SECS: i64 = 300;
pub const DEFAULT_LLM_TIMEOUT: Duration = Duration::from_secs(30);

pub struct Orchestrator {
    llm: Option<Arc<dyn LlmClient>>,
    rules: RuleEngine,
    availability: AvailabilityCache,
    clock: Arc<dyn Clock>,
    llm_timeout: Duration,
}

impl Orchestrator {
    /// Orchestrator with default TTL and timeout. Pass `None` to always use rules.
    pub fn new(llm: Option<Arc<dyn LlmClient>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            llm,
            rules: RuleEngine::new(),
            availability: AvailabilityCache::new(
                chrono::Duration::seconds(DEFAULT_AVAILABILITY_TTL_SECS),
                clock.clone(),
            ),
            clock,
            llm_timeout: DEFAULT_LLM_TIMEOUT,
        }
    }

    pub fn from_config(
        config: &LlmConfig,
        llm: Option<Arc<dyn LlmClient>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::new(llm, clock)
            .with_availability_ttl(config.availability_ttl())
            .with_llm_timeout(config.timeout())
    }

    pub fn with_availability_ttl(mut self, ttl: chrono::Duration) -> Self {
        self.availability = AvailabilityCache::new(ttl, self.clock.clone());
        self
    }

    pub fn with_llm_timeout(mut self, timeout: Duration) -> Self {
        self.llm_timeout = timeout;
        self
    }

    pub fn availability(&self) -> &AvailabilityCache {
        &self.availability
    }

    /// Forget the cached availability so the next request probes again.
    pub fn reset_availability(&self) {
        self.availability.reset();
    }

    /// Produce a recommendation. Only request validation can fail; LLM
    /// problems fall back to the rule engine.
    pub async fn generate(
        &self,
        request: RecommendationRequest,
    ) -> Result<RecommendationResult, ValidationError> {
        let started = Instant::now();
        let request = request.validated()?;
        let analysis = request.analysis();

        let (recommendations, spoken_response, source, confidence) =
            if let Some(extreme) = classify(&request.weather) {
                // Safety responses never reach the LLM
                let outcome = self.rules.evaluate(&request.weather, &request.profile, &analysis);
                tracing::info!(?extreme, "Returning safety recommendation");
                (
                    outcome.recommendations,
                    outcome.spoken_response,
                    Source::Rules,
                    MAX_CONFIDENCE,
                )
            } else if let Some(parsed) = self.try_llm(&request, &analysis).await {
                (
                    parsed.recommendations,
                    parsed.spoken_response,
                    Source::Llm,
                    confidence_for(Source::Llm, &request.weather, request.weather_stale),
                )
            } else {
                let outcome = self.rules.evaluate(&request.weather, &request.profile, &analysis);
                (
                    outcome.recommendations,
                    outcome.spoken_response,
                    Source::Rules,
                    confidence_for(Source::Rules, &request.weather, request.weather_stale),
                )
            };

        let result = self.finish(request, recommendations, spoken_response, source, confidence, started);
        tracing::info!(
            id = %result.id,
            source = ?result.source,
            confidence = result.confidence,
            elapsed_ms = result.processing_time_ms,
            "Recommendation generated"
        );
        Ok(result)
    }

    fn finish(
        &self,
        request: RecommendationRequest,
        recommendations: RecommendationSet,
        spoken_response: String,
        source: Source,
        confidence: f64,
        started: Instant,
    ) -> RecommendationResult {
        RecommendationResult {
            id: Uuid::new_v4().to_string(),
            profile_id: request.profile.id,
            weather_data: request.weather,
            recommendations,
            spoken_response,
            source,
            confidence,
            created_at: self.clock.now(),
            processing_time_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// LLM answer, or `None` when the rule engine should be used instead.
    async fn try_llm(
        &self,
        request: &RecommendationRequest,
        analysis: &PromptAnalysis,
    ) -> Option<ParsedResponse> {
        let llm = self.llm.as_ref()?;
        if !self.is_llm_available(llm.as_ref()).await {
            tracing::debug!("LLM unavailable, using rule engine");
            return None;
        }

        let prompt = build_prompt(request, analysis);
        let outcome = match tokio::time::timeout(self.llm_timeout, llm.generate(&prompt)).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout),
        }
        .and_then(|raw| parse_llm_response(&raw).map_err(LlmError::from));

        match outcome {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("LLM generation failed, falling back to rules: {}", e);
                if e.marks_unavailable() {
                    self.availability.set(false);
                }
                None
            }
        }
    }

    async fn is_llm_available(&self, llm: &dyn LlmClient) -> bool {
        if let Some(available) = self.availability.get() {
            return available;
        }

        let available = match tokio::time::timeout(self.llm_timeout, llm.health_check()).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                tracing::warn!("LLM health check failed: {}", e);
                false
            }
            Err(_) => {
                tracing::warn!("LLM health check timed out");
                false
            }
        };
        self.availability.set(available);
        available
    }
}
