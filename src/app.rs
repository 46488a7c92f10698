//! Application wiring: configuration, weather and the recommendation pipeline.

use std::path::Path;
use std::sync::Arc;

use dressday_core::{AppError, Clock, Config, ConfigError, SystemClock};
use dressday_outfit::{
    LlmClient, LlmError, OllamaClient, Orchestrator, Profile, RecommendationRequest,
    RecommendationResult, Timeframe,
};
use dressday_weather::{OpenMeteoProvider, WeatherCache, WeatherService};

/// Main application state
pub struct App {
    config: Arc<Config>,
    weather: WeatherService,
    orchestrator: Orchestrator,
}

impl App {
    /// Load configuration from `path` (or the default location) and validate it.
    pub fn load_config(path: Option<&Path>) -> Result<Config, AppError> {
        let config = match path {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
        .map_err(|e| ConfigError::Malformed(e.to_string()))?;

        let report = config.validate();
        if report.has_errors() {
            return Err(ConfigError::Invalid(report.summary()).into());
        }
        for warning in &report.warnings {
            tracing::warn!("Config warning: {}", warning);
        }
        Ok(config)
    }

    pub fn new(config: Config, use_llm: bool) -> Result<Self, AppError> {
        Self::with_clock(config, use_llm, Arc::new(SystemClock))
    }

    pub fn with_clock(config: Config, use_llm: bool, clock: Arc<dyn Clock>) -> Result<Self, AppError> {
        let mut cache = WeatherCache::from_config(&config.cache, clock.clone());
        if config.cache.persist {
            cache = cache.with_persistence(&config.config_dir);
        }

        let provider = OpenMeteoProvider::from_config(&config.weather)?;
        // Each attempt has its own client timeout; the outer bound covers retries
        let fetch_timeout = config
            .weather
            .timeout()
            .saturating_mul(config.weather.max_retries.saturating_add(1));
        let weather = WeatherService::new(
            Arc::new(provider),
            Arc::new(cache),
            clock.clone(),
            fetch_timeout,
        );

        let llm: Option<Arc<dyn LlmClient>> = if use_llm {
            match OllamaClient::from_config(&config.llm) {
                Ok(client) => {
                    tracing::info!("Using LLM model {}", client.model());
                    Some(Arc::new(client))
                }
                Err(LlmError::NotConfigured) => {
                    tracing::info!("LLM disabled, using rule engine only");
                    None
                }
                Err(e) => {
                    tracing::warn!("LLM client unavailable, using rule engine only: {}", e);
                    None
                }
            }
        } else {
            None
        };
        let orchestrator = Orchestrator::from_config(&config.llm, llm, clock);

        tracing::info!("Application initialized");
        Ok(Self {
            config: Arc::new(config),
            weather,
            orchestrator,
        })
    }

    /// Weather for the location, then a recommendation for the profile.
    /// Fails only when no weather is available at all or the request is invalid.
    pub async fn recommend(
        &self,
        lat: f64,
        lon: f64,
        profile: Profile,
        prompt: Option<String>,
        timeframe: Option<Timeframe>,
    ) -> Result<RecommendationResult, AppError> {
        let report = self.weather.get_current_weather(lat, lon).await?;
        if report.is_stale {
            tracing::warn!(
                "Using stale weather fetched at {}",
                report.fetched_at.to_rfc3339()
            );
        }

        let mut request = RecommendationRequest::from_report(profile, &report);
        request.prompt = prompt;
        request.timeframe = timeframe;

        Ok(self.orchestrator.generate(request).await?)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
