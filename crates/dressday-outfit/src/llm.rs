//! LLM backends.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dressday_core::{HttpErrorExt, LlmConfig, NetworkError};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

use crate::parser::ParseError;
use crate::prompt::LlmPrompt;

const USER_AGENT: &str = "dressday/0.1.0";

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("LLM is not configured")]
    NotConfigured,

    #[error("Network error: {0}")]
    Network(NetworkError),

    #[error("LLM request timed out")]
    Timeout,

    #[error("LLM returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid LLM response: {0}")]
    InvalidResponse(String),

    #[error("Could not parse LLM output: {0}")]
    Parse(#[from] ParseError),
}

impl LlmError {
    /// Whether this failure says the backend itself is unusable, as opposed
    /// to one bad answer.
    pub fn marks_unavailable(&self) -> bool {
        !matches!(self, Self::Parse(_))
    }
}

impl From<NetworkError> for LlmError {
    fn from(err: NetworkError) -> Self {
        match err {
            NetworkError::Timeout => LlmError::Timeout,
            other => LlmError::Network(other),
        }
    }
}

/// Text-generation backend.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Cheap reachability probe
    async fn health_check(&self) -> Result<(), LlmError>;

    /// Raw model output for a prompt
    async fn generate(&self, prompt: &LlmPrompt) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    system: &'a str,
    prompt: &'a str,
    stream: bool,
    format: &'a str,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

/// Ollama-compatible HTTP client
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Arc<Client>,
    base_url: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
}

impl OllamaClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| LlmError::from(e.to_network_error()))?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: None,
            temperature: 0.7,
        })
    }

    /// Client for the configured backend; `NotConfigured` when disabled.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        if !config.enabled || config.model.trim().is_empty() {
            return Err(LlmError::NotConfigured);
        }
        let mut client = Self::new(&config.base_url, &config.model, config.timeout())?
            .with_temperature(config.temperature);
        if let Some(key) = config.effective_api_key() {
            client = client.with_api_key(key);
        }
        Ok(client)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(LlmError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn health_check(&self) -> Result<(), LlmError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .map_err(|e| LlmError::from(e.to_network_error()))?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn generate(&self, prompt: &LlmPrompt) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            system: &prompt.system,
            prompt: &prompt.user,
            stream: false,
            format: "json",
            options: GenerateOptions {
                temperature: self.temperature,
            },
        };

        tracing::debug!(model = %self.model, "Requesting LLM generation");
        let response = self
            .authorized(self.client.post(&url).json(&body))
            .send()
            .await
            .map_err(|e| LlmError::from(e.to_network_error()))?;
        let response = Self::check_status(response).await?;

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        parsed
            .response
            .ok_or_else(|| LlmError::InvalidResponse("missing `response` field".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_parse_errors_keep_backend_available() {
        assert!(!LlmError::Parse(ParseError::Empty).marks_unavailable());
        assert!(LlmError::Timeout.marks_unavailable());
        assert!(LlmError::NotConfigured.marks_unavailable());
        assert!(LlmError::Status {
            status: 500,
            message: String::new()
        }
        .marks_unavailable());
    }

    #[test]
    fn test_network_timeout_maps_to_timeout() {
        assert!(matches!(LlmError::from(NetworkError::Timeout), LlmError::Timeout));
        assert!(matches!(
            LlmError::from(NetworkError::Unreachable("refused".into())),
            LlmError::Network(_)
        ));
    }

    #[test]
    fn test_from_config_disabled() {
        let config = LlmConfig {
            enabled: false,
            ..LlmConfig::default()
        };
        assert!(matches!(
            OllamaClient::from_config(&config),
            Err(LlmError::NotConfigured)
        ));
    }
}
