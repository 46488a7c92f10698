//! Errors that can reach a dressday caller.
//!
//! Failures the recommendation flow recovers from on its own (cache I/O,
//! LLM calls, unparseable answers) are logged at the point of failure and
//! never surface here.

use thiserror::Error;

/// Everything a request can fail with once recovery is exhausted.
///
/// `user_message()` is short enough to be read aloud to a child.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("network: {0}")]
    Network(#[from] NetworkError),

    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// Neither the provider nor the cache had weather for the location.
    #[error("no weather available: {0}")]
    WeatherUnavailable(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Network(err) => err.user_message(),
            Self::Config(err) => err.user_message(),
            Self::Validation(_) => "That request doesn't look right. Please check it and try again.",
            Self::WeatherUnavailable(_) => {
                "I couldn't get the weather right now. Please try again in a little while."
            }
            Self::Other(_) => "Something went wrong. Please try again.",
        }
    }
}

/// Transport-level failure talking to an HTTP backend.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("could not reach host: {0}")]
    Unreachable(String),

    #[error("timed out")]
    Timeout,

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("unreadable response: {0}")]
    Malformed(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Unreachable(_) => "I can't reach the internet right now.",
            Self::Timeout => "That took too long. Please try again.",
            Self::HttpStatus { status, .. } if *status >= 500 => {
                "The weather service is having trouble. Please try again later."
            }
            Self::HttpStatus { .. } => "The weather service turned the request down.",
            Self::Malformed(_) => "The weather service sent something I couldn't read.",
        }
    }

    /// Timeouts, connection failures, 5xx, 408 and 429 are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::Unreachable(_) => true,
            Self::HttpStatus { status, .. } => matches!(*status, 408 | 429 | 500..=599),
            Self::Malformed(_) => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file parsed but failed validation.
    #[error("rejected: {0}")]
    Invalid(String),

    #[error("could not read config file: {0}")]
    Malformed(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Invalid(_) => "Some settings are out of range. Check config.toml.",
            Self::Malformed(_) => "config.toml could not be read. Check its syntax.",
        }
    }
}

/// A request rejected before it enters the recommendation pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Maps HTTP client errors onto [`NetworkError`].
pub trait HttpErrorExt {
    fn to_network_error(&self) -> NetworkError;
}

impl HttpErrorExt for reqwest::Error {
    fn to_network_error(&self) -> NetworkError {
        let detail = self.to_string();
        if self.is_timeout() {
            return NetworkError::Timeout;
        }
        if self.is_connect() {
            return NetworkError::Unreachable(detail);
        }
        match self.status() {
            Some(status) => NetworkError::HttpStatus {
                status: status.as_u16(),
                message: detail,
            },
            None if self.is_decode() => NetworkError::Malformed(detail),
            None => NetworkError::Unreachable(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> NetworkError {
        NetworkError::HttpStatus {
            status: code,
            message: String::new(),
        }
    }

    #[test]
    fn test_every_variant_has_spoken_message() {
        let errors = [
            AppError::Network(NetworkError::Timeout),
            AppError::Network(NetworkError::Malformed("x".into())),
            AppError::Config(ConfigError::Invalid("cache.max_entries".into())),
            AppError::Config(ConfigError::Malformed("line 1".into())),
            AppError::Validation(ValidationError::new("prompt", "too long")),
            AppError::WeatherUnavailable("no cache".into()),
            AppError::Other(anyhow::anyhow!("boom")),
        ];

        for err in errors {
            assert!(!err.user_message().is_empty(), "{err} has no user message");
        }
    }

    #[test]
    fn test_network_error_lifts_into_app_error() {
        let err: AppError = NetworkError::Timeout.into();
        assert!(matches!(err, AppError::Network(NetworkError::Timeout)));
    }

    #[test]
    fn test_server_fault_message_differs_from_rejection() {
        let fault = AppError::Network(status(503));
        let rejected = AppError::Network(status(404));
        assert_ne!(fault.user_message(), rejected.user_message());
        assert!(fault.user_message().contains("trouble"));
    }

    #[test]
    fn test_retryable_network_errors() {
        assert!(NetworkError::Timeout.is_retryable());
        assert!(NetworkError::Unreachable("reset".into()).is_retryable());
        assert!(status(502).is_retryable());
        assert!(status(429).is_retryable());
        assert!(status(408).is_retryable());
        assert!(!status(404).is_retryable());
        assert!(!NetworkError::Malformed("bad json".into()).is_retryable());
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("profile.age", "must be 4, 7 or 10");
        assert_eq!(err.to_string(), "profile.age: must be 4, 7 or 10");
    }
}
