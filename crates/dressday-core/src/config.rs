use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Environment variable that overrides `llm.api_key`.
pub const LLM_API_KEY_ENV: &str = "DRESSDAY_LLM_API_KEY";

/// Upper bound for `weather.max_retries`
pub const MAX_WEATHER_RETRIES: u32 = 10;

/// Upper bound for `llm.availability_ttl_secs` (one day)
pub const MAX_AVAILABILITY_TTL_SECS: u64 = 24 * 60 * 60;

const APP_DIR: &str = "dressday";
const CONFIG_FILE: &str = "config.toml";

/// One problem found while checking a [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.field)
    }
}

/// Errors block startup; warnings are only logged.
#[derive(Debug, Clone, Default)]
pub struct ConfigReport {
    pub errors: Vec<ConfigIssue>,
    pub warnings: Vec<ConfigIssue>,
}

impl ConfigReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(ConfigIssue {
            field: field.to_owned(),
            message: message.into(),
        });
    }

    fn warn(&mut self, field: &str, message: impl Into<String>) {
        self.warnings.push(ConfigIssue {
            field: field.to_owned(),
            message: message.into(),
        });
    }

    /// All errors on one line, for [`crate::ConfigError::Invalid`].
    pub fn summary(&self) -> String {
        let parts: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        parts.join("; ")
    }
}

/// Only http(s) URLs with a host and a non-zero port are accepted.
fn check_http_url(raw: &str, field: &str, report: &mut ConfigReport) {
    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(e) => {
            report.error(field, format!("not a URL ({e})"));
            return;
        }
    };
    if !matches!(url.scheme(), "http" | "https") {
        report.error(field, format!("scheme must be http or https, not {}", url.scheme()));
    }
    if url.host_str().unwrap_or_default().is_empty() {
        report.error(field, "missing host");
    }
    if url.port() == Some(0) {
        report.error(field, "port 0 is not usable");
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory (also holds the weather cache file).
    /// Defaults to the directory containing the config file.
    #[serde(default)]
    pub config_dir: PathBuf,

    /// Upstream weather provider settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Weather cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// LLM generator settings
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Temperature unit requested from the upstream provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Auto,
    Celsius,
    Fahrenheit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Open-Meteo compatible base URL
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_secs: u64,

    /// Retries for transient upstream failures
    #[serde(default = "default_weather_retries")]
    pub max_retries: u32,

    /// Unit the upstream is asked for (auto means fahrenheit)
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com".to_string()
}

fn default_weather_timeout() -> u64 {
    10
}

fn default_weather_retries() -> u32 {
    1
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            timeout_secs: default_weather_timeout(),
            max_retries: default_weather_retries(),
            temperature_unit: TemperatureUnit::Auto,
        }
    }
}

impl WeatherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Freshness window for cached snapshots (default: 60)
    #[serde(default = "default_cache_ttl")]
    pub ttl_minutes: u32,

    /// Entries kept before the oldest fetch is evicted (default: 100)
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: usize,

    /// Persist entries to `weather_cache.json` in the config directory
    #[serde(default = "default_cache_persist")]
    pub persist: bool,
}

fn default_cache_ttl() -> u32 {
    60
}

fn default_cache_max_entries() -> usize {
    100
}

fn default_cache_persist() -> bool {
    true
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: default_cache_ttl(),
            max_entries: default_cache_max_entries(),
            persist: default_cache_persist(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.ttl_minutes))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Set to false to always use the rule engine
    #[serde(default = "default_llm_enabled")]
    pub enabled: bool,

    /// Ollama compatible base URL
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// Model name passed through to the backend
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Bearer token for hosted backends (env `DRESSDAY_LLM_API_KEY` wins)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Upper bound for a single generation call
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,

    /// How long a health probe result is trusted
    #[serde(default = "default_availability_ttl")]
    pub availability_ttl_secs: u64,

    /// Sampling temperature
    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,
}

fn default_llm_enabled() -> bool {
    true
}

fn default_llm_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_llm_model() -> String {
    "llama3.2".to_string()
}

fn default_llm_timeout() -> u64 {
    30
}

fn default_availability_ttl() -> u64 {
    300
}

fn default_llm_temperature() -> f32 {
    0.7
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: default_llm_enabled(),
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            api_key: None,
            timeout_secs: default_llm_timeout(),
            availability_ttl_secs: default_availability_ttl(),
            temperature: default_llm_temperature(),
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Saturates at [`chrono::Duration::MAX`] for values chrono cannot hold.
    pub fn availability_ttl(&self) -> chrono::Duration {
        i64::try_from(self.availability_ttl_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }

    /// API key from the environment, falling back to the config file
    pub fn effective_api_key(&self) -> Option<String> {
        std::env::var(LLM_API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR),
            weather: WeatherConfig::default(),
            cache: CacheConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl Config {
    /// `<platform config dir>/dressday/config.toml`, created with defaults on first run.
    pub fn load() -> Result<Self> {
        let base = dirs::config_dir().context("no platform config directory")?;
        Self::load_from(&base.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Read `path`, or write defaults there when it does not exist yet.
    ///
    /// An empty `config_dir` resolves to the directory holding the file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let parent = path.parent().map(Path::to_path_buf);

        if !path.exists() {
            let mut config = Self::default();
            if let Some(dir) = parent {
                config.config_dir = dir;
            }
            config.save_to(path)?;
            tracing::info!("Wrote default config to {}", path.display());
            return Ok(config);
        }

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let mut config: Self =
            toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;

        if config.config_dir.as_os_str().is_empty() {
            if let Some(dir) = parent {
                config.config_dir = dir;
            }
        }
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let text = toml::to_string_pretty(self).context("serializing config")?;
        std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
    }

    pub fn validate(&self) -> ConfigReport {
        let mut report = ConfigReport::default();

        check_http_url(&self.weather.base_url, "weather.base_url", &mut report);
        if self.weather.timeout_secs == 0 {
            report.error("weather.timeout_secs", "must be at least 1 second");
        }
        if self.weather.max_retries > MAX_WEATHER_RETRIES {
            report.error(
                "weather.max_retries",
                format!("at most {MAX_WEATHER_RETRIES} retries; more delays the stale-cache fallback"),
            );
        }

        if self.cache.max_entries == 0 {
            report.error("cache.max_entries", "the cache needs room for one entry");
        }
        match self.cache.ttl_minutes {
            0 => report.warn("cache.ttl_minutes", "0 minutes makes every cached snapshot stale"),
            m if m > 24 * 60 => report.warn("cache.ttl_minutes", "longer than a day"),
            _ => {}
        }

        if self.llm.enabled {
            check_http_url(&self.llm.base_url, "llm.base_url", &mut report);
            if self.llm.model.trim().is_empty() {
                report.error("llm.model", "a model name is needed while the LLM is enabled");
            }
        }
        if self.llm.timeout_secs == 0 {
            report.error("llm.timeout_secs", "must be at least 1 second");
        }
        match self.llm.availability_ttl_secs {
            0 => report.warn(
                "llm.availability_ttl_secs",
                "0 seconds probes the LLM before every request",
            ),
            s if s > MAX_AVAILABILITY_TTL_SECS => report.error(
                "llm.availability_ttl_secs",
                format!("at most {MAX_AVAILABILITY_TTL_SECS} seconds"),
            ),
            _ => {}
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            report.warn("llm.temperature", "expected a value between 0.0 and 2.0");
        }

        report
    }
}
