//! Configuration management for bedrock-console
//!
//! Every setting has a built-in default, so the console runs without any
//! configuration file. A TOML file can override the defaults and a small set
//! of environment variables is applied on top of that.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Model invoked when no configuration says otherwise
pub const DEFAULT_MODEL_ID: &str = "amazon.nova-lite-v1:0";
/// Default cap on generated tokens per reply
pub const DEFAULT_MAX_TOKENS: u32 = 3000;
/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
/// Region used when neither the environment nor the config file names one
pub const DEFAULT_REGION: &str = "us-east-1";
/// Upper bound for the optional transport timeout
pub const MAX_REQUEST_TIMEOUT_SECONDS: u64 = 900;

/// Environment variable selecting the AWS region
pub const REGION_ENV: &str = "AWS_REGION";
/// Environment variable enabling verbose failure output
pub const DEBUG_ENV: &str = "DEBUG";

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub model: InferenceSettings,
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    /// Set from the `DEBUG` environment variable, never from the file
    #[serde(skip)]
    debug: bool,
}

/// Fixed inference parameters for the whole session
///
/// Fields are private and only reachable through [`InferenceSettings::new`]
/// (deserialization goes through it as well), so a value of this type always
/// holds a non-empty model id, a positive token limit and a temperature in
/// `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "RawInferenceSettings")]
pub struct InferenceSettings {
    model_id: String,
    max_tokens: u32,
    temperature: f32,
}

impl InferenceSettings {
    /// Create validated inference settings
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if the model id is blank, `max_tokens` is
    /// zero, or `temperature` is not a finite value in `[0, 1]`.
    pub fn new(model_id: impl Into<String>, max_tokens: u32, temperature: f32) -> AppResult<Self> {
        let model_id = model_id.into();
        if model_id.trim().is_empty() {
            return Err(AppError::Config("model.model_id cannot be empty".to_string()));
        }
        if max_tokens == 0 {
            return Err(AppError::Config(
                "model.max_tokens must be greater than 0".to_string(),
            ));
        }
        if !temperature.is_finite() || !(0.0..=1.0).contains(&temperature) {
            return Err(AppError::Config(format!(
                "model.temperature must be between 0.0 and 1.0, got {}",
                temperature
            )));
        }
        Ok(Self {
            model_id,
            max_tokens,
            temperature,
        })
    }

    /// Get the model identifier
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Get the maximum number of output tokens
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Get the sampling temperature
    pub fn temperature(&self) -> f32 {
        self.temperature
    }
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

#[derive(Deserialize)]
struct RawInferenceSettings {
    #[serde(default = "default_model_id")]
    model_id: String,
    #[serde(default = "default_max_tokens")]
    max_tokens: u32,
    #[serde(default = "default_temperature")]
    temperature: f32,
}

impl TryFrom<RawInferenceSettings> for InferenceSettings {
    type Error = AppError;

    fn try_from(raw: RawInferenceSettings) -> AppResult<Self> {
        Self::new(raw.model_id, raw.max_tokens, raw.temperature)
    }
}

fn default_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

/// Where and how to reach the Bedrock Runtime endpoint
///
/// The region is deliberately not validated here: an unusable region is
/// reported per turn as an endpoint resolution failure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EndpointConfig {
    #[serde(default = "default_region")]
    region: String,
    /// Overrides the regional endpoint (VPC endpoints, local proxies)
    #[serde(default)]
    endpoint_url: Option<String>,
    /// Transport timeout; the HTTP client default applies when unset
    #[serde(default)]
    request_timeout_seconds: Option<u64>,
}

impl EndpointConfig {
    /// Create an endpoint configuration
    pub fn new(
        region: impl Into<String>,
        endpoint_url: Option<String>,
        request_timeout_seconds: Option<u64>,
    ) -> Self {
        Self {
            region: region.into(),
            endpoint_url,
            request_timeout_seconds,
        }
    }

    /// Get the AWS region
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Get the explicit endpoint URL override, if any
    pub fn endpoint_url(&self) -> Option<&str> {
        self.endpoint_url.as_deref()
    }

    /// Get the configured transport timeout, if any
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_seconds.map(Duration::from_secs)
    }

    fn validate(&self) -> AppResult<()> {
        if let Some(url) = &self.endpoint_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(AppError::Config(format!(
                "endpoint.endpoint_url must start with http:// or https://, got '{}'",
                url
            )));
        }
        if let Some(timeout) = self.request_timeout_seconds {
            if timeout == 0 {
                return Err(AppError::Config(
                    "endpoint.request_timeout_seconds must be greater than 0".to_string(),
                ));
            }
            if timeout > MAX_REQUEST_TIMEOUT_SECONDS {
                return Err(AppError::Config(format!(
                    "endpoint.request_timeout_seconds cannot exceed {} seconds, got {}",
                    MAX_REQUEST_TIMEOUT_SECONDS, timeout
                )));
            }
        }
        Ok(())
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self::new(DEFAULT_REGION, None, None)
    }
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Interpret an environment flag value
///
/// Any non-empty value other than `0`, `false`, `no` or `off`
/// (case-insensitive) counts as enabled. This is stricter than treating any
/// set variable as enabled: `DEBUG=0` and `DEBUG=` leave debug output off.
pub fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty()
        && !["0", "false", "no", "off"]
            .iter()
            .any(|falsy| value.eq_ignore_ascii_case(falsy))
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        // Phase 1: Read file (preserves io::Error context)
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|source| AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            })?;

        // Phase 2: Parse TOML (model settings are validated here)
        let config: Self = toml::from_str(&content).map_err(|source| {
            AppError::ConfigParseFailed {
                path: path_display.clone(),
                source,
            }
        })?;

        // Phase 3: Validate the remaining sections
        config
            .validate()
            .map_err(|e| AppError::ConfigValidationFailed {
                path: path_display,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    /// Load the effective configuration for the process
    ///
    /// Uses the file at `path` if given, built-in defaults otherwise, then
    /// applies the process environment.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Apply environment overrides through the given lookup
    ///
    /// A non-empty `AWS_REGION` replaces the configured region; `DEBUG`
    /// toggles verbose failure output.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(region) = lookup(REGION_ENV).filter(|r| !r.trim().is_empty()) {
            tracing::debug!(region = %region, "Using region from environment");
            self.endpoint.region = region.trim().to_string();
        }
        self.debug = lookup(DEBUG_ENV).is_some_and(|v| is_truthy(&v));
        self
    }

    /// Whether verbose failure output is enabled
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Validate sections that are not checked during deserialization
    pub fn validate(&self) -> AppResult<()> {
        self.endpoint.validate()?;

        let level = self.observability.log_level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(AppError::Config(format!(
                "observability.log_level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.observability.log_level
            )));
        }
        Ok(())
    }
}
