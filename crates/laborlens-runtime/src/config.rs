//! Analyzer configuration.
//!
//! ## Configuration Format
//! ```json
//! {
//!   "api_key": "...",                     // Optional, falls back to TOGETHER_API_KEY env
//!   "endpoint": "https://...",            // Optional, chat-completions URL
//!   "model": "meta-llama/...",            // Optional
//!   "timeout": "120s",                    // Optional, humantime syntax
//!   "temperature": 0.1,                   // Optional
//!   "context_limit": 5                    // Optional, retrieval hint
//! }
//! ```

use serde_json::Value as JsonValue;
use std::time::Duration;

use crate::error::AnalysisError;
use crate::providers::{ApiCredential, CompletionConfig};

/// Environment variable holding the service credential.
pub const API_KEY_ENV: &str = "TOGETHER_API_KEY";
pub const ENDPOINT_ENV: &str = "LABORLENS_ENDPOINT";
pub const MODEL_ENV: &str = "LABORLENS_MODEL";
pub const TIMEOUT_ENV: &str = "LABORLENS_TIMEOUT";

pub const DEFAULT_ENDPOINT: &str = "https://api.together.xyz/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "meta-llama/Llama-3.3-70B-Instruct-Turbo";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_CONTEXT_LIMIT: usize = 5;

const CREDENTIAL_NAME: &str = "Together API key";

/// Everything the analyzer needs to reach the service.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub credential: ApiCredential,
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
    pub temperature: f32,
    /// Result-count hint passed to the context retriever
    pub context_limit: usize,
}

impl AnalyzerConfig {
    /// Configuration with defaults for everything but the credential.
    pub fn new(credential: ApiCredential) -> Self {
        Self {
            credential,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            temperature: DEFAULT_TEMPERATURE,
            context_limit: DEFAULT_CONTEXT_LIMIT,
        }
    }

    /// Load from the process environment.
    ///
    /// `TOGETHER_API_KEY` is required; the `LABORLENS_*` overrides are
    /// optional.
    pub fn from_env() -> Result<Self, AnalysisError> {
        let credential = ApiCredential::from_env(API_KEY_ENV, CREDENTIAL_NAME)?;
        let mut config = Self::new(credential);

        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            config.endpoint = endpoint;
        }
        if let Ok(model) = std::env::var(MODEL_ENV) {
            config.model = model;
        }
        if let Ok(timeout) = std::env::var(TIMEOUT_ENV) {
            config.timeout = parse_timeout(&timeout)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load from JSON configuration, falling back to the environment for
    /// the credential.
    pub fn from_config(config: &JsonValue) -> Result<Self, AnalysisError> {
        let credential =
            ApiCredential::from_config_or_env(config, "api_key", API_KEY_ENV, CREDENTIAL_NAME)?;
        let mut result = Self::new(credential);

        if let Some(endpoint) = config["endpoint"].as_str() {
            result.endpoint = endpoint.to_string();
        }
        if let Some(model) = config["model"].as_str() {
            result.model = model.to_string();
        }
        if let Some(timeout) = config["timeout"].as_str() {
            result.timeout = parse_timeout(timeout)?;
        }
        if let Some(temperature) = config["temperature"].as_f64() {
            result.temperature = temperature as f32;
        }
        if let Some(limit) = config["context_limit"].as_u64() {
            result.context_limit = limit as usize;
        }

        result.validate()?;
        Ok(result)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check endpoint scheme and timeout.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(AnalysisError::Configuration(
                "endpoint must start with http:// or https://".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(AnalysisError::Configuration(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Per-request settings derived from this configuration.
    pub fn completion(&self) -> CompletionConfig {
        CompletionConfig {
            model: self.model.clone(),
            temperature: self.temperature,
            timeout: self.timeout,
            json_output: true,
        }
    }
}

fn parse_timeout(value: &str) -> Result<Duration, AnalysisError> {
    humantime::parse_duration(value.trim())
        .map_err(|e| AnalysisError::Configuration(format!("invalid timeout '{}': {}", value, e)))
}
