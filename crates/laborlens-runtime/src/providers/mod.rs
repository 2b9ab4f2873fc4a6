//! LLM provider abstractions for laborlens-runtime.
//!
//! This module defines the trait for chat-completion providers and the
//! HTTPS implementation used against OpenAI-compatible endpoints.
//!
//! ## Security
//!
//! All providers use the [`secrets`] module for credential handling.
//! See [`ApiCredential`] for the recommended patterns.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub mod secrets;

#[cfg(feature = "http")]
mod chat_completions;

pub use secrets::{ApiCredential, CredentialSource};

#[cfg(feature = "http")]
pub use chat_completions::ChatCompletionsProvider;

/// Maximum number of characters of an error body kept for diagnostics.
pub const BODY_EXCERPT_CHARS: usize = 500;

/// Errors from LLM providers.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("API error: {status} - {body}")]
    ApiError { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    ParseError(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

/// Configuration for a completion request.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Model to use
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Request timeout
    pub timeout: Duration,

    /// Ask the service for a strict JSON object
    pub json_output: bool,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: "meta-llama/Llama-3.3-70B-Instruct-Turbo".to_string(),
            temperature: 0.1,
            timeout: Duration::from_secs(120),
            json_output: true,
        }
    }
}

/// A chat message for LLM completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant"
    pub role: String,

    /// Message content
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Response from an LLM completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated content
    pub content: String,

    /// Token usage
    pub usage: TokenUsage,

    /// Model used
    pub model: String,

    /// Finish reason
    pub finish_reason: Option<String>,
}

/// Token usage from a completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt
    #[serde(default)]
    pub prompt_tokens: u32,

    /// Tokens in the completion
    #[serde(default)]
    pub completion_tokens: u32,
}

impl TokenUsage {
    /// Total tokens used.
    pub fn total(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// Provider abstraction allows swapping LLM backends.
///
/// The analyzer is the only caller. Implementations must honour
/// `config.timeout` and must not retry.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Execute a chat completion.
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError>;

    /// Get provider name for logging.
    fn name(&self) -> &str;
}

/// Truncate a response body for diagnostics, respecting char boundaries.
pub fn body_excerpt(body: &str) -> String {
    match body.char_indices().nth(BODY_EXCERPT_CHARS) {
        Some((idx, _)) => body[..idx].to_string(),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_chat_message_creation() {
        let system = ChatMessage::system("당신은 노동법 전문가입니다.");
        assert_eq!(system.role, "system");

        let user = ChatMessage::user("제1조 ...");
        assert_eq!(user.role, "user");
    }

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage {
            prompt_tokens: 100,
            completion_tokens: 50,
        };
        assert_eq!(usage.total(), 150);
    }

    #[test]
    fn test_completion_defaults() {
        let config = CompletionConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert!(config.json_output);
        assert!((config.temperature - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_body_excerpt_short_body_unchanged() {
        assert_eq!(body_excerpt("bad gateway"), "bad gateway");
    }

    proptest! {
        #[test]
        fn prop_body_excerpt_bounded_and_prefix(body in "\\PC{0,800}") {
            let excerpt = body_excerpt(&body);
            prop_assert!(excerpt.chars().count() <= BODY_EXCERPT_CHARS);
            prop_assert!(body.starts_with(&excerpt));
        }
    }
}
