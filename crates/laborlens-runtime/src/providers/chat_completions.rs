//! OpenAI-compatible chat-completions provider.
//!
//! Talks to any endpoint accepting the `/v1/chat/completions` request
//! shape (Together AI by default). One request per call, no retries.
//!
//! ## Security
//!
//! The bearer token is held in an [`ApiCredential`] and only exposed at
//! the point the `Authorization` header is set.

use super::{
    body_excerpt, secrets::ApiCredential, ChatMessage, CompletionConfig, CompletionResponse,
    LlmProvider, ProviderError, TokenUsage,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// HTTPS chat-completions provider.
pub struct ChatCompletionsProvider {
    credential: ApiCredential,
    endpoint: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for ChatCompletionsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsProvider")
            .field("credential", &self.credential)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl ChatCompletionsProvider {
    /// Create a provider posting to `endpoint`.
    ///
    /// `timeout` bounds the whole exchange at the client level; each
    /// request additionally applies [`CompletionConfig::timeout`].
    pub fn new(
        credential: ApiCredential,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let endpoint = endpoint.into();
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(ProviderError::NotConfigured(
                "endpoint must start with http:// or https://".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self {
            credential,
            endpoint,
            client,
        })
    }

    /// Endpoint this provider posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    type_: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl LlmProvider for ChatCompletionsProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        let request = ChatRequest {
            model: &config.model,
            messages: &messages,
            temperature: config.temperature,
            response_format: config.json_output.then_some(ResponseFormat {
                type_: "json_object",
            }),
        };

        debug!(endpoint = %self.endpoint, model = %config.model, "sending chat completion");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.credential.expose())
            .timeout(config.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(config.timeout)
                } else {
                    ProviderError::HttpError(e.to_string())
                }
            })?;

        let status = response.status();
        debug!(status = status.as_u16(), "chat completion responded");

        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(config.timeout)
            } else {
                ProviderError::HttpError(e.to_string())
            }
        })?;

        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                body: body_excerpt(&text),
            });
        }

        let body: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| ProviderError::ParseError(format!("response envelope: {}", e)))?;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::ParseError("response has no choices".to_string()))?;

        let content = choice.message.content.ok_or_else(|| {
            ProviderError::ParseError("choices[0].message.content missing".to_string())
        })?;

        Ok(CompletionResponse {
            content,
            usage: body.usage.unwrap_or_default(),
            model: body.model.unwrap_or_else(|| config.model.clone()),
            finish_reason: choice.finish_reason,
        })
    }

    fn name(&self) -> &str {
        "chat-completions"
    }
}
