//! In-memory providers for unit tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::providers::{
    ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError, TokenUsage,
};
use crate::retriever::{ContextRetriever, RetrievalError};

/// Provider replaying scripted outcomes in order.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
    calls: AtomicUsize,
    last_messages: Mutex<Vec<ChatMessage>>,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
            last_messages: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(content: impl Into<String>) -> Self {
        Self::new(vec![Ok(content.into())])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_messages(&self) -> Vec<ChatMessage> {
        self.last_messages.lock().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_messages.lock() = messages;

        let next = self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::HttpError("script exhausted".to_string())));

        next.map(|content| CompletionResponse {
            content,
            usage: TokenUsage::default(),
            model: config.model.clone(),
            finish_reason: Some("stop".to_string()),
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Retriever that always fails.
pub struct FailingRetriever;

#[async_trait]
impl ContextRetriever for FailingRetriever {
    async fn retrieve(&self, _contract_text: &str, _limit: usize) -> Result<String, RetrievalError> {
        Err(RetrievalError::Unavailable("index offline".to_string()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Single-finding payload for the given clause and level.
pub fn single_finding_payload(clause_number: &str, level: u8) -> String {
    let label = match level {
        2 => "고위험",
        1 => "중위험",
        _ => "저위험",
    };
    serde_json::json!({
        "analysis": [{
            "clause_number": clause_number,
            "clause_title": "기타",
            "input_text": "임신 중인 경우라도 본인의 동의가 있으면 야간근로를 실시할 수 있다.",
            "risk_level": level,
            "risk_label": label,
            "manual_reason": "임산부 야간근로는 고용노동부장관 인가 필요",
            "legal_reference": "근로기준법 제70조",
            "improvement": "임산부 야간근로 조항을 삭제하세요."
        }]
    })
    .to_string()
}
