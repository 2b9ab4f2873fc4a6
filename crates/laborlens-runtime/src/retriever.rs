//! Supplementary statutory context for the reviewer.
//!
//! A retriever returns free text to append to the instruction prompt.
//! An empty string means "no additional context". Retrieval is advisory:
//! the analyzer logs a failure and carries on with no context.

use async_trait::async_trait;
use thiserror::Error;

/// Retrieval failure. Never surfaced to analyzer callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RetrievalError {
    #[error("Context source unavailable: {0}")]
    Unavailable(String),

    #[error("Context lookup failed: {0}")]
    Lookup(String),
}

/// Source of statutory context relevant to a contract.
#[async_trait]
pub trait ContextRetriever: Send + Sync {
    /// Context for `contract_text`, using at most `limit` results.
    async fn retrieve(&self, contract_text: &str, limit: usize) -> Result<String, RetrievalError>;

    /// Get retriever name for logging.
    fn name(&self) -> &str;
}

/// Retriever that never has anything to add.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContextRetriever;

#[async_trait]
impl ContextRetriever for NoContextRetriever {
    async fn retrieve(&self, _contract_text: &str, _limit: usize) -> Result<String, RetrievalError> {
        Ok(String::new())
    }

    fn name(&self) -> &str {
        "none"
    }
}

/// Retriever returning fixed text regardless of the contract.
#[derive(Debug, Clone, Default)]
pub struct StaticContextRetriever {
    context: String,
}

impl StaticContextRetriever {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
        }
    }
}

#[async_trait]
impl ContextRetriever for StaticContextRetriever {
    async fn retrieve(&self, _contract_text: &str, _limit: usize) -> Result<String, RetrievalError> {
        Ok(self.context.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_context_is_empty() {
        let context = NoContextRetriever.retrieve("제1조 ...", 5).await.unwrap();
        assert!(context.is_empty());
    }

    #[tokio::test]
    async fn test_static_context_ignores_contract() {
        let retriever = StaticContextRetriever::new("근로기준법 제17조 (근로조건의 명시)");
        let a = retriever.retrieve("제1조", 5).await.unwrap();
        let b = retriever.retrieve("제2조", 1).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(retriever.name(), "static");
    }
}
