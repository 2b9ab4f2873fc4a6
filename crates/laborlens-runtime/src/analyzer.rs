//! Contract analysis against the remote reviewer.
//!
//! One analysis is one request:
//! 1. Validate the contract text (no network on failure)
//! 2. Retrieve supplementary context (failure degrades to none)
//! 3. Build the instruction and content messages
//! 4. Send once, bounded by the configured timeout
//! 5. Validate the payload against the schema, then each finding
//!
//! Any failure in step 5 rejects the whole response. Partial results are
//! never returned.

use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use laborlens_core::{
    advise, ClauseFinding, ContractText, ManualCatalogue, Profile, RiskReport,
};

use crate::config::DEFAULT_CONTEXT_LIMIT;
use crate::error::AnalysisError;
use crate::prompts;
use crate::providers::{ChatMessage, CompletionConfig, LlmProvider};
use crate::retriever::{ContextRetriever, NoContextRetriever};
use crate::schema;

#[cfg(feature = "http")]
use crate::config::AnalyzerConfig;
#[cfg(feature = "http")]
use crate::providers::ChatCompletionsProvider;

/// Everything sent for one analysis. Built fresh per submission.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub profile: Profile,
    pub manual: ManualCatalogue,
    pub context: String,
    pub contract: ContractText,
}

impl AnalysisRequest {
    pub fn new(
        profile: Profile,
        manual: ManualCatalogue,
        context: impl Into<String>,
        contract: ContractText,
    ) -> Self {
        Self {
            profile,
            manual,
            context: context.into(),
            contract,
        }
    }

    /// System and user messages for this request.
    pub fn messages(&self) -> Vec<ChatMessage> {
        prompts::build_messages(&self.profile, &self.manual, &self.context, &self.contract)
    }
}

#[derive(Debug, Deserialize)]
struct AnalysisPayload {
    analysis: Vec<ClauseFinding>,
}

/// Parse the reviewer's message content into findings.
///
/// The content must be a JSON object matching the analysis schema, and
/// every finding must pass [`ClauseFinding::validate`].
pub fn parse_analysis(content: &str) -> Result<Vec<ClauseFinding>, AnalysisError> {
    let value: serde_json::Value = serde_json::from_str(content)
        .map_err(|e| AnalysisError::Parse(format!("content is not JSON: {}", e)))?;

    schema::validate_analysis(&value).map_err(|e| AnalysisError::Parse(e.to_string()))?;

    let payload: AnalysisPayload = serde_json::from_value(value)
        .map_err(|e| AnalysisError::Parse(format!("analysis payload: {}", e)))?;

    for (index, finding) in payload.analysis.iter().enumerate() {
        finding
            .validate()
            .map_err(|e| AnalysisError::Parse(format!("analysis[{}]: {}", index, e)))?;
    }

    Ok(payload.analysis)
}

/// Sends contracts to the reviewer and returns validated findings.
pub struct ContractAnalyzer {
    provider: Arc<dyn LlmProvider>,
    retriever: Arc<dyn ContextRetriever>,
    manual: ManualCatalogue,
    completion: CompletionConfig,
    context_limit: usize,
}

impl std::fmt::Debug for ContractAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractAnalyzer")
            .field("provider", &self.provider.name())
            .field("retriever", &self.retriever.name())
            .field("manual", &self.manual.version())
            .field("completion", &self.completion)
            .field("context_limit", &self.context_limit)
            .finish()
    }
}

impl ContractAnalyzer {
    /// Analyzer over an arbitrary provider, with no context retrieval.
    pub fn new(provider: Arc<dyn LlmProvider>, completion: CompletionConfig) -> Self {
        Self {
            provider,
            retriever: Arc::new(NoContextRetriever),
            manual: ManualCatalogue::current(),
            completion,
            context_limit: DEFAULT_CONTEXT_LIMIT,
        }
    }

    /// Analyzer posting to the configured chat-completions endpoint.
    #[cfg(feature = "http")]
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        let provider = ChatCompletionsProvider::new(
            config.credential.clone(),
            config.endpoint.clone(),
            config.timeout,
        )?;
        Ok(Self::new(Arc::new(provider), config.completion()).with_context_limit(config.context_limit))
    }

    /// Analyzer configured from the process environment.
    #[cfg(feature = "http")]
    pub fn from_env() -> Result<Self, AnalysisError> {
        Self::from_config(&AnalyzerConfig::from_env()?)
    }

    pub fn with_retriever(mut self, retriever: Arc<dyn ContextRetriever>) -> Self {
        self.retriever = retriever;
        self
    }

    pub fn with_manual(mut self, manual: ManualCatalogue) -> Self {
        self.manual = manual;
        self
    }

    pub fn with_context_limit(mut self, limit: usize) -> Self {
        self.context_limit = limit;
        self
    }

    pub fn manual(&self) -> &ManualCatalogue {
        &self.manual
    }

    pub fn completion(&self) -> &CompletionConfig {
        &self.completion
    }

    /// Analyze raw contract text for the given worker.
    pub async fn analyze(
        &self,
        profile: &Profile,
        contract_text: &str,
    ) -> Result<Vec<ClauseFinding>, AnalysisError> {
        let contract = ContractText::new(contract_text)?;
        self.analyze_contract(profile, &contract).await
    }

    /// Analyze already-validated contract text.
    pub async fn analyze_contract(
        &self,
        profile: &Profile,
        contract: &ContractText,
    ) -> Result<Vec<ClauseFinding>, AnalysisError> {
        let context = self.retrieve_context(contract).await;
        let request = AnalysisRequest::new(profile.clone(), self.manual, context, contract.clone());

        info!(
            provider = self.provider.name(),
            model = %self.completion.model,
            manual_version = self.manual.version(),
            clauses = contract.clause_numbers().len(),
            "dispatching contract analysis"
        );

        let response = self
            .provider
            .complete(request.messages(), &self.completion)
            .await?;

        debug!(
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            finish_reason = ?response.finish_reason,
            "analysis response received"
        );

        let findings = parse_analysis(&response.content)?;
        info!(findings = findings.len(), "contract analysis parsed");
        Ok(findings)
    }

    /// Analyze and assemble the full report, advisories included.
    pub async fn report(
        &self,
        profile: &Profile,
        contract_text: &str,
    ) -> Result<RiskReport, AnalysisError> {
        let findings = self.analyze(profile, contract_text).await?;
        Ok(RiskReport::new(profile, advise(profile), findings))
    }

    async fn retrieve_context(&self, contract: &ContractText) -> String {
        match self
            .retriever
            .retrieve(contract.as_str(), self.context_limit)
            .await
        {
            Ok(context) => context,
            Err(e) => {
                warn!(
                    retriever = self.retriever.name(),
                    error = %e,
                    "context retrieval failed, continuing without context"
                );
                String::new()
            }
        }
    }
}
