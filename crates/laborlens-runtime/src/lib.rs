//! # laborlens-runtime
//!
//! LLM-backed clause review for laborlens.
//!
//! This crate sends a contract, the worker profile and the labeling
//! manual to a chat-completions service and turns the answer into
//! validated [`ClauseFinding`](laborlens_core::ClauseFinding)s.
//!
//! ## Important
//!
//! The deterministic parts (advisories, manual, finding invariants) live
//! in `laborlens-core`. This crate adds the network call and nothing
//! else: no retries, no caching, no partial results.
//!
//! ## Example
//!
//! ```rust,ignore
//! use laborlens_runtime::{AnalysisSession, ContractAnalyzer};
//!
//! let analyzer = ContractAnalyzer::from_env()?;
//! let session = AnalysisSession::new();
//!
//! session.submit_profile(profile)?;
//! session.submit_contract(contract_text)?;
//! session.run(&analyzer).await?;
//!
//! if let Some(report) = session.report() {
//!     println!("{}", report.summary.headline());
//! }
//! ```

pub mod analyzer;
pub mod config;
pub mod error;
pub mod prompts;
pub mod providers;
pub mod retriever;
pub mod schema;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use analyzer::{parse_analysis, AnalysisRequest, ContractAnalyzer};
pub use config::AnalyzerConfig;
pub use error::{AnalysisError, ErrorKind, SessionError};
pub use providers::{
    ApiCredential, ChatMessage, CompletionConfig, CompletionResponse, CredentialSource,
    LlmProvider, ProviderError, TokenUsage,
};
pub use retriever::{ContextRetriever, NoContextRetriever, RetrievalError, StaticContextRetriever};
pub use schema::SchemaError;
pub use session::{AnalysisSession, AnalysisTicket, Completion, SessionPhase};

#[cfg(feature = "http")]
pub use providers::ChatCompletionsProvider;
