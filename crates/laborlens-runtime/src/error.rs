//! Error taxonomy surfaced to callers of the runtime.

use laborlens_core::{FindingError, ValidationError};
use thiserror::Error;

use crate::providers::ProviderError;

/// Coarse classification of an [`AnalysisError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Validation,
    Transport,
    Service,
    Parse,
}

/// Everything that can go wrong while analysing a contract.
///
/// None of these are retried automatically. The caller decides whether
/// to offer a retry, using [`AnalysisError::guidance`] for the message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// Missing or invalid credential/endpoint. Fatal at startup.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input rejected before any network call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Connection failure or timeout.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("Service error: status {status}: {body_excerpt}")]
    Service { status: u16, body_excerpt: String },

    /// The service answered, but not with a usable analysis.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl AnalysisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::Configuration(_) => ErrorKind::Configuration,
            AnalysisError::Validation(_) => ErrorKind::Validation,
            AnalysisError::Transport(_) => ErrorKind::Transport,
            AnalysisError::Service { .. } => ErrorKind::Service,
            AnalysisError::Parse(_) => ErrorKind::Parse,
        }
    }

    /// User-displayable hint for this failure.
    pub fn guidance(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Configuration => {
                "분석 서비스 API 키가 설정되지 않았습니다. TOGETHER_API_KEY 환경 변수를 설정한 뒤 다시 시작하세요."
            }
            ErrorKind::Validation => "입력되지 않은 항목이 있습니다. 모든 항목을 입력한 뒤 다시 시도하세요.",
            ErrorKind::Transport => "분석 서비스에 연결하지 못했습니다. 잠시 후 다시 시도하세요.",
            ErrorKind::Service => "분석 서비스가 요청을 처리하지 못했습니다. 잠시 후 다시 시도하세요.",
            ErrorKind::Parse => "분석 결과를 해석하지 못했습니다. 다시 시도하세요.",
        }
    }
}

impl From<ProviderError> for AnalysisError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::HttpError(msg) => AnalysisError::Transport(msg),
            ProviderError::Timeout(after) => {
                AnalysisError::Transport(format!("timed out after {:?}", after))
            }
            ProviderError::ApiError { status, body } => AnalysisError::Service {
                status,
                body_excerpt: body,
            },
            ProviderError::ParseError(msg) => AnalysisError::Parse(msg),
            ProviderError::NotConfigured(msg) => AnalysisError::Configuration(msg),
        }
    }
}

impl From<FindingError> for AnalysisError {
    fn from(err: FindingError) -> Self {
        AnalysisError::Parse(err.to_string())
    }
}

/// Misuse of the analysis session state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("An analysis is already in flight")]
    AnalysisInFlight,

    #[error("No profile has been submitted")]
    MissingProfile,

    #[error("No contract has been submitted")]
    MissingContract,

    #[error("No failed analysis to retry")]
    NothingToRetry,

    #[error("Analysis finished; restart the session to change inputs")]
    RestartRequired,

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}
