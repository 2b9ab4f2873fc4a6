//! The analysis wizard as a state machine.
//!
//! ```text
//! CollectingProfile -> CollectingContract -> Analyzing -> Report
//!                                                     \-> Failed -> (retry) Analyzing
//! ```
//!
//! One analysis may be in flight per session. Each analysis is stamped
//! with the session generation; `restart` bumps the generation so a
//! result arriving afterwards is discarded instead of applied.

use parking_lot::Mutex;
use tracing::{debug, info};

use laborlens_core::{advise, ClauseFinding, ContractText, Profile, RiskReport};

use crate::analyzer::ContractAnalyzer;
use crate::error::{AnalysisError, SessionError};

/// Where the wizard currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    CollectingProfile,
    CollectingContract,
    Analyzing,
    Report,
    Failed,
}

/// Outcome of handing a result back to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result was current and the session moved to Report or Failed
    Applied,
    /// The session was restarted meanwhile; state left untouched
    Discarded,
}

/// Handle for one in-flight analysis.
#[derive(Debug)]
pub struct AnalysisTicket {
    generation: u64,
    profile: Profile,
    contract: ContractText,
}

impl AnalysisTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn contract(&self) -> &ContractText {
        &self.contract
    }
}

#[derive(Debug)]
struct SessionState {
    generation: u64,
    phase: SessionPhase,
    profile: Option<Profile>,
    contract: Option<ContractText>,
    report: Option<RiskReport>,
    last_error: Option<AnalysisError>,
}

impl SessionState {
    fn fresh(generation: u64) -> Self {
        Self {
            generation,
            phase: SessionPhase::CollectingProfile,
            profile: None,
            contract: None,
            report: None,
            last_error: None,
        }
    }

    fn ticket(&self) -> Result<AnalysisTicket, SessionError> {
        let profile = self.profile.clone().ok_or(SessionError::MissingProfile)?;
        let contract = self.contract.clone().ok_or(SessionError::MissingContract)?;
        Ok(AnalysisTicket {
            generation: self.generation,
            profile,
            contract,
        })
    }
}

/// Session-local wizard state.
#[derive(Debug)]
pub struct AnalysisSession {
    state: Mutex<SessionState>,
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SessionState::fresh(0)),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.lock().phase
    }

    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    pub fn profile(&self) -> Option<Profile> {
        self.state.lock().profile.clone()
    }

    pub fn contract(&self) -> Option<ContractText> {
        self.state.lock().contract.clone()
    }

    /// The report, once in the Report phase.
    pub fn report(&self) -> Option<RiskReport> {
        self.state.lock().report.clone()
    }

    /// The failure, once in the Failed phase.
    pub fn last_error(&self) -> Option<AnalysisError> {
        self.state.lock().last_error.clone()
    }

    /// True once both profile and contract are present and nothing is running.
    pub fn is_ready(&self) -> bool {
        let state = self.state.lock();
        state.phase == SessionPhase::CollectingContract
            && state.profile.is_some()
            && state.contract.is_some()
    }

    /// Store the worker profile, replacing any earlier one.
    pub fn submit_profile(&self, profile: Profile) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        match state.phase {
            SessionPhase::CollectingProfile | SessionPhase::CollectingContract => {
                state.profile = Some(profile);
                state.phase = SessionPhase::CollectingContract;
                Ok(())
            }
            SessionPhase::Analyzing => Err(SessionError::AnalysisInFlight),
            SessionPhase::Report | SessionPhase::Failed => Err(SessionError::RestartRequired),
        }
    }

    /// Store the contract text. Blank text is rejected.
    pub fn submit_contract(&self, text: impl Into<String>) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        match state.phase {
            SessionPhase::CollectingContract => {
                state.contract = Some(ContractText::new(text)?);
                Ok(())
            }
            SessionPhase::CollectingProfile => Err(SessionError::MissingProfile),
            SessionPhase::Analyzing => Err(SessionError::AnalysisInFlight),
            SessionPhase::Report | SessionPhase::Failed => Err(SessionError::RestartRequired),
        }
    }

    /// Enter Analyzing and hand out the ticket for this run.
    pub fn begin_analysis(&self) -> Result<AnalysisTicket, SessionError> {
        let mut state = self.state.lock();
        match state.phase {
            SessionPhase::CollectingContract => {}
            SessionPhase::Analyzing => return Err(SessionError::AnalysisInFlight),
            SessionPhase::CollectingProfile => return Err(SessionError::MissingProfile),
            SessionPhase::Report | SessionPhase::Failed => {
                return Err(SessionError::RestartRequired)
            }
        }

        let ticket = state.ticket()?;
        state.phase = SessionPhase::Analyzing;
        state.last_error = None;
        debug!(generation = ticket.generation, "analysis started");
        Ok(ticket)
    }

    /// Re-run a failed analysis with the same profile and contract.
    pub fn retry(&self) -> Result<AnalysisTicket, SessionError> {
        let mut state = self.state.lock();
        match state.phase {
            SessionPhase::Failed => {}
            SessionPhase::Analyzing => return Err(SessionError::AnalysisInFlight),
            _ => return Err(SessionError::NothingToRetry),
        }

        let ticket = state.ticket()?;
        state.phase = SessionPhase::Analyzing;
        state.last_error = None;
        debug!(generation = ticket.generation, "analysis retried");
        Ok(ticket)
    }

    /// Apply a finished analysis if its ticket is still current.
    pub fn complete(
        &self,
        ticket: AnalysisTicket,
        result: Result<Vec<ClauseFinding>, AnalysisError>,
    ) -> Completion {
        let mut state = self.state.lock();
        if ticket.generation != state.generation || state.phase != SessionPhase::Analyzing {
            info!(
                ticket_generation = ticket.generation,
                session_generation = state.generation,
                "discarding stale analysis result"
            );
            return Completion::Discarded;
        }

        match result {
            Ok(findings) => {
                let advisories = advise(&ticket.profile);
                state.report = Some(RiskReport::new(&ticket.profile, advisories, findings));
                state.phase = SessionPhase::Report;
            }
            Err(err) => {
                state.last_error = Some(err);
                state.phase = SessionPhase::Failed;
            }
        }
        Completion::Applied
    }

    /// Discard everything and return to profile collection.
    pub fn restart(&self) {
        let mut state = self.state.lock();
        let generation = state.generation + 1;
        *state = SessionState::fresh(generation);
        debug!(generation, "session restarted");
    }

    /// Run (or, from Failed, re-run) the analysis to completion.
    ///
    /// The session lock is released while the request is in flight.
    pub async fn run(&self, analyzer: &ContractAnalyzer) -> Result<Completion, SessionError> {
        let ticket = if self.phase() == SessionPhase::Failed {
            self.retry()?
        } else {
            self.begin_analysis()?
        };

        let result = analyzer
            .analyze_contract(ticket.profile(), ticket.contract())
            .await;
        Ok(self.complete(ticket, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::providers::{CompletionConfig, ProviderError};
    use crate::testing::{single_finding_payload, ScriptedProvider};
    use laborlens_core::{
        AgeBracket, DisabilityStatus, Gender, Nationality, ValidationError, WorkArrangement,
        SAMPLE_CONTRACT,
    };
    use std::sync::Arc;

    fn profile() -> Profile {
        Profile::builder()
            .nationality(Nationality::Foreign)
            .gender(Gender::Male)
            .age(AgeBracket::From18To60)
            .disability(DisabilityStatus::NotDisabled)
            .work_arrangement(WorkArrangement::ComprehensiveWage)
            .build()
            .unwrap()
    }

    fn ready_session() -> AnalysisSession {
        let session = AnalysisSession::new();
        session.submit_profile(profile()).unwrap();
        session.submit_contract(SAMPLE_CONTRACT).unwrap();
        session
    }

    #[test]
    fn test_happy_path_transitions() {
        let session = AnalysisSession::new();
        assert_eq!(session.phase(), SessionPhase::CollectingProfile);

        session.submit_profile(profile()).unwrap();
        assert_eq!(session.phase(), SessionPhase::CollectingContract);
        assert!(!session.is_ready());

        session.submit_contract(SAMPLE_CONTRACT).unwrap();
        assert!(session.is_ready());

        let ticket = session.begin_analysis().unwrap();
        assert_eq!(session.phase(), SessionPhase::Analyzing);
        assert_eq!(ticket.contract().as_str(), SAMPLE_CONTRACT);

        assert_eq!(session.complete(ticket, Ok(vec![])), Completion::Applied);
        assert_eq!(session.phase(), SessionPhase::Report);
        assert_eq!(session.report().unwrap().advisories.len(), 5);
    }

    #[test]
    fn test_contract_requires_profile() {
        let session = AnalysisSession::new();
        assert_eq!(
            session.submit_contract(SAMPLE_CONTRACT),
            Err(SessionError::MissingProfile)
        );
    }

    #[test]
    fn test_blank_contract_rejected() {
        let session = AnalysisSession::new();
        session.submit_profile(profile()).unwrap();
        assert_eq!(
            session.submit_contract("   "),
            Err(SessionError::Invalid(ValidationError::EmptyContract))
        );
        assert!(session.contract().is_none());
    }

    #[test]
    fn test_begin_without_contract_fails() {
        let session = AnalysisSession::new();
        session.submit_profile(profile()).unwrap();
        assert!(matches!(
            session.begin_analysis(),
            Err(SessionError::MissingContract)
        ));
        assert_eq!(session.phase(), SessionPhase::CollectingContract);
    }

    #[test]
    fn test_reentrant_submission_rejected() {
        let session = ready_session();
        let _ticket = session.begin_analysis().unwrap();

        assert!(matches!(
            session.begin_analysis(),
            Err(SessionError::AnalysisInFlight)
        ));
        assert_eq!(
            session.submit_contract("제1조 변경"),
            Err(SessionError::AnalysisInFlight)
        );
        assert_eq!(
            session.submit_profile(profile()),
            Err(SessionError::AnalysisInFlight)
        );
    }

    #[test]
    fn test_restart_discards_in_flight_result() {
        let session = ready_session();
        let stale = session.begin_analysis().unwrap();

        session.restart();
        assert_eq!(session.phase(), SessionPhase::CollectingProfile);
        assert!(session.profile().is_none());
        assert!(session.contract().is_none());

        assert_eq!(session.complete(stale, Ok(vec![])), Completion::Discarded);
        assert_eq!(session.phase(), SessionPhase::CollectingProfile);
        assert!(session.report().is_none());
    }

    #[test]
    fn test_stale_ticket_cannot_hijack_new_run() {
        let session = ready_session();
        let stale = session.begin_analysis().unwrap();
        session.restart();

        session.submit_profile(profile()).unwrap();
        session.submit_contract(SAMPLE_CONTRACT).unwrap();
        let current = session.begin_analysis().unwrap();

        assert_eq!(
            session.complete(stale, Err(AnalysisError::Transport("late".into()))),
            Completion::Discarded
        );
        assert_eq!(session.phase(), SessionPhase::Analyzing);
        assert_eq!(session.complete(current, Ok(vec![])), Completion::Applied);
        assert_eq!(session.phase(), SessionPhase::Report);
    }

    #[test]
    fn test_failure_then_retry_keeps_inputs() {
        let session = ready_session();
        let ticket = session.begin_analysis().unwrap();
        session.complete(ticket, Err(AnalysisError::Parse("bad".into())));

        assert_eq!(session.phase(), SessionPhase::Failed);
        assert_eq!(session.last_error().unwrap().kind(), ErrorKind::Parse);

        let retry = session.retry().unwrap();
        assert_eq!(retry.profile(), &profile());
        assert_eq!(retry.contract().as_str(), SAMPLE_CONTRACT);
        assert!(session.last_error().is_none());
    }

    #[test]
    fn test_retry_only_from_failed() {
        let session = ready_session();
        assert!(matches!(session.retry(), Err(SessionError::NothingToRetry)));
    }

    #[test]
    fn test_report_phase_requires_restart() {
        let session = ready_session();
        let ticket = session.begin_analysis().unwrap();
        session.complete(ticket, Ok(vec![]));

        assert_eq!(
            session.submit_profile(profile()),
            Err(SessionError::RestartRequired)
        );
    }

    #[tokio::test]
    async fn test_run_applies_findings() {
        let provider = Arc::new(ScriptedProvider::replying(single_finding_payload("제7조", 2)));
        let analyzer = ContractAnalyzer::new(provider, CompletionConfig::default());
        let session = ready_session();

        assert_eq!(session.run(&analyzer).await.unwrap(), Completion::Applied);
        let report = session.report().unwrap();
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.summary.high, 1);
    }

    #[tokio::test]
    async fn test_run_retries_after_failure() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(ProviderError::HttpError("connection reset".into())),
            Ok(r#"{"analysis": []}"#.to_string()),
        ]));
        let analyzer = ContractAnalyzer::new(provider.clone(), CompletionConfig::default());
        let session = ready_session();

        session.run(&analyzer).await.unwrap();
        assert_eq!(session.phase(), SessionPhase::Failed);
        assert_eq!(session.last_error().unwrap().kind(), ErrorKind::Transport);

        session.run(&analyzer).await.unwrap();
        assert_eq!(session.phase(), SessionPhase::Report);
        assert_eq!(provider.calls(), 2);
    }
}
