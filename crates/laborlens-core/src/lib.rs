//! # laborlens-core
//!
//! Deterministic building blocks for employment contract risk review.
//!
//! This crate answers, without any network access:
//! - Which statutory protections apply to this worker?
//! - Which rules must the clause reviewer apply?
//! - Is a clause finding returned by the reviewer well-formed?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same profile always produces the same advisories
//! 2. **No LLM calls**: Advisories come from a static rule table
//! 3. **Verbatim manual**: The labeling manual is never rewritten
//!
//! ## Example
//!
//! ```rust
//! use laborlens_core::{advise, AgeBracket, DisabilityStatus, Gender, Nationality, Profile, WorkArrangement};
//!
//! let profile = Profile::builder()
//!     .nationality(Nationality::Foreign)
//!     .gender(Gender::Male)
//!     .age(AgeBracket::From18To60)
//!     .disability(DisabilityStatus::NotDisabled)
//!     .work_arrangement(WorkArrangement::ComprehensiveWage)
//!     .build()
//!     .unwrap();
//!
//! for entry in advise(&profile) {
//!     println!("{}: {}", entry.condition_code, entry.summary);
//! }
//! ```

pub mod advisory;
pub mod catalogue;
pub mod contract;
pub mod finding;
pub mod profile;
pub mod report;

// Re-export main types at crate root
pub use advisory::{AdvisoryEntry, AdvisoryTable, RuleAdvisor, RuleGroup};
pub use catalogue::{ClauseCategory, ManualCatalogue, MANUAL_VERSION};
pub use contract::{ContractText, SAMPLE_CONTRACT};
pub use finding::{ClauseFinding, FindingError, RiskLevel};
pub use profile::{
    AgeBracket, DisabilityStatus, Gender, Nationality, PregnancyStatus, Profile, ProfileBuilder,
    ProfileField, WorkArrangement,
};
pub use report::{Outlook, RiskReport, RiskSummary, DISCLAIMER};

use thiserror::Error;

/// Input that cannot be analysed yet. Always recoverable by completing
/// the form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Profile incomplete, missing: {}", join_fields(.0))]
    IncompleteProfile(Vec<ProfileField>),

    #[error("Contract text is empty")]
    EmptyContract,
}

fn join_fields(fields: &[ProfileField]) -> String {
    fields
        .iter()
        .map(|f| f.prompt())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Advisory entries for a profile using the built-in rule table.
///
/// This is the main entry point for profile-based guidance.
pub fn advise(profile: &Profile) -> Vec<AdvisoryEntry> {
    RuleAdvisor::new().evaluate(profile)
}
