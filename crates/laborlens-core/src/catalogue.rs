//! The labeling manual: authoritative risk-classification rules per
//! contract clause category.
//!
//! The manual is an opaque, versioned artifact embedded at compile time.
//! It is forwarded verbatim and in full with every analysis request and is
//! never rewritten or partially included.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Embedded manual text (loaded at compile time).
const MANUAL_TEXT: &str = include_str!("../manual/labeling-manual.txt");

/// Version of the embedded manual.
pub const MANUAL_VERSION: &str = "2025.1";

lazy_static! {
    static ref HEADING: Regex = Regex::new(r"【([^】]+)】").unwrap();
}

/// Clause categories covered by the manual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClauseCategory {
    StartDateAndTerm,
    WorkLocation,
    JobDuties,
    WorkingAndRestHours,
    WorkDaysAndHolidays,
    Wages,
    AnnualLeave,
    SocialInsurance,
    OtherTerminationDiscipline,
}

impl ClauseCategory {
    pub const ALL: [ClauseCategory; 9] = [
        ClauseCategory::StartDateAndTerm,
        ClauseCategory::WorkLocation,
        ClauseCategory::JobDuties,
        ClauseCategory::WorkingAndRestHours,
        ClauseCategory::WorkDaysAndHolidays,
        ClauseCategory::Wages,
        ClauseCategory::AnnualLeave,
        ClauseCategory::SocialInsurance,
        ClauseCategory::OtherTerminationDiscipline,
    ];

    /// Section heading as written in the manual.
    pub fn heading(&self) -> &'static str {
        match self {
            ClauseCategory::StartDateAndTerm => "제1조 근로개시일/계약기간",
            ClauseCategory::WorkLocation => "제2조 근무장소",
            ClauseCategory::JobDuties => "제3조 업무의 내용",
            ClauseCategory::WorkingAndRestHours => "제4조 근로시간/휴게시간",
            ClauseCategory::WorkDaysAndHolidays => "제5조 근무일/휴일",
            ClauseCategory::Wages => "제6조 임금",
            ClauseCategory::AnnualLeave => "제7조 연차유급휴가",
            ClauseCategory::SocialInsurance => "제8조 사회보험",
            ClauseCategory::OtherTerminationDiscipline => "제11조 기타/해고/징계",
        }
    }

    /// Categories that need heightened scrutiny for pregnant or
    /// postpartum workers.
    pub fn is_maternity_sensitive(&self) -> bool {
        matches!(
            self,
            ClauseCategory::JobDuties | ClauseCategory::WorkingAndRestHours | ClauseCategory::Wages
        )
    }
}

/// Immutable handle to a version of the labeling manual.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualCatalogue {
    version: &'static str,
    text: &'static str,
}

impl ManualCatalogue {
    /// The manual shipped with this crate.
    pub fn current() -> Self {
        Self {
            version: MANUAL_VERSION,
            text: MANUAL_TEXT,
        }
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    /// The full manual text, unmodified.
    pub fn text(&self) -> &'static str {
        self.text
    }

    /// Section headings in document order.
    pub fn headings(&self) -> Vec<&'static str> {
        HEADING
            .captures_iter(self.text)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect()
    }
}

impl Default for ManualCatalogue {
    fn default() -> Self {
        Self::current()
    }
}
