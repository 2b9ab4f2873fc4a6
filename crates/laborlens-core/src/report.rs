//! Report assembly: combines the profile, its advisories and the clause
//! findings into the model a presentation layer renders.
//!
//! The overall outlook follows fixed rules:
//! 1. If ANY finding is high risk → `Outlook::Alert`
//! 2. Else if ANY finding is medium risk → `Outlook::Caution`
//! 3. Else → `Outlook::Clear`

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::advisory::AdvisoryEntry;
use crate::finding::{ClauseFinding, RiskLevel};
use crate::profile::Profile;

/// Notice shown above every report.
pub const DISCLAIMER: &str = "본 인공지능은 근로계약서의 주요 조항을 자동으로 분석하여, 관련 법령 및 판례를 반영한 기준에 따른 조항별 리스크를 진단하고 개선방향을 제시하는 시스템입니다.

현재 시스템에는 근로기준법 등 일부 법률과 주요 판례만 반영된 상태이며, 사용자(사업주·근로자) 입장별 맞춤 분석 기능은 개발 중입니다. 현재 단계에서는 근로자 입장을 기준으로 위험도와 개선 방향을 산출하고 있습니다.

본 시스템은 「변호사법」 제34조 제5항 및 제109조를 준수하며, 비변호사가 법률사무를 수행하거나 이를 알선하지 않도록 설계되어 있습니다. 본 결과는 법률 자문이 아닌 참고용 분석 자료임을 고려해주시기 부탁드립니다.

계약으로 인해 실제 분쟁이 발생하여 법적 해석이 필요한 경우에는 반드시 변호사 등 법률 전문가의 자문을 받으시기 바랍니다.";

/// Overall outlook of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outlook {
    /// At least one high-risk clause
    Alert,
    /// At least one medium-risk clause, none high
    Caution,
    /// Only low-risk clauses, or none at all
    Clear,
}

/// Finding counts per risk level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskSummary {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl RiskSummary {
    pub fn from_findings(findings: &[ClauseFinding]) -> Self {
        findings.iter().fold(Self::default(), |mut acc, f| {
            acc.total += 1;
            match f.risk_level {
                RiskLevel::High => acc.high += 1,
                RiskLevel::Medium => acc.medium += 1,
                RiskLevel::Low => acc.low += 1,
            }
            acc
        })
    }

    /// Highest risk level present.
    pub fn worst(&self) -> Option<RiskLevel> {
        if self.high > 0 {
            Some(RiskLevel::High)
        } else if self.medium > 0 {
            Some(RiskLevel::Medium)
        } else if self.low > 0 {
            Some(RiskLevel::Low)
        } else {
            None
        }
    }

    pub fn outlook(&self) -> Outlook {
        match self.worst() {
            Some(RiskLevel::High) => Outlook::Alert,
            Some(RiskLevel::Medium) => Outlook::Caution,
            _ => Outlook::Clear,
        }
    }

    /// Summary line, e.g. "전체 7개 조항 | 고위험 2개 | 중위험 1개 | 저위험 4개".
    pub fn headline(&self) -> String {
        format!(
            "전체 {}개 조항 | 고위험 {}개 | 중위험 {}개 | 저위험 {}개",
            self.total, self.high, self.medium, self.low
        )
    }
}

/// Everything needed to render one analysis result.
#[derive(Debug, Clone, Serialize)]
pub struct RiskReport {
    /// Profile overview line
    pub worker: String,

    pub advisories: Vec<AdvisoryEntry>,

    /// Findings in service order
    pub findings: Vec<ClauseFinding>,

    pub summary: RiskSummary,

    pub outlook: Outlook,

    pub disclaimer: &'static str,

    pub generated_at: DateTime<Utc>,
}

impl RiskReport {
    pub fn new(profile: &Profile, advisories: Vec<AdvisoryEntry>, findings: Vec<ClauseFinding>) -> Self {
        let summary = RiskSummary::from_findings(&findings);
        Self {
            worker: profile.overview(),
            advisories,
            findings,
            outlook: summary.outlook(),
            summary,
            disclaimer: DISCLAIMER,
            generated_at: Utc::now(),
        }
    }

    /// Findings at or above the given level.
    pub fn findings_at_least(&self, level: RiskLevel) -> impl Iterator<Item = &ClauseFinding> {
        self.findings.iter().filter(move |f| f.risk_level >= level)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisory::RuleAdvisor;
    use crate::profile::{AgeBracket, DisabilityStatus, Gender, Nationality, WorkArrangement};

    fn test_profile() -> Profile {
        Profile::builder()
            .nationality(Nationality::Domestic)
            .gender(Gender::Male)
            .age(AgeBracket::From18To60)
            .disability(DisabilityStatus::NotDisabled)
            .work_arrangement(WorkArrangement::Standard)
            .build()
            .unwrap()
    }

    fn finding(number: &str, level: RiskLevel) -> ClauseFinding {
        ClauseFinding {
            clause_number: number.to_string(),
            clause_title: "조항".to_string(),
            input_text: "내용".to_string(),
            risk_level: level,
            risk_label: level.label().to_string(),
            manual_reason: "판단".to_string(),
            legal_reference: "근로기준법 제17조".to_string(),
            improvement: "개선".to_string(),
        }
    }

    #[test]
    fn test_any_high_yields_alert() {
        let findings = vec![
            finding("제1조", RiskLevel::Low),
            finding("제2조", RiskLevel::High),
            finding("제3조", RiskLevel::Medium),
        ];
        let report = RiskReport::new(&test_profile(), vec![], findings);
        assert_eq!(report.outlook, Outlook::Alert);
        assert_eq!(
            report.summary,
            RiskSummary {
                total: 3,
                high: 1,
                medium: 1,
                low: 1
            }
        );
    }

    #[test]
    fn test_medium_without_high_yields_caution() {
        let findings = vec![finding("제1조", RiskLevel::Medium), finding("제2조", RiskLevel::Low)];
        let report = RiskReport::new(&test_profile(), vec![], findings);
        assert_eq!(report.outlook, Outlook::Caution);
    }

    #[test]
    fn test_empty_findings_are_clear() {
        let report = RiskReport::new(&test_profile(), vec![], vec![]);
        assert_eq!(report.outlook, Outlook::Clear);
        assert_eq!(report.summary.worst(), None);
        assert_eq!(report.summary.headline(), "전체 0개 조항 | 고위험 0개 | 중위험 0개 | 저위험 0개");
    }

    #[test]
    fn test_findings_keep_service_order() {
        let findings = vec![
            finding("제7조", RiskLevel::High),
            finding("제1조", RiskLevel::Low),
            finding("제4조", RiskLevel::Medium),
        ];
        let report = RiskReport::new(&test_profile(), vec![], findings);
        let order: Vec<&str> = report.findings.iter().map(|f| f.clause_number.as_str()).collect();
        assert_eq!(order, vec!["제7조", "제1조", "제4조"]);

        let flagged: Vec<&str> = report
            .findings_at_least(RiskLevel::Medium)
            .map(|f| f.clause_number.as_str())
            .collect();
        assert_eq!(flagged, vec!["제7조", "제4조"]);
    }

    #[test]
    fn test_disclaimer_has_four_paragraphs() {
        let paragraphs: Vec<&str> = DISCLAIMER.split("\n\n").collect();
        assert_eq!(paragraphs.len(), 4);
        assert!(paragraphs[1].contains("사용자(사업주·근로자) 입장별 맞춤 분석 기능은 개발 중입니다."));
        assert!(paragraphs[2].ends_with("참고용 분석 자료임을 고려해주시기 부탁드립니다."));
        assert!(paragraphs[3].starts_with("계약으로 인해 실제 분쟁이 발생하여"));
    }

    #[test]
    fn test_report_serializes_with_advisories() {
        let profile = test_profile();
        let advisories = RuleAdvisor::new().evaluate(&profile);
        let report = RiskReport::new(&profile, advisories, vec![finding("제6조", RiskLevel::High)]);
        let json: serde_json::Value = serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["outlook"], "alert");
        assert_eq!(json["advisories"].as_array().unwrap().len(), 5);
        assert_eq!(json["findings"][0]["risk_level"], 2);
        assert!(json["disclaimer"].as_str().unwrap().contains("변호사법"));
    }
}
