//! Per-clause risk findings returned by the analysis service.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Ordinal risk level. The service encodes it as 2/1/0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Number", into = "u8")]
pub enum RiskLevel {
    Low = 0,
    Medium = 1,
    High = 2,
}

impl RiskLevel {
    /// Canonical Korean label, e.g. "고위험".
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "저위험",
            RiskLevel::Medium => "중위험",
            RiskLevel::High => "고위험",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "저위험" => Some(RiskLevel::Low),
            "중위험" => Some(RiskLevel::Medium),
            "고위험" => Some(RiskLevel::High),
            _ => None,
        }
    }

    /// Whether a finding at this level must carry an improvement.
    pub fn requires_improvement(&self) -> bool {
        *self > RiskLevel::Low
    }
}

impl TryFrom<u8> for RiskLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RiskLevel::Low),
            1 => Ok(RiskLevel::Medium),
            2 => Ok(RiskLevel::High),
            other => Err(format!("risk_level must be 0, 1 or 2 (got {})", other)),
        }
    }
}

/// JSON numbers such as `2.0` are accepted when they are whole.
impl TryFrom<serde_json::Number> for RiskLevel {
    type Error = String;

    fn try_from(value: serde_json::Number) -> Result<Self, Self::Error> {
        let whole = match (value.as_u64(), value.as_f64()) {
            (Some(n), _) => Some(n),
            (None, Some(f)) if f >= 0.0 && f.fract() == 0.0 && f <= u8::MAX as f64 => Some(f as u64),
            _ => None,
        };
        match whole.and_then(|n| u8::try_from(n).ok()) {
            Some(n) => RiskLevel::try_from(n),
            None => Err(format!("risk_level must be 0, 1 or 2 (got {})", value)),
        }
    }
}

impl From<RiskLevel> for u8 {
    fn from(level: RiskLevel) -> Self {
        level as u8
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Invariant violations in a single finding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FindingError {
    #[error("risk_label '{label}' does not match risk_level {level} ({expected})")]
    LabelMismatch {
        level: u8,
        label: String,
        expected: &'static str,
    },

    #[error("legal_reference is empty")]
    MissingLegalReference,

    #[error("improvement is required for risk level {0}")]
    MissingImprovement(u8),
}

/// One clause assessment, in the order the service returned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClauseFinding {
    /// e.g. "제6조"
    pub clause_number: String,

    pub clause_title: String,

    /// Clause text as submitted
    pub input_text: String,

    pub risk_level: RiskLevel,

    /// Must agree with `risk_level`
    pub risk_label: String,

    /// Reasoning based on the labeling manual
    pub manual_reason: String,

    /// Statutory basis, never empty
    pub legal_reference: String,

    /// Required when `risk_level` is medium or high
    #[serde(default)]
    pub improvement: String,
}

impl ClauseFinding {
    /// Check the finding's invariants.
    pub fn validate(&self) -> Result<(), FindingError> {
        if RiskLevel::from_label(&self.risk_label) != Some(self.risk_level) {
            return Err(FindingError::LabelMismatch {
                level: self.risk_level.into(),
                label: self.risk_label.clone(),
                expected: self.risk_level.label(),
            });
        }

        if self.legal_reference.trim().is_empty() {
            return Err(FindingError::MissingLegalReference);
        }

        if self.risk_level.requires_improvement() && self.improvement.trim().is_empty() {
            return Err(FindingError::MissingImprovement(self.risk_level.into()));
        }

        Ok(())
    }

    /// The improvement text, only when it is relevant to show.
    pub fn displayed_improvement(&self) -> Option<&str> {
        if self.risk_level.requires_improvement() && !self.improvement.trim().is_empty() {
            Some(&self.improvement)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(level: RiskLevel, label: &str) -> ClauseFinding {
        ClauseFinding {
            clause_number: "제6조".to_string(),
            clause_title: "임금".to_string(),
            input_text: "시급 12,000원으로 하며 매월 25일에 지급한다.".to_string(),
            risk_level: level,
            risk_label: label.to_string(),
            manual_reason: "임금 지급 주기 준수".to_string(),
            legal_reference: "근로기준법 제43조".to_string(),
            improvement: "지급일을 명확히 유지".to_string(),
        }
    }

    #[test]
    fn test_valid_finding() {
        assert!(finding(RiskLevel::High, "고위험").validate().is_ok());
        assert!(finding(RiskLevel::Low, "저위험").validate().is_ok());
    }

    #[test]
    fn test_label_must_match_level() {
        let err = finding(RiskLevel::High, "중위험").validate().unwrap_err();
        assert_eq!(
            err,
            FindingError::LabelMismatch {
                level: 2,
                label: "중위험".to_string(),
                expected: "고위험",
            }
        );
    }

    #[test]
    fn test_blank_legal_reference_rejected() {
        let mut f = finding(RiskLevel::Low, "저위험");
        f.legal_reference = "  ".to_string();
        assert_eq!(f.validate(), Err(FindingError::MissingLegalReference));
    }

    #[test]
    fn test_improvement_required_above_low() {
        let mut f = finding(RiskLevel::Medium, "중위험");
        f.improvement.clear();
        assert_eq!(f.validate(), Err(FindingError::MissingImprovement(1)));

        let mut low = finding(RiskLevel::Low, "저위험");
        low.improvement.clear();
        assert!(low.validate().is_ok());
        assert_eq!(low.displayed_improvement(), None);
    }

    #[test]
    fn test_risk_level_wire_format() {
        let f: ClauseFinding = serde_json::from_value(serde_json::json!({
            "clause_number": "제4조",
            "clause_title": "근로시간",
            "input_text": "09:00부터 18:00까지",
            "risk_level": 1,
            "risk_label": "중위험",
            "manual_reason": "휴게시간 확인 필요",
            "legal_reference": "근로기준법 제54조",
            "improvement": "휴게시간을 명시"
        }))
        .unwrap();
        assert_eq!(f.risk_level, RiskLevel::Medium);
        assert_eq!(serde_json::to_value(f.risk_level).unwrap(), 1);

        let bad = serde_json::from_value::<ClauseFinding>(serde_json::json!({
            "clause_number": "제4조",
            "clause_title": "근로시간",
            "input_text": "",
            "risk_level": 3,
            "risk_label": "고위험",
            "manual_reason": "",
            "legal_reference": "근로기준법 제50조"
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn test_risk_level_accepts_whole_floats_only() {
        assert_eq!(serde_json::from_str::<RiskLevel>("2.0").unwrap(), RiskLevel::High);
        assert_eq!(serde_json::from_str::<RiskLevel>("0").unwrap(), RiskLevel::Low);

        let fractional = serde_json::from_str::<RiskLevel>("1.5").unwrap_err();
        assert!(fractional.to_string().contains("risk_level must be 0, 1 or 2"));
        assert!(serde_json::from_str::<RiskLevel>("-1").is_err());
        assert!(serde_json::from_str::<RiskLevel>("\"2\"").is_err());
    }

    #[test]
    fn test_levels_are_ordered() {
        assert!(RiskLevel::High > RiskLevel::Medium);
        assert!(RiskLevel::Medium > RiskLevel::Low);
        assert!(!RiskLevel::Low.requires_improvement());
    }
}
