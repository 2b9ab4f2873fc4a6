//! Employment contract text submitted for analysis.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::ValidationError;

lazy_static! {
    // Clause headings such as "제6조" or "제 11 조"
    static ref CLAUSE_HEADING: Regex = Regex::new(r"제\s*(\d+)\s*조").unwrap();
}

/// Example contract offered by the input form.
pub const SAMPLE_CONTRACT: &str = "제1조 (근로개시일) 2025년 7월 3일부터 근무를 시작한다.
제2조 (근무장소) 갑의 사업장 내 지정된 장소.
제3조 (업무의 내용) 항만 하역 업무 및 중량물 취급.
제4조 (근로시간) 09:00부터 18:00까지로 하며 휴게시간은 점심시간 1시간으로 한다.
제5조 (근무일) 매주 월~토요일 근무하며, 토요일은 무급으로 한다.
제6조 (임금) 시급 12,000원으로 하며 매월 25일에 지급한다.
제7조 (기타) 임신 중인 경우라도 본인의 동의가 있으면 야간근로를 실시할 수 있다.";

/// Non-blank contract text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ContractText(String);

impl ContractText {
    /// Accept contract text, rejecting empty or whitespace-only input.
    pub fn new(text: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyContract);
        }
        Ok(Self(text))
    }

    /// The bundled example contract.
    pub fn sample() -> Self {
        Self(SAMPLE_CONTRACT.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Article numbers found in the text, in order of appearance.
    pub fn clause_numbers(&self) -> Vec<u32> {
        CLAUSE_HEADING
            .captures_iter(&self.0)
            .filter_map(|c| c.get(1).and_then(|m| m.as_str().parse().ok()))
            .collect()
    }
}

impl AsRef<str> for ContractText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
