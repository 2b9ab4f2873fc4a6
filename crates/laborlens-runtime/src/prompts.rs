//! Instruction prompt for the clause reviewer.
//!
//! The system message is assembled from fixed sections plus per-request
//! content:
//! 1. Role and manual-first framing - fixed
//! 2. Worker profile - per request
//! 3. Labeling manual - verbatim, in full
//! 4. Retrieved statutory context - per request, possibly empty
//! 5. Directives and output format - fixed
//! 6. Maternity scrutiny - only for pregnant or postpartum workers
//!
//! The contract text travels alone in the user message.

use laborlens_core::{ClauseCategory, ContractText, ManualCatalogue, Profile};

use crate::providers::ChatMessage;

/// Role framing. The manual outranks the model's own knowledge.
pub const ROLE_PROMPT: &str = "당신은 대한민국 노동법 전문 변호사입니다.
계약서 분석 시 아래 '라벨링 메뉴얼'을 최우선 기준으로 삼으시기 바랍니다.";

/// Heading for the retrieved context section.
pub const CONTEXT_HEADING: &str = "[참고 법령 DB 검색 결과]";

/// Review directives.
pub const DIRECTIVES_PROMPT: &str = "[필수 지시사항]
1. 계약서의 각 조항을 '라벨링 메뉴얼'과 대조하세요.
2. 메뉴얼에 명시된 위험도(고/중/저)를 그대로 따르세요. 메뉴얼의 판단이 우선입니다.
3. 메뉴얼에 해당하지 않는 내용은 법령과 DB 검색 결과에 근거하여 판단하세요.
4. 반드시 각 조항에 대해 구체적인 '법령 근거'를 명시하세요. 근거를 빈 값으로 두지 마세요.
5. 출력은 반드시 JSON 형식이어야 합니다.";

/// Output contract. Mirrors `schema/analysis.schema.json`.
pub const OUTPUT_FORMAT_PROMPT: &str = r#"출력 JSON 스키마:
{
    "analysis": [
        {
            "clause_number": "제O조",
            "clause_title": "조항 제목",
            "input_text": "입력된 조항 내용",
            "risk_level": 2,
            "risk_label": "고위험",
            "manual_reason": "라벨링 메뉴얼에 따른 판단 이유",
            "legal_reference": "근로기준법 제OO조, 근로기준법 시행령 제OO조 등 구체적 법령",
            "improvement": "개선 방안 (고위험/중위험일 경우 필수 작성)"
        }
    ]
}

주의사항:
- 출력은 하나의 JSON 객체이며, 최상위 키는 "analysis" 배열 하나뿐입니다.
- risk_level: 2(고위험), 1(중위험), 0(저위험)
- risk_label은 risk_level과 일치해야 합니다.
- legal_reference 필드는 절대 비워두지 마세요. 반드시 구체적인 법령 조항을 명시하세요.
- 고위험/중위험 조항은 improvement를 반드시 작성하세요."#;

/// Worker profile section.
pub fn profile_section(profile: &Profile) -> String {
    format!(
        "[근로자 프로필]
- 국적: {}
- 성별/임신여부: {} / {}
- 나이: {}
- 장애여부: {}
- 근무형태: {}",
        profile.nationality().label(),
        profile.gender().label(),
        profile.pregnancy().label(),
        profile.age().label(),
        profile.disability().label(),
        profile.work_arrangement().label(),
    )
}

/// Extra scrutiny line, present only for pregnant or postpartum workers.
pub fn maternity_directive(profile: &Profile) -> Option<String> {
    if !profile.is_pregnant_or_postpartum() {
        return None;
    }
    let headings: Vec<&str> = ClauseCategory::ALL
        .iter()
        .filter(|c| c.is_maternity_sensitive())
        .map(|c| c.heading())
        .collect();
    Some(format!(
        "- 임산부 근로자의 경우 다음 조항은 특히 주의깊게 검토하세요: {}",
        headings.join(", ")
    ))
}

/// Full system message.
pub fn build_system_prompt(profile: &Profile, manual: &ManualCatalogue, context: &str) -> String {
    let mut prompt = String::with_capacity(manual.text().len() + 4096);

    prompt.push_str(ROLE_PROMPT);
    prompt.push_str("\n\n");
    prompt.push_str(&profile_section(profile));
    prompt.push_str("\n\n");
    prompt.push_str(manual.text());
    prompt.push_str("\n\n");
    prompt.push_str(CONTEXT_HEADING);
    prompt.push('\n');
    prompt.push_str(context);
    prompt.push_str("\n\n");
    prompt.push_str(DIRECTIVES_PROMPT);
    prompt.push_str("\n\n");
    prompt.push_str(OUTPUT_FORMAT_PROMPT);

    if let Some(directive) = maternity_directive(profile) {
        prompt.push('\n');
        prompt.push_str(&directive);
    }

    prompt
}

/// System and user messages for one analysis.
pub fn build_messages(
    profile: &Profile,
    manual: &ManualCatalogue,
    context: &str,
    contract: &ContractText,
) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(build_system_prompt(profile, manual, context)),
        ChatMessage::user(contract.as_str()),
    ]
}
