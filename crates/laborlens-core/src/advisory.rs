//! Rule-based legal advisories derived from the worker profile.
//!
//! Six rule groups are evaluated independently and always in the same
//! order:
//!
//! | Order | Group | Reads |
//! |-------|-------|-------|
//! | 1 | Nationality | `nationality` |
//! | 2 | Gender | `gender` |
//! | 3 | Pregnancy overlay | `gender`, then `pregnancy` for female workers only |
//! | 4 | Age | `age` |
//! | 5 | Disability | `disability` |
//! | 6 | Work arrangement | `work_arrangement` |
//!
//! Each group selects a value code from the profile and looks it up in an
//! advisory table. A code with no table row yields no entry; that is "no
//! finding", never an error. Groups never suppress one another.

use std::borrow::Cow;
use std::collections::BTreeMap;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::profile::{Gender, PregnancyStatus, Profile};

/// A static legal-guidance snippet tied to one profile attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdvisoryEntry {
    /// Condition code, e.g. "A1-2 외국인"
    pub condition_code: String,

    /// Applicable statutes
    pub law: String,

    /// One-line summary
    pub summary: String,

    /// Detail text
    pub detail: String,
}

impl AdvisoryEntry {
    pub fn new(
        condition_code: impl Into<String>,
        law: impl Into<String>,
        summary: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            condition_code: condition_code.into(),
            law: law.into(),
            summary: summary.into(),
            detail: detail.into(),
        }
    }
}

/// The independent rule groups, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleGroup {
    Nationality,
    Gender,
    PregnancyOverlay,
    Age,
    Disability,
    WorkArrangement,
}

type KeyFn = fn(&Profile) -> Option<&'static str>;

impl RuleGroup {
    /// All groups in evaluation order.
    pub const ORDER: [RuleGroup; 6] = [
        RuleGroup::Nationality,
        RuleGroup::Gender,
        RuleGroup::PregnancyOverlay,
        RuleGroup::Age,
        RuleGroup::Disability,
        RuleGroup::WorkArrangement,
    ];

    /// Select the table key for this group from a profile.
    pub fn key(&self, profile: &Profile) -> Option<&'static str> {
        let select: KeyFn = match self {
            RuleGroup::Nationality => |p| Some(p.nationality().code()),
            RuleGroup::Gender => |p| Some(p.gender().code()),
            RuleGroup::PregnancyOverlay => pregnancy_overlay_key,
            RuleGroup::Age => |p| Some(p.age().code()),
            RuleGroup::Disability => |p| Some(p.disability().code()),
            RuleGroup::WorkArrangement => |p| Some(p.work_arrangement().code()),
        };
        select(profile)
    }
}

/// Overlay key. Pregnancy status is only read for female workers.
fn pregnancy_overlay_key(profile: &Profile) -> Option<&'static str> {
    if profile.gender() != Gender::Female {
        return None;
    }
    match profile.pregnancy() {
        PregnancyStatus::PregnantOrPostpartum => Some(OVERLAY_PREGNANT),
        _ => Some(OVERLAY_GENERAL_FEMALE),
    }
}

const OVERLAY_PREGNANT: &str = "pregnant_or_postpartum";
const OVERLAY_GENERAL_FEMALE: &str = "general_female";

/// Mapping from (group, value code) to advisory entry.
#[derive(Debug, Clone, Default)]
pub struct AdvisoryTable {
    rows: BTreeMap<RuleGroup, BTreeMap<String, AdvisoryEntry>>,
}

impl AdvisoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a row.
    pub fn insert(&mut self, group: RuleGroup, code: impl Into<String>, entry: AdvisoryEntry) {
        self.rows.entry(group).or_default().insert(code.into(), entry);
    }

    /// Remove every row of one group.
    pub fn remove_group(&mut self, group: RuleGroup) {
        self.rows.remove(&group);
    }

    pub fn get(&self, group: RuleGroup, code: &str) -> Option<&AdvisoryEntry> {
        self.rows.get(&group)?.get(code)
    }

    pub fn len(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The built-in labour-law advisories.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for (group, code, cond, law, summary, detail) in BUILTIN_ROWS {
            table.insert(*group, *code, AdvisoryEntry::new(*cond, *law, *summary, *detail));
        }
        table
    }
}

type Row = (
    RuleGroup,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
);

const BUILTIN_ROWS: &[Row] = &[
    (
        RuleGroup::Nationality,
        "domestic",
        "A1-1 내국인",
        "근로기준법 제17조, 제43조",
        "내국인은 근로기준법 및 최저임금법의 일반적 근로조건이 적용됩니다.",
        "사용자는 근로계약 체결 시 근로조건(임금·근로시간 등)을 서면 명시해야 하며, 임금은 통화로, 직접, 전액을, 매월 1회 이상 일정한 날짜에 지급해야 합니다.",
    ),
    (
        RuleGroup::Nationality,
        "foreign",
        "A1-2 외국인",
        "외국인고용법 제6~12조, 출입국관리법 제18조",
        "외국인 근로자는 고용허가제 절차 및 체류자격 확인이 필수입니다.",
        "고용허가제에 따라 고용주가 허가를 받아야 하며, 체류자격(E-9 등)에 따라 근로계약 가능 여부가 결정됩니다. 체류자격 외 취업은 불법입니다.",
    ),
    (
        RuleGroup::Gender,
        "female",
        "A2-1 여성",
        "근로기준법 제65조~제74조",
        "여성 근로자는 유해·위험 업무 제한, 출산휴가 및 보호를 받을 권리가 있습니다.",
        "임신·출산 여성의 유해·위험 업무 금지. 출산 전후 휴가(90일, 다태아 120일) 및 유산·사산휴가가 부여되어야 합니다.",
    ),
    (
        RuleGroup::Gender,
        "male",
        "A2-2 남성",
        "근로기준법 제50조, 제55조",
        "남성 근로자는 일반 근로시간 및 휴일 규정이 적용됩니다.",
        "1일 8시간, 주 40시간 초과 불가. 주 1회 이상 유급휴일이 보장되어야 합니다.",
    ),
    (
        RuleGroup::PregnancyOverlay,
        OVERLAY_PREGNANT,
        "A2-2-1 임산부 등",
        "근로기준법 제65조, 제70~74조, 남녀고용평등법 제19조, 고용보험법 제70조",
        "임산부는 유해·위험 업무 금지, 시간외근로 금지, 출산휴가 및 급여 보장 대상입니다.",
        "임산부는 유해·위험 사업 사용 금지. 시간외근로 금지. 출산전후휴가 90일(다태아 120일) 보장. 육아휴직 보장.",
    ),
    (
        RuleGroup::PregnancyOverlay,
        OVERLAY_GENERAL_FEMALE,
        "A2-2-2 일반 여성",
        "근로기준법 제65조",
        "일반 여성 근로자도 보건상 유해한 사업에 사용할 수 없습니다.",
        "사용자는 임산부가 아닌 18세 이상 여성이라도 임신·출산 기능에 유해한 사업에 사용할 수 없습니다.",
    ),
    (
        RuleGroup::Age,
        "under_18",
        "A3-1 연소자",
        "근로기준법 제64~70조, 청소년보호법 제29조",
        "연소근로자는 근로시간·업종 제한, 취직인허증 필요, 야간·휴일근로 금지됩니다.",
        "만15세 미만 고용 금지(취직인허증 예외). 1일 7시간, 주 35시간 제한. 야간·휴일 근로 금지.",
    ),
    (
        RuleGroup::Age,
        "age_18_to_60",
        "A3-2 일반 성인",
        "근로기준법 제50조, 제53조",
        "일반 근로자 기준이 적용됩니다.",
        "1일 8시간, 주 40시간 초과 금지. 연장근로는 주 12시간 한도.",
    ),
    (
        RuleGroup::Age,
        "age_60_plus",
        "A3-3 고령자",
        "고령자고용촉진법 제19조, 제21조",
        "고령 근로자는 정년 후 재고용 및 임금조정 규정의 적용 대상입니다.",
        "정년 후 재고용 노력 의무. 임금피크제 등 고령 근로자 근로조건 완화 가능.",
    ),
    (
        RuleGroup::Disability,
        "has_disability",
        "A4-1 장애인",
        "장애인고용촉진법 제5조, 차별금지법 제10~12조",
        "장애인 근로자는 차별을 받지 않으며 정당한 편의를 제공받을 권리가 있습니다.",
        "장애인의 능력을 정당하게 평가하고 적정 고용 관리 의무. 정당한 편의(시설·장비, 근무시간 조정 등) 제공.",
    ),
    (
        RuleGroup::Disability,
        "no_disability",
        "A4-2 비장애인",
        "근로기준법 제17조",
        "비장애인 근로자는 일반 기준에 따라 보호됩니다.",
        "일반 근로조건 명시 조항 적용.",
    ),
    (
        RuleGroup::WorkArrangement,
        "comprehensive_wage",
        "A5-1 포괄임금제",
        "근로기준법 제56조",
        "포괄임금제라도 수당 포함 여부를 명시해야 합니다.",
        "연장·야간·휴일근로는 통상임금의 50% 이상 가산 지급해야 함이 원칙.",
    ),
    (
        RuleGroup::WorkArrangement,
        "flexible_schedule",
        "A5-2 유연근무제",
        "근로기준법 제52조",
        "유연근무제는 서면합의가 필수이며 정산기간 기준을 지켜야 합니다.",
        "근로자대표와 서면합의 필요. 1개월 단위 평균 주40시간 초과 금지.",
    ),
    (
        RuleGroup::WorkArrangement,
        "shift_work",
        "A5-3 교대근무제",
        "근로기준법 제59조 제2항",
        "교대근무자는 11시간 연속휴식이 의무입니다.",
        "근로일 종료 후 다음 근로일까지 11시간 이상 연속휴식 보장해야 함.",
    ),
    (
        RuleGroup::WorkArrangement,
        "standard",
        "A5-4 일반",
        "근로기준법 제50조",
        "일반 법정근로시간 기준을 적용합니다.",
        "1일 8시간, 1주 40시간 기준. 연장 시 근로자 동의 필요.",
    ),
];

lazy_static! {
    static ref BUILTIN_TABLE: AdvisoryTable = AdvisoryTable::builtin();
}

/// Maps a profile to its advisory entries.
///
/// The built-in table is borrowed; it is only copied when an advisor
/// overrides a row.
#[derive(Debug, Clone)]
pub struct RuleAdvisor {
    table: Cow<'static, AdvisoryTable>,
}

impl RuleAdvisor {
    /// Advisor backed by the built-in table.
    pub fn new() -> Self {
        Self {
            table: Cow::Borrowed(&*BUILTIN_TABLE),
        }
    }

    /// Advisor backed by a caller-supplied table.
    pub fn with_table(table: AdvisoryTable) -> Self {
        Self {
            table: Cow::Owned(table),
        }
    }

    /// Add or override one row.
    pub fn with_entry(mut self, group: RuleGroup, code: impl Into<String>, entry: AdvisoryEntry) -> Self {
        self.table.to_mut().insert(group, code, entry);
        self
    }

    pub fn table(&self) -> &AdvisoryTable {
        &self.table
    }

    /// Evaluate a single group in isolation.
    pub fn evaluate_group(&self, group: RuleGroup, profile: &Profile) -> Option<AdvisoryEntry> {
        let code = group.key(profile)?;
        self.table.get(group, code).cloned()
    }

    /// Evaluate every group in order and concatenate the results.
    pub fn evaluate(&self, profile: &Profile) -> Vec<AdvisoryEntry> {
        let entries: Vec<AdvisoryEntry> = RuleGroup::ORDER
            .iter()
            .filter_map(|group| self.evaluate_group(*group, profile))
            .collect();
        debug!(entries = entries.len(), "profile advisories evaluated");
        entries
    }
}

impl Default for RuleAdvisor {
    fn default() -> Self {
        Self::new()
    }
}
