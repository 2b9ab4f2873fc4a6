//! Worker profile collected in the first wizard step.
//!
//! Every attribute is a closed enumeration. Each value has a stable
//! machine code (its serde form and advisory-table key) and the Korean
//! label shown on the intake form, so a presentation layer can map its
//! radio-button values back with `from_label`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ValidationError;

macro_rules! profile_attribute {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => ($code:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl $name {
            /// All values in form order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Stable machine code.
            pub fn code(&self) -> &'static str {
                match self {
                    $($name::$variant => $code,)+
                }
            }

            /// Korean display label used on the input form.
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// Parse a display label (as submitted by the form).
            pub fn from_label(label: &str) -> Option<Self> {
                let label = label.trim();
                Self::ALL.iter().copied().find(|v| v.label() == label)
            }

            /// Parse a machine code.
            pub fn from_code(code: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.code() == code)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

profile_attribute! {
    /// A1. Nationality.
    Nationality {
        Domestic => ("domestic", "내국인"),
        Foreign => ("foreign", "외국인"),
    }
}

profile_attribute! {
    /// A2. Gender as recorded in the resident register.
    Gender {
        Female => ("female", "여성"),
        Male => ("male", "남성"),
    }
}

profile_attribute! {
    /// A2-2. Pregnancy status. Only meaningful for female workers.
    PregnancyStatus {
        PregnantOrPostpartum => ("pregnant_or_postpartum", "임산부 또는 출산 후 1년 이내"),
        NotApplicable => ("not_applicable", "위 항목에 해당하지 않음"),
        /// Placeholder recorded for male workers.
        NotApplicableMale => ("not_applicable_male", "해당 없음"),
    }
}

profile_attribute! {
    /// A3. Age bracket.
    AgeBracket {
        Under18 => ("under_18", "만 18세 미만"),
        From18To60 => ("age_18_to_60", "만 18세 이상 ~ 만 60세 미만"),
        Over60 => ("age_60_plus", "만 60세 이상"),
    }
}

profile_attribute! {
    /// A4. Disability status.
    DisabilityStatus {
        Disabled => ("has_disability", "장애인"),
        NotDisabled => ("no_disability", "비장애인"),
    }
}

profile_attribute! {
    /// A5. Working-time arrangement.
    WorkArrangement {
        ComprehensiveWage => ("comprehensive_wage", "포괄임금제"),
        FlexibleSchedule => ("flexible_schedule", "유연근무제"),
        ShiftWork => ("shift_work", "교대근무제"),
        Standard => ("standard", "특별한 근로시간 유형에 해당 없음"),
    }
}

/// Form fields, in the order the form presents them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    Nationality,
    Gender,
    Pregnancy,
    Age,
    Disability,
    WorkArrangement,
}

impl ProfileField {
    /// Form prompt identifier, e.g. "A2-2 임신여부".
    pub fn prompt(&self) -> &'static str {
        match self {
            ProfileField::Nationality => "A1 국적",
            ProfileField::Gender => "A2 성별",
            ProfileField::Pregnancy => "A2-2 임신여부",
            ProfileField::Age => "A3 나이",
            ProfileField::Disability => "A4 장애유무",
            ProfileField::WorkArrangement => "A5 근로시간 유형",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prompt())
    }
}

/// A complete worker profile.
///
/// Can only be obtained through [`ProfileBuilder::build`], so every field
/// is populated and the pregnancy field is consistent with gender.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Profile {
    nationality: Nationality,
    gender: Gender,
    pregnancy: PregnancyStatus,
    age: AgeBracket,
    disability: DisabilityStatus,
    work_arrangement: WorkArrangement,
}

impl Profile {
    /// Start collecting a profile.
    pub fn builder() -> ProfileBuilder {
        ProfileBuilder::new()
    }

    pub fn nationality(&self) -> Nationality {
        self.nationality
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    /// Pregnancy status. Always `NotApplicableMale` for male workers.
    pub fn pregnancy(&self) -> PregnancyStatus {
        self.pregnancy
    }

    pub fn age(&self) -> AgeBracket {
        self.age
    }

    pub fn disability(&self) -> DisabilityStatus {
        self.disability
    }

    pub fn work_arrangement(&self) -> WorkArrangement {
        self.work_arrangement
    }

    /// True when the worker is pregnant or within a year of giving birth.
    pub fn is_pregnant_or_postpartum(&self) -> bool {
        self.gender == Gender::Female && self.pregnancy == PregnancyStatus::PregnantOrPostpartum
    }

    /// One-line overview, e.g. "외국인, 여성(임산부 또는 출산 후 1년 이내), 만 60세 이상, 장애인, 교대근무제".
    pub fn overview(&self) -> String {
        let gender = match self.gender {
            Gender::Female => format!("{}({})", self.gender.label(), self.pregnancy.label()),
            Gender::Male => self.gender.label().to_string(),
        };
        format!(
            "{}, {}, {}, {}, {}",
            self.nationality.label(),
            gender,
            self.age.label(),
            self.disability.label(),
            self.work_arrangement.label()
        )
    }
}

/// Collects profile answers in any order.
#[derive(Debug, Clone, Default)]
pub struct ProfileBuilder {
    nationality: Option<Nationality>,
    gender: Option<Gender>,
    pregnancy: Option<PregnancyStatus>,
    age: Option<AgeBracket>,
    disability: Option<DisabilityStatus>,
    work_arrangement: Option<WorkArrangement>,
}

impl ProfileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nationality(mut self, value: Nationality) -> Self {
        self.nationality = Some(value);
        self
    }

    pub fn gender(mut self, value: Gender) -> Self {
        self.gender = Some(value);
        self
    }

    pub fn pregnancy(mut self, value: PregnancyStatus) -> Self {
        self.pregnancy = Some(value);
        self
    }

    pub fn age(mut self, value: AgeBracket) -> Self {
        self.age = Some(value);
        self
    }

    pub fn disability(mut self, value: DisabilityStatus) -> Self {
        self.disability = Some(value);
        self
    }

    pub fn work_arrangement(mut self, value: WorkArrangement) -> Self {
        self.work_arrangement = Some(value);
        self
    }

    /// Fields still missing, in form order.
    pub fn missing_fields(&self) -> Vec<ProfileField> {
        let mut missing = Vec::new();
        if self.nationality.is_none() {
            missing.push(ProfileField::Nationality);
        }
        if self.gender.is_none() {
            missing.push(ProfileField::Gender);
        }
        if self.gender == Some(Gender::Female)
            && matches!(
                self.pregnancy,
                None | Some(PregnancyStatus::NotApplicableMale)
            )
        {
            missing.push(ProfileField::Pregnancy);
        }
        if self.age.is_none() {
            missing.push(ProfileField::Age);
        }
        if self.disability.is_none() {
            missing.push(ProfileField::Disability);
        }
        if self.work_arrangement.is_none() {
            missing.push(ProfileField::WorkArrangement);
        }
        missing
    }

    /// Finish collection.
    ///
    /// Fails with [`ValidationError::IncompleteProfile`] listing every
    /// missing field. For male workers the pregnancy answer is ignored.
    pub fn build(self) -> Result<Profile, ValidationError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ValidationError::IncompleteProfile(missing));
        }

        match (
            self.nationality,
            self.gender,
            self.age,
            self.disability,
            self.work_arrangement,
        ) {
            (Some(nationality), Some(gender), Some(age), Some(disability), Some(work_arrangement)) => {
                let pregnancy = match gender {
                    Gender::Male => PregnancyStatus::NotApplicableMale,
                    Gender::Female => self
                        .pregnancy
                        .unwrap_or(PregnancyStatus::NotApplicable),
                };
                Ok(Profile {
                    nationality,
                    gender,
                    pregnancy,
                    age,
                    disability,
                    work_arrangement,
                })
            }
            _ => Err(ValidationError::IncompleteProfile(self.missing_fields())),
        }
    }
}
