use serde::{Deserialize, Serialize};

use super::super::domain::{Gender, MedalFamily, MedalTier};

/// How a requirement row compares elapsed service against its threshold.
///
/// The medal regulations mix two semantics: most families count whole
/// elapsed months, but some compare the current calendar year against the
/// enlistment-year anniversary, which can differ by up to eleven months.
/// Both are preserved as data so each family keeps its observed behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonBasis {
    RollingMonths,
    AnniversaryYear,
}

/// Gender-specific minimum service, in months, for gender-gated families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderFloor {
    pub female_min_months: u32,
    pub male_min_months: u32,
}

impl GenderFloor {
    pub const fn min_months_for(&self, gender: Gender) -> u32 {
        match gender {
            Gender::Female => self.female_min_months,
            Gender::Male => self.male_min_months,
        }
    }
}

/// Declarative threshold row for one (family, tier) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedalTierRequirement {
    pub family: MedalFamily,
    pub tier: MedalTier,
    pub min_months_of_service: u32,
    /// Tier that must already be GRANTED before this one can be proposed.
    pub prerequisite: Option<MedalTier>,
    pub comparison: ComparisonBasis,
    /// When set, the row additionally requires a recorded gender and uses
    /// the matching per-gender floor instead of `min_months_of_service`.
    pub gender_floor: Option<GenderFloor>,
}

/// Lookup table of requirement rows, replacing thresholds that used to be
/// repeated inline across the proposal wizard screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementTable {
    rows: Vec<MedalTierRequirement>,
}

impl RequirementTable {
    pub fn new(rows: Vec<MedalTierRequirement>) -> Self {
        Self { rows }
    }

    /// Published thresholds for the supported families.
    pub fn standard() -> Self {
        Self::new(vec![
            MedalTierRequirement {
                family: MedalFamily::Hccsvv,
                tier: MedalTier::HangBa,
                min_months_of_service: 120,
                prerequisite: None,
                comparison: ComparisonBasis::RollingMonths,
                gender_floor: None,
            },
            MedalTierRequirement {
                family: MedalFamily::Hccsvv,
                tier: MedalTier::HangNhi,
                min_months_of_service: 180,
                prerequisite: Some(MedalTier::HangBa),
                comparison: ComparisonBasis::RollingMonths,
                gender_floor: None,
            },
            MedalTierRequirement {
                family: MedalFamily::Hccsvv,
                tier: MedalTier::HangNhat,
                min_months_of_service: 240,
                prerequisite: Some(MedalTier::HangNhi),
                comparison: ComparisonBasis::RollingMonths,
                gender_floor: None,
            },
            MedalTierRequirement {
                family: MedalFamily::HcQkqt,
                tier: MedalTier::HangBa,
                min_months_of_service: 300,
                prerequisite: None,
                comparison: ComparisonBasis::AnniversaryYear,
                gender_floor: None,
            },
            MedalTierRequirement {
                family: MedalFamily::KncVsnxdQdndvn,
                tier: MedalTier::HangBa,
                min_months_of_service: 240,
                prerequisite: None,
                comparison: ComparisonBasis::RollingMonths,
                gender_floor: Some(GenderFloor {
                    female_min_months: 240,
                    male_min_months: 300,
                }),
            },
            MedalTierRequirement {
                family: MedalFamily::Hcbvtq,
                tier: MedalTier::HangBa,
                min_months_of_service: 60,
                prerequisite: None,
                comparison: ComparisonBasis::RollingMonths,
                gender_floor: None,
            },
            MedalTierRequirement {
                family: MedalFamily::Hcbvtq,
                tier: MedalTier::HangNhi,
                min_months_of_service: 120,
                prerequisite: Some(MedalTier::HangBa),
                comparison: ComparisonBasis::RollingMonths,
                gender_floor: None,
            },
            MedalTierRequirement {
                family: MedalFamily::Hcbvtq,
                tier: MedalTier::HangNhat,
                min_months_of_service: 180,
                prerequisite: Some(MedalTier::HangNhi),
                comparison: ComparisonBasis::RollingMonths,
                gender_floor: None,
            },
        ])
    }

    pub fn lookup(
        &self,
        family: MedalFamily,
        tier: MedalTier,
    ) -> Option<&MedalTierRequirement> {
        self.rows
            .iter()
            .find(|row| row.family == family && row.tier == tier)
    }

    pub fn rows(&self) -> &[MedalTierRequirement] {
        &self.rows
    }
}

impl Default for RequirementTable {
    fn default() -> Self {
        Self::standard()
    }
}
