mod config;
mod rules;

pub use config::{ComparisonBasis, GenderFloor, MedalTierRequirement, RequirementTable};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{AwardHistory, MedalFamily, MedalTier, PersonnelRecord};

/// Stateless evaluator applying the requirement table to personnel records.
pub struct EligibilityEngine {
    table: RequirementTable,
}

impl EligibilityEngine {
    pub fn new(table: RequirementTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RequirementTable {
        &self.table
    }

    /// Assess one (family, tier) pair for one person.
    ///
    /// Denials are ordinary values, not errors: the wizard shows them inline
    /// next to the candidate. `as_of` is injected so assessments are
    /// reproducible in tests and back-dated reviews.
    pub fn assess(
        &self,
        personnel: &PersonnelRecord,
        family: MedalFamily,
        tier: MedalTier,
        history: &AwardHistory,
        as_of: NaiveDate,
    ) -> TierAssessment {
        let Some(requirement) = self.table.lookup(family, tier) else {
            return TierAssessment::ineligible(IneligibilityReason::UnknownRequirement {
                family,
                tier,
            });
        };

        rules::assess_requirement(personnel, requirement, history, as_of)
    }
}

/// Outcome of a single eligibility check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierAssessment {
    pub eligible: bool,
    pub reason: Option<IneligibilityReason>,
}

impl TierAssessment {
    pub(crate) fn eligible() -> Self {
        Self {
            eligible: true,
            reason: None,
        }
    }

    pub(crate) fn ineligible(reason: IneligibilityReason) -> Self {
        Self {
            eligible: false,
            reason: Some(reason),
        }
    }

    /// Human-readable denial text for UI display; empty when eligible.
    pub fn reason_text(&self) -> String {
        self.reason
            .as_ref()
            .map(IneligibilityReason::summary)
            .unwrap_or_default()
    }
}

/// Why an eligibility check failed, in adverse-notice-friendly terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum IneligibilityReason {
    UnknownRequirement {
        family: MedalFamily,
        tier: MedalTier,
    },
    MissingEnlistmentDate,
    AlreadyGranted {
        tier: MedalTier,
    },
    PrerequisiteNotGranted {
        tier: MedalTier,
    },
    GenderNotSet,
    InsufficientDuration {
        required_months: u32,
        actual_months: u32,
    },
    AnniversaryNotReached {
        required_years: u32,
        elapsed_years: i32,
    },
}

impl IneligibilityReason {
    pub fn summary(&self) -> String {
        match self {
            IneligibilityReason::UnknownRequirement { family, tier } => format!(
                "no requirement is defined for {} {}",
                family.label(),
                tier.label()
            ),
            IneligibilityReason::MissingEnlistmentDate => {
                "missing enlistment date".to_string()
            }
            IneligibilityReason::AlreadyGranted { tier } => {
                format!("{} already granted", tier.label())
            }
            IneligibilityReason::PrerequisiteNotGranted { tier } => {
                format!("prerequisite {} not yet granted", tier.label())
            }
            IneligibilityReason::GenderNotSet => "gender not set".to_string(),
            IneligibilityReason::InsufficientDuration {
                required_months,
                actual_months,
            } => format!(
                "insufficient duration: {actual_months} of {required_months} required months"
            ),
            IneligibilityReason::AnniversaryNotReached {
                required_years,
                elapsed_years,
            } => format!(
                "anniversary year not reached: {elapsed_years} of {required_years} required years"
            ),
        }
    }
}
