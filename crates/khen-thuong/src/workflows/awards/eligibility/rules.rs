use chrono::{Datelike, NaiveDate};

use super::super::domain::{AwardHistory, PersonnelRecord, TierStatus};
use super::super::duration::duration_as_of;
use super::config::{ComparisonBasis, MedalTierRequirement};
use super::{IneligibilityReason, TierAssessment};

/// Fail-closed rule chain for one requirement row. The first failing check
/// produces the reason surfaced to the caller; order matters so that
/// structural problems (missing dates) mask threshold comparisons.
pub(crate) fn assess_requirement(
    personnel: &PersonnelRecord,
    requirement: &MedalTierRequirement,
    history: &AwardHistory,
    as_of: NaiveDate,
) -> TierAssessment {
    let Some(enlistment) = personnel.enlistment_date else {
        return TierAssessment::ineligible(IneligibilityReason::MissingEnlistmentDate);
    };

    if history.status_of(requirement.family, requirement.tier) == TierStatus::Granted {
        return TierAssessment::ineligible(IneligibilityReason::AlreadyGranted {
            tier: requirement.tier,
        });
    }

    if let Some(prerequisite) = requirement.prerequisite {
        if !history.granted(requirement.family, prerequisite) {
            return TierAssessment::ineligible(IneligibilityReason::PrerequisiteNotGranted {
                tier: prerequisite,
            });
        }
    }

    let required_months = match requirement.gender_floor {
        Some(floor) => match personnel.gender {
            Some(gender) => floor.min_months_for(gender),
            None => {
                return TierAssessment::ineligible(IneligibilityReason::GenderNotSet);
            }
        },
        None => requirement.min_months_of_service,
    };

    match requirement.comparison {
        ComparisonBasis::RollingMonths => {
            // Enlistment date is present, and as_of/separation below the
            // enlistment date would mean corrupt upstream data; treat it as
            // zero service rather than panicking.
            let elapsed = duration_as_of(personnel, as_of)
                .map(|duration| duration.total_months)
                .unwrap_or(0);
            if elapsed < required_months {
                return TierAssessment::ineligible(IneligibilityReason::InsufficientDuration {
                    required_months,
                    actual_months: elapsed,
                });
            }
        }
        ComparisonBasis::AnniversaryYear => {
            let required_years = required_months / 12;
            let end_year = personnel
                .separation_date
                .map(|date| date.year())
                .unwrap_or_else(|| as_of.year());
            let elapsed_years = end_year - enlistment.year();
            if elapsed_years < required_years as i32 {
                return TierAssessment::ineligible(IneligibilityReason::AnniversaryNotReached {
                    required_years,
                    elapsed_years,
                });
            }
        }
    }

    TierAssessment::eligible()
}
