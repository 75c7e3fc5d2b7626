//! Award eligibility rules and commendation-proposal assembly.
//!
//! The thresholds, prerequisite chains, and title groupings that the legacy
//! wizard screens repeated inline live here as declarative tables consumed
//! by a single rules engine. Everything in this module is pure and
//! clock-free; callers inject the evaluation date.

pub mod domain;
pub mod duration;
pub mod eligibility;
pub mod grouping;
pub mod ports;
pub mod proposal;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AwardHistory, AwardHistoryEntry, Gender, MedalFamily, MedalTier, PersonnelId, PersonnelRecord,
    ProposalType, RequestContext, Role, ServiceDuration, TierStatus, TitleCode, Unit, UnitId,
};
pub use duration::{compute_duration, duration_as_of, InvalidDateRange};
pub use eligibility::{
    ComparisonBasis, EligibilityEngine, GenderFloor, IneligibilityReason, MedalTierRequirement,
    RequirementTable, TierAssessment,
};
pub use grouping::{can_add_title, family_of, TitleFamily, TitleRuling};
pub use ports::{
    AwardHistoryProvider, FetchError, PersonnelDirectory, PersonnelQuery, ProposalGateway,
    SubmissionReceipt, UnitDirectory,
};
pub use proposal::{
    DraftError, DraftState, EntityKind, EntityRef, ProposalDraft, ScientificCategory,
    SubmissionEntry, SubmissionPayload, TitleAssignment,
};
pub use router::awards_router;
pub use service::{
    AssignmentOutcome, DraftId, DraftView, EntryView, ProposalService, ProposalServiceError,
};
