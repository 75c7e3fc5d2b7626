use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{
    MedalFamily, MedalTier, PersonnelId, PersonnelRecord, ProposalType, RequestContext, TitleCode,
    UnitId,
};
use super::eligibility::{EligibilityEngine, RequirementTable, TierAssessment};
use super::ports::{
    AwardHistoryProvider, FetchError, PersonnelDirectory, PersonnelQuery, ProposalGateway,
    SubmissionReceipt, UnitDirectory,
};
use super::proposal::{
    DraftError, DraftState, EntityKind, EntityRef, ProposalDraft, ScientificCategory,
    TitleAssignment,
};

/// Identifier for a draft held by this service instance. Drafts are owned
/// by a single wizard session and never shared across sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DraftId(pub String);

static DRAFT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_draft_id() -> DraftId {
    let id = DRAFT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    DraftId(format!("draft-{id:06}"))
}

/// Facade composing the external ports, the eligibility engine, and the
/// in-flight drafts.
pub struct ProposalService<P, H, U, G> {
    personnel: Arc<P>,
    histories: Arc<H>,
    units: Arc<U>,
    gateway: Arc<G>,
    engine: Arc<EligibilityEngine>,
    drafts: Mutex<HashMap<DraftId, ProposalDraft>>,
}

impl<P, H, U, G> ProposalService<P, H, U, G>
where
    P: PersonnelDirectory + 'static,
    H: AwardHistoryProvider + 'static,
    U: UnitDirectory + 'static,
    G: ProposalGateway + 'static,
{
    pub fn new(
        personnel: Arc<P>,
        histories: Arc<H>,
        units: Arc<U>,
        gateway: Arc<G>,
        table: RequirementTable,
    ) -> Self {
        Self {
            personnel,
            histories,
            units,
            gateway,
            engine: Arc::new(EligibilityEngine::new(table)),
            drafts: Mutex::new(HashMap::new()),
        }
    }

    pub fn engine(&self) -> &EligibilityEngine {
        &self.engine
    }

    /// Open a new empty draft for one wizard session.
    pub fn start_draft(&self, proposal_type: ProposalType, year: i32) -> DraftId {
        let draft_id = next_draft_id();
        let mut drafts = self.drafts.lock().expect("draft store mutex poisoned");
        drafts.insert(draft_id.clone(), ProposalDraft::new(proposal_type, year));
        draft_id
    }

    /// Nominate a person, verifying the record exists upstream first.
    pub fn add_personnel(
        &self,
        draft_id: &DraftId,
        personnel_id: PersonnelId,
    ) -> Result<DraftView, ProposalServiceError> {
        self.personnel
            .fetch(&personnel_id)?
            .ok_or_else(|| ProposalServiceError::PersonnelNotFound(personnel_id.0.clone()))?;
        self.with_draft(draft_id, |draft| {
            draft.add_entity(EntityRef::Personnel(personnel_id.clone()))
        })
    }

    /// Nominate a unit for unit-level proposals.
    pub fn add_unit(
        &self,
        draft_id: &DraftId,
        unit_id: UnitId,
    ) -> Result<DraftView, ProposalServiceError> {
        self.units
            .fetch(&unit_id)?
            .ok_or_else(|| ProposalServiceError::UnitNotFound(unit_id.0.clone()))?;
        self.with_draft(draft_id, |draft| {
            draft.add_entity(EntityRef::Unit(unit_id.clone()))
        })
    }

    /// Assign a title to a nominated entity.
    ///
    /// Long-service titles on personnel drafts run the medal-tier
    /// eligibility check against the fetched record and award history before
    /// the draft-level grouping rule. Both kinds of denial come back as
    /// [`AssignmentOutcome`] values; the draft is unchanged on denial.
    pub fn assign_title(
        &self,
        draft_id: &DraftId,
        entity_id: &str,
        title: TitleCode,
        as_of: NaiveDate,
    ) -> Result<AssignmentOutcome, ProposalServiceError> {
        let entity_kind = {
            let drafts = self.drafts.lock().expect("draft store mutex poisoned");
            let draft = drafts
                .get(draft_id)
                .ok_or_else(|| ProposalServiceError::DraftNotFound(draft_id.0.clone()))?;
            let kind = draft
                .entities()
                .find(|entity| entity.id() == entity_id)
                .map(EntityRef::kind)
                .ok_or_else(|| DraftError::UnknownEntity(entity_id.to_string()))?;
            kind
        };

        if entity_kind == EntityKind::Personnel {
            if let Some((family, tier)) = title.medal() {
                let assessment = self.check_eligibility(
                    &PersonnelId(entity_id.to_string()),
                    family,
                    tier,
                    as_of,
                )?;
                if !assessment.eligible {
                    return Ok(AssignmentOutcome::Ineligible {
                        reason: assessment.reason_text(),
                    });
                }
            }
        }

        let mut drafts = self.drafts.lock().expect("draft store mutex poisoned");
        let draft = drafts
            .get_mut(draft_id)
            .ok_or_else(|| ProposalServiceError::DraftNotFound(draft_id.0.clone()))?;
        let ruling = draft.assign_title(entity_id, title)?;
        if ruling.allowed() {
            Ok(AssignmentOutcome::Applied {
                state: draft.state(),
            })
        } else {
            Ok(AssignmentOutcome::TitleConflict {
                reason: ruling.summary(),
            })
        }
    }

    /// Assign category and description for scientific-achievement drafts.
    pub fn assign_scientific(
        &self,
        draft_id: &DraftId,
        entity_id: &str,
        category: ScientificCategory,
        description: String,
    ) -> Result<DraftView, ProposalServiceError> {
        self.with_draft(draft_id, |draft| {
            draft.assign_scientific(entity_id, category, description)
        })
    }

    pub fn remove_entity(
        &self,
        draft_id: &DraftId,
        entity_id: &str,
    ) -> Result<DraftView, ProposalServiceError> {
        self.with_draft(draft_id, |draft| draft.remove_entity(entity_id))
    }

    pub fn clear_assignment(
        &self,
        draft_id: &DraftId,
        entity_id: &str,
    ) -> Result<DraftView, ProposalServiceError> {
        self.with_draft(draft_id, |draft| draft.clear_assignment(entity_id))
    }

    /// Standalone eligibility check used by the wizard's candidate list.
    pub fn check_eligibility(
        &self,
        personnel_id: &PersonnelId,
        family: MedalFamily,
        tier: MedalTier,
        as_of: NaiveDate,
    ) -> Result<TierAssessment, ProposalServiceError> {
        let record = self
            .personnel
            .fetch(personnel_id)?
            .ok_or_else(|| ProposalServiceError::PersonnelNotFound(personnel_id.0.clone()))?;
        let history = self.histories.history_for(personnel_id)?;
        Ok(self.engine.assess(&record, family, tier, &history, as_of))
    }

    pub fn search_personnel(
        &self,
        query: &PersonnelQuery,
    ) -> Result<Vec<PersonnelRecord>, ProposalServiceError> {
        Ok(self.personnel.search(query)?)
    }

    pub fn unit_roster(
        &self,
        unit_id: &UnitId,
    ) -> Result<Vec<PersonnelRecord>, ProposalServiceError> {
        self.units
            .fetch(unit_id)?
            .ok_or_else(|| ProposalServiceError::UnitNotFound(unit_id.0.clone()))?;
        Ok(self.units.roster(unit_id)?)
    }

    pub fn draft_view(&self, draft_id: &DraftId) -> Result<DraftView, ProposalServiceError> {
        let drafts = self.drafts.lock().expect("draft store mutex poisoned");
        let draft = drafts
            .get(draft_id)
            .ok_or_else(|| ProposalServiceError::DraftNotFound(draft_id.0.clone()))?;
        Ok(DraftView::from_draft(draft_id, draft))
    }

    /// Submit a COMPLETE draft to the proposal gateway.
    ///
    /// The draft is only removed after the gateway accepts the payload, so a
    /// failed hand-off leaves it editable. A second submit of the same id
    /// observes `DraftNotFound`: the draft's lifecycle ended with the first.
    pub fn submit(
        &self,
        draft_id: &DraftId,
        ctx: &RequestContext,
    ) -> Result<SubmissionReceipt, ProposalServiceError> {
        let payload = {
            let drafts = self.drafts.lock().expect("draft store mutex poisoned");
            let draft = drafts
                .get(draft_id)
                .ok_or_else(|| ProposalServiceError::DraftNotFound(draft_id.0.clone()))?;
            draft.to_submission_payload(ctx)?
        };

        let receipt = self.gateway.submit(&payload)?;

        let mut drafts = self.drafts.lock().expect("draft store mutex poisoned");
        drafts.remove(draft_id);

        info!(
            draft = %draft_id.0,
            proposal = %receipt.proposal_id,
            entries = receipt.accepted_entries,
            actor = %ctx.actor,
            "proposal submitted"
        );
        Ok(receipt)
    }

    fn with_draft<F, T>(
        &self,
        draft_id: &DraftId,
        operation: F,
    ) -> Result<DraftView, ProposalServiceError>
    where
        F: FnOnce(&mut ProposalDraft) -> Result<T, DraftError>,
    {
        let mut drafts = self.drafts.lock().expect("draft store mutex poisoned");
        let draft = drafts
            .get_mut(draft_id)
            .ok_or_else(|| ProposalServiceError::DraftNotFound(draft_id.0.clone()))?;
        operation(draft)?;
        Ok(DraftView::from_draft(draft_id, draft))
    }
}

/// Value-level outcome of an assignment attempt so the wizard renders
/// denials inline without exception handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum AssignmentOutcome {
    Applied { state: DraftState },
    TitleConflict { reason: String },
    Ineligible { reason: String },
}

/// Sanitized draft representation exposed to API callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftView {
    pub draft_id: DraftId,
    pub proposal_type: ProposalType,
    pub year: i32,
    pub state: DraftState,
    pub complete: bool,
    pub entries: Vec<EntryView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryView {
    pub entity_id: String,
    pub kind: EntityKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment: Option<TitleAssignment>,
}

impl DraftView {
    fn from_draft(draft_id: &DraftId, draft: &ProposalDraft) -> Self {
        let entries = draft
            .entities()
            .map(|entity| EntryView {
                entity_id: entity.id().to_string(),
                kind: entity.kind(),
                assignment: draft.assignment_of(entity.id()).cloned(),
            })
            .collect();
        Self {
            draft_id: draft_id.clone(),
            proposal_type: draft.proposal_type(),
            year: draft.year(),
            state: draft.state(),
            complete: draft.is_complete(),
            entries,
        }
    }
}

/// Error raised by the proposal service.
#[derive(Debug, thiserror::Error)]
pub enum ProposalServiceError {
    #[error("draft {0} not found")]
    DraftNotFound(String),
    #[error("personnel {0} not found")]
    PersonnelNotFound(String),
    #[error("unit {0} not found")]
    UnitNotFound(String),
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}
