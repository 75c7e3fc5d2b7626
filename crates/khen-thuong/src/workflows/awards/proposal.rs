use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::{PersonnelId, ProposalType, RequestContext, TitleCode, UnitId};
use super::grouping::{can_add_title, TitleRuling};

/// Entity nominated by a draft entry. One draft nominates either personnel
/// or units, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum EntityRef {
    Personnel(PersonnelId),
    Unit(UnitId),
}

impl EntityRef {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Personnel(_) => EntityKind::Personnel,
            EntityRef::Unit(_) => EntityKind::Unit,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            EntityRef::Personnel(PersonnelId(id)) => id,
            EntityRef::Unit(UnitId(id)) => id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Personnel,
    Unit,
}

impl EntityKind {
    pub const fn label(self) -> &'static str {
        match self {
            EntityKind::Personnel => "personnel",
            EntityKind::Unit => "unit",
        }
    }
}

/// Category attached to scientific-achievement entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScientificCategory {
    ResearchProject,
    TechnicalInitiative,
    Publication,
}

/// Per-entity data collected by the wizard before submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum TitleAssignment {
    Title { title: TitleCode },
    Scientific {
        category: ScientificCategory,
        description: String,
    },
}

/// Derived draft lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftState {
    Empty,
    InProgress,
    Complete,
}

impl DraftState {
    pub const fn label(self) -> &'static str {
        match self {
            DraftState::Empty => "empty",
            DraftState::InProgress => "in_progress",
            DraftState::Complete => "complete",
        }
    }
}

/// Caller-misuse failures raised by the draft. Expected business denials
/// (family conflicts) come back as [`TitleRuling`] values instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("draft still has entities without assignments")]
    IncompleteDraft,
    #[error("draft already nominates {present} entities; cannot add a {candidate} entity")]
    MixedEntityKind {
        present: &'static str,
        candidate: &'static str,
    },
    #[error("entity {0} was already added to this draft")]
    DuplicateEntity(String),
    #[error("entity {0} is not part of this draft")]
    UnknownEntity(String),
    #[error("a {proposal} proposal does not take this assignment kind")]
    WrongAssignmentKind { proposal: &'static str },
    #[error("scientific achievement entries need a non-empty description")]
    EmptyDescription,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct DraftEntry {
    entity: EntityRef,
    assignment: Option<TitleAssignment>,
}

/// In-progress proposal being assembled by one wizard session.
///
/// The draft owns no external resources; abandoning the wizard simply drops
/// it. Successful submission consumes the draft, ending its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalDraft {
    proposal_type: ProposalType,
    year: i32,
    entries: Vec<DraftEntry>,
}

impl ProposalDraft {
    pub fn new(proposal_type: ProposalType, year: i32) -> Self {
        Self {
            proposal_type,
            year,
            entries: Vec::new(),
        }
    }

    pub fn proposal_type(&self) -> ProposalType {
        self.proposal_type
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn state(&self) -> DraftState {
        if self.entries.is_empty() {
            DraftState::Empty
        } else if self.is_complete() {
            DraftState::Complete
        } else {
            DraftState::InProgress
        }
    }

    /// True once every nominated entity carries a valid assignment.
    pub fn is_complete(&self) -> bool {
        !self.entries.is_empty()
            && self
                .entries
                .iter()
                .all(|entry| entry.assignment.is_some())
    }

    pub fn entity_count(&self) -> usize {
        self.entries.len()
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntityRef> {
        self.entries.iter().map(|entry| &entry.entity)
    }

    pub fn assignment_of(&self, entity_id: &str) -> Option<&TitleAssignment> {
        self.entries
            .iter()
            .find(|entry| entry.entity.id() == entity_id)
            .and_then(|entry| entry.assignment.as_ref())
    }

    fn titles_excluding(&self, entity_id: &str) -> BTreeSet<TitleCode> {
        self.entries
            .iter()
            .filter(|entry| entry.entity.id() != entity_id)
            .filter_map(|entry| match entry.assignment {
                Some(TitleAssignment::Title { title }) => Some(title),
                _ => None,
            })
            .collect()
    }

    /// Nominate an entity. The first entity fixes the entity kind for the
    /// whole draft and moves it out of EMPTY.
    pub fn add_entity(&mut self, entity: EntityRef) -> Result<(), DraftError> {
        if let Some(first) = self.entries.first() {
            let present = first.entity.kind();
            if present != entity.kind() {
                return Err(DraftError::MixedEntityKind {
                    present: present.label(),
                    candidate: entity.kind().label(),
                });
            }
        }
        if self.entries.iter().any(|entry| entry.entity == entity) {
            return Err(DraftError::DuplicateEntity(entity.id().to_string()));
        }
        self.entries.push(DraftEntry {
            entity,
            assignment: None,
        });
        Ok(())
    }

    pub fn remove_entity(&mut self, entity_id: &str) -> Result<(), DraftError> {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.entity.id() != entity_id);
        if self.entries.len() == before {
            return Err(DraftError::UnknownEntity(entity_id.to_string()));
        }
        Ok(())
    }

    /// Assign a title code, consulting the mutual-exclusion rule first.
    ///
    /// A denied ruling leaves the draft untouched; the ruling itself carries
    /// the reason for the caller to surface. The entity's own current title
    /// is excluded from the conflict set so re-assignment within a family
    /// works.
    pub fn assign_title(
        &mut self,
        entity_id: &str,
        title: TitleCode,
    ) -> Result<TitleRuling, DraftError> {
        if self.proposal_type == ProposalType::ScientificAchievement {
            return Err(DraftError::WrongAssignmentKind {
                proposal: self.proposal_type.label(),
            });
        }
        let position = self
            .entries
            .iter()
            .position(|entry| entry.entity.id() == entity_id)
            .ok_or_else(|| DraftError::UnknownEntity(entity_id.to_string()))?;

        let ruling = can_add_title(&self.titles_excluding(entity_id), title);
        if ruling.allowed() {
            self.entries[position].assignment = Some(TitleAssignment::Title { title });
        }
        Ok(ruling)
    }

    /// Assign a scientific-achievement category and description. Only valid
    /// for scientific-achievement drafts and requires non-empty text.
    pub fn assign_scientific(
        &mut self,
        entity_id: &str,
        category: ScientificCategory,
        description: impl Into<String>,
    ) -> Result<(), DraftError> {
        if self.proposal_type != ProposalType::ScientificAchievement {
            return Err(DraftError::WrongAssignmentKind {
                proposal: self.proposal_type.label(),
            });
        }
        let description = description.into();
        if description.trim().is_empty() {
            return Err(DraftError::EmptyDescription);
        }
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.entity.id() == entity_id)
            .ok_or_else(|| DraftError::UnknownEntity(entity_id.to_string()))?;
        entry.assignment = Some(TitleAssignment::Scientific {
            category,
            description,
        });
        Ok(())
    }

    /// Clear one entity's assignment, dropping a COMPLETE draft back to
    /// IN_PROGRESS.
    pub fn clear_assignment(&mut self, entity_id: &str) -> Result<(), DraftError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.entity.id() == entity_id)
            .ok_or_else(|| DraftError::UnknownEntity(entity_id.to_string()))?;
        entry.assignment = None;
        Ok(())
    }

    /// Serialize the draft for the external submission API. Fails until the
    /// draft is COMPLETE.
    pub fn to_submission_payload(
        &self,
        ctx: &RequestContext,
    ) -> Result<SubmissionPayload, DraftError> {
        if !self.is_complete() {
            return Err(DraftError::IncompleteDraft);
        }
        let entries = self
            .entries
            .iter()
            .filter_map(|entry| {
                entry.assignment.clone().map(|assignment| SubmissionEntry {
                    entity_id: entry.entity.id().to_string(),
                    assignment,
                })
            })
            .collect();
        Ok(SubmissionPayload {
            proposal_type: self.proposal_type,
            year: self.year,
            entity_kind: self.entries[0].entity.kind(),
            entries,
            submitted_by: ctx.actor.clone(),
        })
    }

    /// Terminal action: validate and hand over the payload, consuming the
    /// draft.
    pub fn submit(self, ctx: &RequestContext) -> Result<SubmissionPayload, DraftError> {
        self.to_submission_payload(ctx)
    }
}

/// Final payload handed to the external proposal-submission API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub proposal_type: ProposalType,
    pub year: i32,
    pub entity_kind: EntityKind,
    pub entries: Vec<SubmissionEntry>,
    pub submitted_by: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionEntry {
    pub entity_id: String,
    pub assignment: TitleAssignment,
}
