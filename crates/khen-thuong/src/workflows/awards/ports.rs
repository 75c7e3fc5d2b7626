use serde::{Deserialize, Serialize};

use super::domain::{AwardHistory, PersonnelId, PersonnelRecord, Unit, UnitId};
use super::proposal::SubmissionPayload;

/// Failure reaching one of the backend endpoints. Surfaced to the caller
/// for a user-visible retry prompt; no retry happens down here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("transport failure reaching {endpoint}: {detail}")]
    Transport { endpoint: String, detail: String },
    #[error("{endpoint} responded with status {status}")]
    Upstream { endpoint: String, status: u16 },
    #[error("could not decode {endpoint} response: {detail}")]
    Decode { endpoint: String, detail: String },
}

/// Filter parameters pushed down to the personnel endpoint instead of
/// fetching whole collections and filtering in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonnelQuery {
    pub unit: Option<UnitId>,
    pub name_contains: Option<String>,
    pub limit: Option<usize>,
}

/// Personnel lookup backed by the external personnel-management API.
pub trait PersonnelDirectory: Send + Sync {
    fn fetch(&self, id: &PersonnelId) -> Result<Option<PersonnelRecord>, FetchError>;
    fn search(&self, query: &PersonnelQuery) -> Result<Vec<PersonnelRecord>, FetchError>;
}

/// Award-profile lookup backed by the external profile API.
pub trait AwardHistoryProvider: Send + Sync {
    fn history_for(&self, id: &PersonnelId) -> Result<AwardHistory, FetchError>;
}

/// Organizational hierarchy lookup for unit-level proposals.
pub trait UnitDirectory: Send + Sync {
    fn fetch(&self, id: &UnitId) -> Result<Option<Unit>, FetchError>;
    fn roster(&self, id: &UnitId) -> Result<Vec<PersonnelRecord>, FetchError>;
}

/// Acknowledgement returned by the submission endpoint. Approval workflow
/// after this point is entirely server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub proposal_id: String,
    pub accepted_entries: usize,
}

/// Hand-off boundary to the external proposal-submission API.
pub trait ProposalGateway: Send + Sync {
    fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, FetchError>;
}
