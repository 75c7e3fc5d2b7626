use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::awards::domain::{
    AwardHistory, AwardHistoryEntry, Gender, MedalFamily, MedalTier, PersonnelId, PersonnelRecord,
    RequestContext, Role, TierStatus, Unit, UnitId,
};
use crate::workflows::awards::eligibility::RequirementTable;
use crate::workflows::awards::ports::{
    AwardHistoryProvider, FetchError, PersonnelDirectory, PersonnelQuery, ProposalGateway,
    SubmissionReceipt, UnitDirectory,
};
use crate::workflows::awards::proposal::SubmissionPayload;
use crate::workflows::awards::service::ProposalService;

/// Fixed evaluation date used across the rule tests.
pub(super) fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn manager_ctx() -> RequestContext {
    RequestContext::new("thieu-ta.nguyen", Role::Manager)
}

fn record(
    id: &str,
    name: &str,
    gender: Option<Gender>,
    enlistment: Option<NaiveDate>,
    unit: &str,
) -> PersonnelRecord {
    PersonnelRecord {
        id: PersonnelId(id.to_string()),
        full_name: name.to_string(),
        gender,
        enlistment_date: enlistment,
        separation_date: None,
        unit: Some(UnitId(unit.to_string())),
        position: Some("Trợ lý".to_string()),
    }
}

/// Enlisted exactly ten years before [`as_of`]: 120 whole months.
pub(super) fn veteran() -> PersonnelRecord {
    record(
        "ps-001",
        "Nguyễn Văn An",
        Some(Gender::Male),
        Some(date(2015, 6, 15)),
        "u-102",
    )
}

/// Enlisted 9 years 11 months before [`as_of`]: one month short.
pub(super) fn near_miss() -> PersonnelRecord {
    record(
        "ps-002",
        "Trần Thị Bình",
        Some(Gender::Female),
        Some(date(2015, 7, 15)),
        "u-102",
    )
}

/// Twenty-five years of service with the lower HCCSVV tiers granted.
pub(super) fn senior() -> PersonnelRecord {
    record(
        "ps-003",
        "Lê Thị Cúc",
        Some(Gender::Female),
        Some(date(2000, 3, 1)),
        "u-101",
    )
}

pub(super) fn missing_dates() -> PersonnelRecord {
    record("ps-004", "Phạm Văn Dũng", Some(Gender::Male), None, "u-101")
}

pub(super) fn unrecorded_gender() -> PersonnelRecord {
    record("ps-005", "Hoàng Văn Em", None, Some(date(1995, 1, 1)), "u-101")
}

pub(super) fn senior_history() -> AwardHistory {
    AwardHistory::from_entries(vec![
        AwardHistoryEntry {
            family: MedalFamily::Hccsvv,
            tier: MedalTier::HangBa,
            status: TierStatus::Granted,
            granted_on: Some(date(2010, 12, 22)),
        },
        AwardHistoryEntry {
            family: MedalFamily::Hccsvv,
            tier: MedalTier::HangNhi,
            status: TierStatus::Granted,
            granted_on: Some(date(2015, 12, 22)),
        },
    ])
}

#[derive(Default, Clone)]
pub(super) struct MemoryPersonnel {
    records: HashMap<String, PersonnelRecord>,
}

impl MemoryPersonnel {
    pub(super) fn with_records(records: Vec<PersonnelRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|record| (record.id.0.clone(), record))
                .collect(),
        }
    }
}

impl PersonnelDirectory for MemoryPersonnel {
    fn fetch(&self, id: &PersonnelId) -> Result<Option<PersonnelRecord>, FetchError> {
        Ok(self.records.get(&id.0).cloned())
    }

    fn search(&self, query: &PersonnelQuery) -> Result<Vec<PersonnelRecord>, FetchError> {
        let mut matches: Vec<PersonnelRecord> = self
            .records
            .values()
            .filter(|record| match &query.unit {
                Some(unit) => record.unit.as_ref() == Some(unit),
                None => true,
            })
            .filter(|record| match &query.name_contains {
                Some(fragment) => record.full_name.contains(fragment.as_str()),
                None => true,
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.id.cmp(&b.id));
        if let Some(limit) = query.limit {
            matches.truncate(limit);
        }
        Ok(matches)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryHistories {
    histories: HashMap<String, AwardHistory>,
}

impl MemoryHistories {
    pub(super) fn with(mut self, id: &str, history: AwardHistory) -> Self {
        self.histories.insert(id.to_string(), history);
        self
    }
}

impl AwardHistoryProvider for MemoryHistories {
    fn history_for(&self, id: &PersonnelId) -> Result<AwardHistory, FetchError> {
        Ok(self.histories.get(&id.0).cloned().unwrap_or_default())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryUnits {
    units: HashMap<String, Unit>,
    members: Vec<PersonnelRecord>,
}

impl MemoryUnits {
    pub(super) fn with_units(units: Vec<Unit>, members: Vec<PersonnelRecord>) -> Self {
        Self {
            units: units
                .into_iter()
                .map(|unit| (unit.id.0.clone(), unit))
                .collect(),
            members,
        }
    }
}

impl UnitDirectory for MemoryUnits {
    fn fetch(&self, id: &UnitId) -> Result<Option<Unit>, FetchError> {
        Ok(self.units.get(&id.0).cloned())
    }

    fn roster(&self, id: &UnitId) -> Result<Vec<PersonnelRecord>, FetchError> {
        Ok(self
            .members
            .iter()
            .filter(|record| record.unit.as_ref() == Some(id))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(super) struct MemoryGateway {
    submissions: Mutex<Vec<SubmissionPayload>>,
}

impl MemoryGateway {
    pub(super) fn submissions(&self) -> Vec<SubmissionPayload> {
        self.submissions
            .lock()
            .expect("gateway mutex poisoned")
            .clone()
    }
}

impl ProposalGateway for MemoryGateway {
    fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, FetchError> {
        let mut guard = self.submissions.lock().expect("gateway mutex poisoned");
        guard.push(payload.clone());
        Ok(SubmissionReceipt {
            proposal_id: format!("prop-{:04}", guard.len()),
            accepted_entries: payload.entries.len(),
        })
    }
}

/// Gateway standing in for a backend that is down.
pub(super) struct UnreachableGateway;

impl ProposalGateway for UnreachableGateway {
    fn submit(&self, _payload: &SubmissionPayload) -> Result<SubmissionReceipt, FetchError> {
        Err(FetchError::Upstream {
            endpoint: "proposal-submission".to_string(),
            status: 503,
        })
    }
}

pub(super) fn directory() -> MemoryPersonnel {
    MemoryPersonnel::with_records(vec![
        veteran(),
        near_miss(),
        senior(),
        missing_dates(),
        unrecorded_gender(),
    ])
}

pub(super) fn histories() -> MemoryHistories {
    MemoryHistories::default().with("ps-003", senior_history())
}

pub(super) fn units() -> MemoryUnits {
    MemoryUnits::with_units(
        vec![
            Unit {
                id: UnitId("u-101".to_string()),
                name: "Tiểu đoàn 1".to_string(),
                parent: None,
            },
            Unit {
                id: UnitId("u-102".to_string()),
                name: "Đại đội 2".to_string(),
                parent: Some(UnitId("u-101".to_string())),
            },
        ],
        vec![
            veteran(),
            near_miss(),
            senior(),
            missing_dates(),
            unrecorded_gender(),
        ],
    )
}

pub(super) type TestService =
    ProposalService<MemoryPersonnel, MemoryHistories, MemoryUnits, MemoryGateway>;

pub(super) fn build_service() -> (TestService, Arc<MemoryGateway>) {
    let gateway = Arc::new(MemoryGateway::default());
    let service = ProposalService::new(
        Arc::new(directory()),
        Arc::new(histories()),
        Arc::new(units()),
        gateway.clone(),
        RequirementTable::standard(),
    );
    (service, gateway)
}

pub(super) fn build_service_with_unreachable_gateway(
) -> ProposalService<MemoryPersonnel, MemoryHistories, MemoryUnits, UnreachableGateway> {
    ProposalService::new(
        Arc::new(directory()),
        Arc::new(histories()),
        Arc::new(units()),
        Arc::new(UnreachableGateway),
        RequirementTable::standard(),
    )
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
