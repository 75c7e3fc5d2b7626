use chrono::NaiveDate;
use khen_thuong::workflows::awards::{
    AwardHistory, AwardHistoryEntry, AwardHistoryProvider, FetchError, Gender, MedalFamily,
    MedalTier, PersonnelDirectory, PersonnelId, PersonnelQuery, PersonnelRecord, ProposalGateway,
    SubmissionPayload, SubmissionReceipt, TierStatus, Unit, UnitDirectory, UnitId,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Personnel directory seeded with a demo roster, standing in for the
/// external personnel-management API.
#[derive(Clone)]
pub(crate) struct SeededPersonnelDirectory {
    records: HashMap<String, PersonnelRecord>,
}

impl Default for SeededPersonnelDirectory {
    fn default() -> Self {
        Self {
            records: demo_roster()
                .into_iter()
                .map(|record| (record.id.0.clone(), record))
                .collect(),
        }
    }
}

impl PersonnelDirectory for SeededPersonnelDirectory {
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

/// Award-profile provider seeded alongside the demo roster. People without
/// a seeded profile get an empty history.
#[derive(Clone)]
pub(crate) struct SeededAwardHistories {
    histories: HashMap<String, AwardHistory>,
}

impl Default for SeededAwardHistories {
    fn default() -> Self {
        let mut histories = HashMap::new();
        histories.insert(
            "qn-0003".to_string(),
            AwardHistory::from_entries(vec![
                AwardHistoryEntry {
                    family: MedalFamily::Hccsvv,
                    tier: MedalTier::HangBa,
                    status: TierStatus::Granted,
                    granted_on: NaiveDate::from_ymd_opt(2012, 12, 22),
                },
                AwardHistoryEntry {
                    family: MedalFamily::Hccsvv,
                    tier: MedalTier::HangNhi,
                    status: TierStatus::Granted,
                    granted_on: NaiveDate::from_ymd_opt(2017, 12, 22),
                },
            ]),
        );
        Self { histories }
    }
}

impl AwardHistoryProvider for SeededAwardHistories {
    fn history_for(&self, id: &PersonnelId) -> Result<AwardHistory, FetchError> {
        Ok(self.histories.get(&id.0).cloned().unwrap_or_default())
    }
}

/// Two-level demo unit hierarchy.
#[derive(Clone)]
pub(crate) struct SeededUnitDirectory {
    units: HashMap<String, Unit>,
}

impl Default for SeededUnitDirectory {
    fn default() -> Self {
        let battalion = Unit {
            id: UnitId("d-1".to_string()),
            name: "Tiểu đoàn 1".to_string(),
            parent: None,
        };
        let company = Unit {
            id: UnitId("c-2".to_string()),
            name: "Đại đội 2".to_string(),
            parent: Some(battalion.id.clone()),
        };
        Self {
            units: [battalion, company]
                .into_iter()
                .map(|unit| (unit.id.0.clone(), unit))
                .collect(),
        }
    }
}

impl UnitDirectory for SeededUnitDirectory {
    fn fetch(&self, id: &UnitId) -> Result<Option<Unit>, FetchError> {
        Ok(self.units.get(&id.0).cloned())
    }

    fn roster(&self, id: &UnitId) -> Result<Vec<PersonnelRecord>, FetchError> {
        Ok(demo_roster()
            .into_iter()
            .filter(|record| record.unit.as_ref() == Some(id))
            .collect())
    }
}

/// Gateway that acknowledges submissions locally and keeps them for
/// inspection, standing in for the external submission endpoint.
#[derive(Default)]
pub(crate) struct RecordingProposalGateway {
    submissions: Mutex<Vec<SubmissionPayload>>,
}

impl RecordingProposalGateway {
    pub(crate) fn submissions(&self) -> Vec<SubmissionPayload> {
        self.submissions
            .lock()
            .expect("gateway mutex poisoned")
            .clone()
    }
}

impl ProposalGateway for RecordingProposalGateway {
    fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, FetchError> {
        let mut guard = self.submissions.lock().expect("gateway mutex poisoned");
        guard.push(payload.clone());
        let receipt = SubmissionReceipt {
            proposal_id: format!("kt-{}-{:03}", payload.year, guard.len()),
            accepted_entries: payload.entries.len(),
        };
        info!(
            proposal = %receipt.proposal_id,
            entries = receipt.accepted_entries,
            "proposal accepted by local gateway"
        );
        Ok(receipt)
    }
}

pub(crate) fn demo_roster() -> Vec<PersonnelRecord> {
    vec![
        PersonnelRecord {
            id: PersonnelId("qn-0001".to_string()),
            full_name: "Nguyễn Văn An".to_string(),
            gender: Some(Gender::Male),
            enlistment_date: NaiveDate::from_ymd_opt(2015, 2, 16),
            separation_date: None,
            unit: Some(UnitId("c-2".to_string())),
            position: Some("Tiểu đội trưởng".to_string()),
        },
        PersonnelRecord {
            id: PersonnelId("qn-0002".to_string()),
            full_name: "Trần Thị Bình".to_string(),
            gender: Some(Gender::Female),
            enlistment_date: NaiveDate::from_ymd_opt(2018, 9, 3),
            separation_date: None,
            unit: Some(UnitId("c-2".to_string())),
            position: Some("Nhân viên quân y".to_string()),
        },
        PersonnelRecord {
            id: PersonnelId("qn-0003".to_string()),
            full_name: "Lê Thị Cúc".to_string(),
            gender: Some(Gender::Female),
            enlistment_date: NaiveDate::from_ymd_opt(2000, 3, 1),
            separation_date: None,
            unit: Some(UnitId("d-1".to_string())),
            position: Some("Trợ lý chính trị".to_string()),
        },
        PersonnelRecord {
            id: PersonnelId("qn-0004".to_string()),
            full_name: "Phạm Văn Dũng".to_string(),
            gender: Some(Gender::Male),
            enlistment_date: None,
            separation_date: None,
            unit: Some(UnitId("d-1".to_string())),
            position: None,
        },
    ]
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_family(raw: &str) -> Result<MedalFamily, String> {
    match raw.trim().to_ascii_uppercase().as_str() {
        "HCCSVV" => Ok(MedalFamily::Hccsvv),
        "HC_QKQT" => Ok(MedalFamily::HcQkqt),
        "KNC_VSNXD_QDNDVN" | "KNC" => Ok(MedalFamily::KncVsnxdQdndvn),
        "HCBVTQ" => Ok(MedalFamily::Hcbvtq),
        other => Err(format!("unknown medal family '{other}'")),
    }
}

pub(crate) fn parse_tier(raw: &str) -> Result<MedalTier, String> {
    match raw.trim().to_ascii_uppercase().as_str() {
        "HANG_BA" | "BA" => Ok(MedalTier::HangBa),
        "HANG_NHI" | "NHI" => Ok(MedalTier::HangNhi),
        "HANG_NHAT" | "NHAT" => Ok(MedalTier::HangNhat),
        other => Err(format!("unknown medal tier '{other}'")),
    }
}
