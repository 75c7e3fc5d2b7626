//! End-to-end scenarios for the proposal wizard: draft assembly, eligibility
//! gating, and submission hand-off, exercised through the public service
//! facade and the HTTP router only.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use chrono::NaiveDate;

    use khen_thuong::workflows::awards::{
        AwardHistory, AwardHistoryEntry, AwardHistoryProvider, FetchError, Gender, MedalFamily,
        MedalTier, PersonnelDirectory, PersonnelId, PersonnelQuery, PersonnelRecord,
        ProposalGateway, ProposalService, RequestContext, RequirementTable, Role,
        SubmissionPayload, SubmissionReceipt, TierStatus, Unit, UnitDirectory, UnitId,
    };

    pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    pub fn as_of() -> NaiveDate {
        date(2025, 6, 15)
    }

    pub fn ctx() -> RequestContext {
        RequestContext::new("dai-uy.pham", Role::Admin)
    }

    fn roster() -> Vec<PersonnelRecord> {
        vec![
            PersonnelRecord {
                id: PersonnelId("qnhan-10".to_string()),
                full_name: "Nguyễn Văn An".to_string(),
                gender: Some(Gender::Male),
                enlistment_date: Some(date(2015, 6, 15)),
                separation_date: None,
                unit: Some(UnitId("d-ban-1".to_string())),
                position: Some("Tiểu đội trưởng".to_string()),
            },
            PersonnelRecord {
                id: PersonnelId("qnhan-11".to_string()),
                full_name: "Lê Thị Cúc".to_string(),
                gender: Some(Gender::Female),
                enlistment_date: Some(date(2000, 3, 1)),
                separation_date: None,
                unit: Some(UnitId("d-ban-1".to_string())),
                position: Some("Trợ lý chính trị".to_string()),
            },
        ]
    }

    pub struct StubDirectory;

    impl PersonnelDirectory for StubDirectory {
        fn fetch(&self, id: &PersonnelId) -> Result<Option<PersonnelRecord>, FetchError> {
            Ok(roster().into_iter().find(|record| &record.id == id))
        }

        fn search(&self, query: &PersonnelQuery) -> Result<Vec<PersonnelRecord>, FetchError> {
            let mut matches: Vec<PersonnelRecord> = roster()
                .into_iter()
                .filter(|record| match &query.unit {
                    Some(unit) => record.unit.as_ref() == Some(unit),
                    None => true,
                })
                .filter(|record| match &query.name_contains {
                    Some(fragment) => record.full_name.contains(fragment.as_str()),
                    None => true,
                })
                .collect();
            if let Some(limit) = query.limit {
                matches.truncate(limit);
            }
            Ok(matches)
        }
    }

    pub struct StubHistories;

    impl AwardHistoryProvider for StubHistories {
        fn history_for(&self, id: &PersonnelId) -> Result<AwardHistory, FetchError> {
            if id.0 == "qnhan-11" {
                Ok(AwardHistory::from_entries(vec![AwardHistoryEntry {
                    family: MedalFamily::Hccsvv,
                    tier: MedalTier::HangBa,
                    status: TierStatus::Granted,
                    granted_on: Some(date(2010, 12, 22)),
                }]))
            } else {
                Ok(AwardHistory::default())
            }
        }
    }

    pub struct StubUnits;

    impl UnitDirectory for StubUnits {
        fn fetch(&self, id: &UnitId) -> Result<Option<Unit>, FetchError> {
            if id.0 == "d-ban-1" {
                Ok(Some(Unit {
                    id: id.clone(),
                    name: "Đại đội 1".to_string(),
                    parent: None,
                }))
            } else {
                Ok(None)
            }
        }

        fn roster(&self, id: &UnitId) -> Result<Vec<PersonnelRecord>, FetchError> {
            Ok(roster()
                .into_iter()
                .filter(|record| record.unit.as_ref() == Some(id))
                .collect())
        }
    }

    #[derive(Default)]
    pub struct RecordingGateway {
        pub submissions: Mutex<Vec<SubmissionPayload>>,
        pub receipts: Mutex<HashMap<String, usize>>,
    }

    impl ProposalGateway for RecordingGateway {
        fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, FetchError> {
            let mut guard = self.submissions.lock().expect("gateway mutex poisoned");
            guard.push(payload.clone());
            let proposal_id = format!("kt-2025-{:03}", guard.len());
            self.receipts
                .lock()
                .expect("receipt mutex poisoned")
                .insert(proposal_id.clone(), payload.entries.len());
            Ok(SubmissionReceipt {
                proposal_id,
                accepted_entries: payload.entries.len(),
            })
        }
    }

    pub type Stack = ProposalService<StubDirectory, StubHistories, StubUnits, RecordingGateway>;

    pub fn stack() -> (Stack, Arc<RecordingGateway>) {
        let gateway = Arc::new(RecordingGateway::default());
        let service = ProposalService::new(
            Arc::new(StubDirectory),
            Arc::new(StubHistories),
            Arc::new(StubUnits),
            gateway.clone(),
            RequirementTable::standard(),
        );
        (service, gateway)
    }
}

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::util::ServiceExt;

use khen_thuong::workflows::awards::{
    awards_router, AssignmentOutcome, DraftState, MedalFamily, MedalTier, PersonnelId,
    ProposalServiceError, ProposalType, TitleCode,
};

use common::{as_of, ctx, stack};

#[test]
fn nien_han_wizard_round_trip() {
    let (service, gateway) = stack();
    let draft_id = service.start_draft(ProposalType::NienHan, 2025);

    service
        .add_personnel(&draft_id, PersonnelId("qnhan-10".to_string()))
        .expect("personnel exists");
    service
        .add_personnel(&draft_id, PersonnelId("qnhan-11".to_string()))
        .expect("personnel exists");

    // Ten years on the day: Hạng Ba is in reach for qnhan-10.
    let outcome = service
        .assign_title(&draft_id, "qnhan-10", TitleCode::HccsvvHangBa, as_of())
        .expect("assignment runs");
    assert!(matches!(outcome, AssignmentOutcome::Applied { .. }));

    // qnhan-11 already holds Hạng Ba, so the next tier is the valid pick.
    let outcome = service
        .assign_title(&draft_id, "qnhan-11", TitleCode::HccsvvHangBa, as_of())
        .expect("assignment runs");
    assert!(matches!(outcome, AssignmentOutcome::Ineligible { .. }));

    let outcome = service
        .assign_title(&draft_id, "qnhan-11", TitleCode::HccsvvHangNhi, as_of())
        .expect("assignment runs");
    assert_eq!(
        outcome,
        AssignmentOutcome::Applied {
            state: DraftState::Complete
        }
    );

    let receipt = service.submit(&draft_id, &ctx()).expect("draft submits");
    assert_eq!(receipt.accepted_entries, 2);

    let submissions = gateway.submissions.lock().expect("gateway mutex");
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].year, 2025);
    assert_eq!(submissions[0].submitted_by, "dai-uy.pham");

    drop(submissions);
    let second = service.submit(&draft_id, &ctx());
    assert!(matches!(
        second,
        Err(ProposalServiceError::DraftNotFound(_))
    ));
}

#[test]
fn eligibility_check_matches_rule_tables() {
    let (service, _gateway) = stack();

    let assessment = service
        .check_eligibility(
            &PersonnelId("qnhan-11".to_string()),
            MedalFamily::Hccsvv,
            MedalTier::HangNhi,
            as_of(),
        )
        .expect("check runs");
    assert!(assessment.eligible);

    let repeat = service
        .check_eligibility(
            &PersonnelId("qnhan-11".to_string()),
            MedalFamily::Hccsvv,
            MedalTier::HangBa,
            as_of(),
        )
        .expect("check runs");
    assert!(!repeat.eligible);
    assert!(repeat.reason_text().contains("already granted"));
}

#[tokio::test]
async fn http_surface_covers_the_wizard() {
    let (service, _gateway) = stack();
    let app = awards_router(Arc::new(service));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/proposals")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({ "proposal_type": "unit_level", "year": 2025 }).to_string(),
                ))
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    let body: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
    let draft_id = body["draft_id"].as_str().expect("draft id").to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/v1/proposals/{draft_id}/entities"))
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({ "entity": { "kind": "unit", "id": "d-ban-1" } }).to_string(),
                ))
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!(
                    "/api/v1/proposals/{draft_id}/entities/unknown-unit/assignment"
                ))
                .header("content-type", "application/json")
                .body(Body::from(json!({ "title": "CSTDTQ" }).to_string()))
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
