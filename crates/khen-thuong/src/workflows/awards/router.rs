use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    MedalFamily, MedalTier, PersonnelId, ProposalType, RequestContext, Role, TitleCode, UnitId,
};
use super::ports::{AwardHistoryProvider, PersonnelDirectory, ProposalGateway, UnitDirectory};
use super::proposal::{DraftError, EntityRef, ScientificCategory};
use super::service::{DraftId, ProposalService, ProposalServiceError};

/// Router builder exposing the proposal wizard and eligibility endpoints.
pub fn awards_router<P, H, U, G>(service: Arc<ProposalService<P, H, U, G>>) -> Router
where
    P: PersonnelDirectory + 'static,
    H: AwardHistoryProvider + 'static,
    U: UnitDirectory + 'static,
    G: ProposalGateway + 'static,
{
    Router::new()
        .route("/api/v1/proposals", post(start_draft_handler::<P, H, U, G>))
        .route(
            "/api/v1/proposals/:draft_id",
            get(draft_view_handler::<P, H, U, G>),
        )
        .route(
            "/api/v1/proposals/:draft_id/entities",
            post(add_entity_handler::<P, H, U, G>),
        )
        .route(
            "/api/v1/proposals/:draft_id/entities/:entity_id",
            delete(remove_entity_handler::<P, H, U, G>),
        )
        .route(
            "/api/v1/proposals/:draft_id/entities/:entity_id/assignment",
            post(assignment_handler::<P, H, U, G>),
        )
        .route(
            "/api/v1/proposals/:draft_id/submit",
            post(submit_handler::<P, H, U, G>),
        )
        .route(
            "/api/v1/eligibility/check",
            post(eligibility_check_handler::<P, H, U, G>),
        )
        .route(
            "/api/v1/units/:unit_id/roster",
            get(unit_roster_handler::<P, H, U, G>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct StartDraftRequest {
    pub(crate) proposal_type: ProposalType,
    pub(crate) year: i32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddEntityRequest {
    pub(crate) entity: EntityRef,
}

/// Either a title code or a scientific category/description pair, with an
/// optional injected evaluation date.
#[derive(Debug, Deserialize)]
pub(crate) struct AssignmentRequest {
    pub(crate) title: Option<TitleCode>,
    pub(crate) category: Option<ScientificCategory>,
    pub(crate) description: Option<String>,
    pub(crate) as_of: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitRequest {
    pub(crate) actor: String,
    pub(crate) role: Role,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EligibilityCheckRequest {
    pub(crate) personnel_id: String,
    pub(crate) family: MedalFamily,
    pub(crate) tier: MedalTier,
    pub(crate) as_of: Option<NaiveDate>,
}

pub(crate) async fn start_draft_handler<P, H, U, G>(
    State(service): State<Arc<ProposalService<P, H, U, G>>>,
    axum::Json(request): axum::Json<StartDraftRequest>,
) -> Response
where
    P: PersonnelDirectory + 'static,
    H: AwardHistoryProvider + 'static,
    U: UnitDirectory + 'static,
    G: ProposalGateway + 'static,
{
    let draft_id = service.start_draft(request.proposal_type, request.year);
    match service.draft_view(&draft_id) {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn draft_view_handler<P, H, U, G>(
    State(service): State<Arc<ProposalService<P, H, U, G>>>,
    Path(draft_id): Path<String>,
) -> Response
where
    P: PersonnelDirectory + 'static,
    H: AwardHistoryProvider + 'static,
    U: UnitDirectory + 'static,
    G: ProposalGateway + 'static,
{
    match service.draft_view(&DraftId(draft_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn add_entity_handler<P, H, U, G>(
    State(service): State<Arc<ProposalService<P, H, U, G>>>,
    Path(draft_id): Path<String>,
    axum::Json(request): axum::Json<AddEntityRequest>,
) -> Response
where
    P: PersonnelDirectory + 'static,
    H: AwardHistoryProvider + 'static,
    U: UnitDirectory + 'static,
    G: ProposalGateway + 'static,
{
    let draft_id = DraftId(draft_id);
    let result = match request.entity {
        EntityRef::Personnel(id) => service.add_personnel(&draft_id, id),
        EntityRef::Unit(id) => service.add_unit(&draft_id, id),
    };
    match result {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn remove_entity_handler<P, H, U, G>(
    State(service): State<Arc<ProposalService<P, H, U, G>>>,
    Path((draft_id, entity_id)): Path<(String, String)>,
) -> Response
where
    P: PersonnelDirectory + 'static,
    H: AwardHistoryProvider + 'static,
    U: UnitDirectory + 'static,
    G: ProposalGateway + 'static,
{
    match service.remove_entity(&DraftId(draft_id), &entity_id) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn assignment_handler<P, H, U, G>(
    State(service): State<Arc<ProposalService<P, H, U, G>>>,
    Path((draft_id, entity_id)): Path<(String, String)>,
    axum::Json(request): axum::Json<AssignmentRequest>,
) -> Response
where
    P: PersonnelDirectory + 'static,
    H: AwardHistoryProvider + 'static,
    U: UnitDirectory + 'static,
    G: ProposalGateway + 'static,
{
    let draft_id = DraftId(draft_id);
    let as_of = request.as_of.unwrap_or_else(|| Local::now().date_naive());

    match (request.title, request.category, request.description) {
        (Some(title), None, None) => {
            match service.assign_title(&draft_id, &entity_id, title, as_of) {
                Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
                Err(error) => error_response(error),
            }
        }
        (None, Some(category), Some(description)) => {
            match service.assign_scientific(&draft_id, &entity_id, category, description) {
                Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
                Err(error) => error_response(error),
            }
        }
        _ => {
            let payload = json!({
                "error": "provide either a title or a category with a description",
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn submit_handler<P, H, U, G>(
    State(service): State<Arc<ProposalService<P, H, U, G>>>,
    Path(draft_id): Path<String>,
    axum::Json(request): axum::Json<SubmitRequest>,
) -> Response
where
    P: PersonnelDirectory + 'static,
    H: AwardHistoryProvider + 'static,
    U: UnitDirectory + 'static,
    G: ProposalGateway + 'static,
{
    let ctx = RequestContext::new(request.actor, request.role);
    match service.submit(&DraftId(draft_id), &ctx) {
        Ok(receipt) => (StatusCode::OK, axum::Json(receipt)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn eligibility_check_handler<P, H, U, G>(
    State(service): State<Arc<ProposalService<P, H, U, G>>>,
    axum::Json(request): axum::Json<EligibilityCheckRequest>,
) -> Response
where
    P: PersonnelDirectory + 'static,
    H: AwardHistoryProvider + 'static,
    U: UnitDirectory + 'static,
    G: ProposalGateway + 'static,
{
    let as_of = request.as_of.unwrap_or_else(|| Local::now().date_naive());
    let result = service.check_eligibility(
        &PersonnelId(request.personnel_id),
        request.family,
        request.tier,
        as_of,
    );
    match result {
        Ok(assessment) => (StatusCode::OK, axum::Json(assessment)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn unit_roster_handler<P, H, U, G>(
    State(service): State<Arc<ProposalService<P, H, U, G>>>,
    Path(unit_id): Path<String>,
) -> Response
where
    P: PersonnelDirectory + 'static,
    H: AwardHistoryProvider + 'static,
    U: UnitDirectory + 'static,
    G: ProposalGateway + 'static,
{
    match service.unit_roster(&UnitId(unit_id)) {
        Ok(roster) => (StatusCode::OK, axum::Json(roster)).into_response(),
        Err(error) => error_response(error),
    }
}

/// Map service errors onto HTTP statuses: lookups that missed are 404,
/// caller misuse 409/422, upstream failures 502.
fn error_response(error: ProposalServiceError) -> Response {
    let status = match &error {
        ProposalServiceError::DraftNotFound(_)
        | ProposalServiceError::PersonnelNotFound(_)
        | ProposalServiceError::UnitNotFound(_) => StatusCode::NOT_FOUND,
        ProposalServiceError::Draft(DraftError::IncompleteDraft) => StatusCode::CONFLICT,
        ProposalServiceError::Draft(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ProposalServiceError::Fetch(_) => StatusCode::BAD_GATEWAY,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
