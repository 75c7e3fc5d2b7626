use crate::infra::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use khen_thuong::error::AppError;
use khen_thuong::workflows::awards::{
    awards_router, AwardHistoryProvider, PersonnelDirectory, PersonnelQuery, PersonnelRecord,
    ProposalGateway, ProposalService, UnitDirectory, UnitId,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PersonnelSearchRequest {
    #[serde(default)]
    pub(crate) unit: Option<String>,
    #[serde(default)]
    pub(crate) name_contains: Option<String>,
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

/// Wizard routes from the library plus the operational endpoints of this
/// service binary.
pub(crate) fn with_awards_routes<P, H, U, G>(
    service: Arc<ProposalService<P, H, U, G>>,
) -> axum::Router
where
    P: PersonnelDirectory + 'static,
    H: AwardHistoryProvider + 'static,
    U: UnitDirectory + 'static,
    G: ProposalGateway + 'static,
{
    let search = axum::Router::new()
        .route(
            "/api/v1/personnel/search",
            axum::routing::post(personnel_search_endpoint::<P, H, U, G>),
        )
        .with_state(service.clone());

    awards_router(service)
        .merge(search)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn personnel_search_endpoint<P, H, U, G>(
    State(service): State<Arc<ProposalService<P, H, U, G>>>,
    Json(request): Json<PersonnelSearchRequest>,
) -> Result<Json<Vec<PersonnelRecord>>, AppError>
where
    P: PersonnelDirectory + 'static,
    H: AwardHistoryProvider + 'static,
    U: UnitDirectory + 'static,
    G: ProposalGateway + 'static,
{
    let query = PersonnelQuery {
        unit: request.unit.map(UnitId),
        name_contains: request.name_contains,
        limit: request.limit,
    };
    let matches = service.search_personnel(&query)?;
    Ok(Json(matches))
}
