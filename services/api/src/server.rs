use crate::cli::ServeArgs;
use crate::infra::{
    AppState, RecordingProposalGateway, SeededAwardHistories, SeededPersonnelDirectory,
    SeededUnitDirectory,
};
use crate::routes::with_awards_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use khen_thuong::config::AppConfig;
use khen_thuong::error::AppError;
use khen_thuong::telemetry;
use khen_thuong::workflows::awards::{ProposalService, RequirementTable};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let personnel = Arc::new(SeededPersonnelDirectory::default());
    let histories = Arc::new(SeededAwardHistories::default());
    let units = Arc::new(SeededUnitDirectory::default());
    let gateway = Arc::new(RecordingProposalGateway::default());
    let proposal_service = Arc::new(ProposalService::new(
        personnel,
        histories,
        units,
        gateway,
        RequirementTable::standard(),
    ));

    let app = with_awards_routes(proposal_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "award proposal service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
