use crate::cli::ServeArgs;
use crate::infra::{load_reference_dataset, AppState, InMemoryScoreRecordStore};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;
use warroom_scoring::config::AppConfig;
use warroom_scoring::error::AppError;
use warroom_scoring::scoring::{
    GradingService, ScoringConfig, ScoringEngine, TemplateCatalog,
};
use warroom_scoring::telemetry;
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
        started_at: Instant::now(),
    };

    let reference = load_reference_dataset(&config.data)?;
    let engine = ScoringEngine::new(
        TemplateCatalog::standard(),
        ScoringConfig::default(),
        reference,
    );
    let records = Arc::new(InMemoryScoreRecordStore::default());
    let grading_service = Arc::new(GradingService::new(
        engine,
        records,
        config.admin.admin_key.clone(),
    ));

    let app = with_service_routes(grading_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "war room scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
