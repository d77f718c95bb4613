use crate::cli::ServeArgs;
use crate::infra::{load_cohort_catalog, load_rule_table, AppState, InMemoryAssessmentRepository};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use lifescore::assessments::AssessmentService;
use lifescore::config::AppConfig;
use lifescore::error::AppError;
use lifescore::scoring::AssessmentEngine;
use lifescore::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let engine = Arc::new(AssessmentEngine::new(load_rule_table(&config.scoring)?));
    let cohorts = Arc::new(load_cohort_catalog(&config.scoring)?);
    let repository = Arc::new(InMemoryAssessmentRepository::default());
    let service = Arc::new(AssessmentService::new(repository, engine, cohorts));

    let app = with_assessment_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "life assessment scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
