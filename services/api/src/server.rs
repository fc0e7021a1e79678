use crate::cli::ServeArgs;
use crate::demo::seed_repository;
use crate::infra::AppState;
use crate::routes::with_gradebook_routes;
use axum::{Extension, Router};
use axum_prometheus::PrometheusMetricLayer;
use gradebook::config::{AppConfig, GradingConfig};
use gradebook::error::AppError;
use gradebook::telemetry;
use gradebook::transcripts::TranscriptService;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    config.server.host = args.host.unwrap_or(config.server.host);
    config.server.port = args.port.unwrap_or(config.server.port);

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let state = AppState {
        readiness: Arc::new(AtomicBool::new(false)),
        metrics: Arc::new(prometheus_handle),
    };
    let readiness = state.readiness.clone();

    let app = gradebook_app(config.grading.clone(), state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness.store(true, Ordering::Release);

    info!(
        environment = ?config.environment,
        %addr,
        required_credits = config.grading.required_credits,
        certificate_prefix = %config.grading.certificate_prefix,
        "gradebook service listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// Routes backed by the seeded in-memory cohort, without the metrics layer.
pub(crate) fn gradebook_app(grading: GradingConfig, state: AppState) -> Router {
    let repository = Arc::new(seed_repository(grading.clone()));
    info!(
        students = repository.student_ids().len(),
        "seeded in-memory transcript repository"
    );

    let service = Arc::new(TranscriptService::new(repository, grading));
    with_gradebook_routes(service).layer(Extension(state))
}
