use crate::cli::ServeArgs;
use crate::infra::{build_gateway, AppState};
use crate::routes::with_schedule_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use enrollment_admin::config::AppConfig;
use enrollment_admin::error::AppError;
use enrollment_admin::telemetry;
use enrollment_admin::workflows::scheduling::{InMemorySessionStore, ScheduleWizardService};
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

    let store = Arc::new(InMemorySessionStore::new(config.server.session_idle_timeout));
    let gateway = Arc::new(build_gateway(&config.upstream)?);
    let schedule_service = Arc::new(ScheduleWizardService::new(store, gateway));

    let app = with_schedule_routes(schedule_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        upstream = %config.upstream.base_url,
        "enrollment admin backend ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
