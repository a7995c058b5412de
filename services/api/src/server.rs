use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryApplicantRepository};
use crate::routes::with_portal_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use recruit_portal::config::AppConfig;
use recruit_portal::error::AppError;
use recruit_portal::telemetry;
use recruit_portal::workflows::recruitment::applicants::PortalService;
use recruit_portal::workflows::recruitment::DepartmentRegistry;
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

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryApplicantRepository::default());
    let registry = Arc::new(DepartmentRegistry::standard());
    let portal_service = Arc::new(PortalService::new(repository, registry, config.portal));

    let app = with_portal_routes(portal_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        max_departments = config.portal.max_departments,
        page_size = config.portal.page_size,
        "recruitment portal ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
