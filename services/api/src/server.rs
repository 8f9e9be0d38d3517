use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryCrewStore, SeededCatalog};
use crate::routes::with_selection_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use trek_select::config::AppConfig;
use trek_select::error::AppError;
use trek_select::telemetry;
use trek_select::workflows::selection::SelectionService;

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

    let catalog = Arc::new(SeededCatalog::default());
    let crews = Arc::new(InMemoryCrewStore::default());
    let selection_service = Arc::new(SelectionService::new(catalog, crews));

    let app = with_selection_routes(selection_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "trek selection service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
