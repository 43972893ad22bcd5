use crate::cli::ServeArgs;
use crate::infra::{AppState, AuditLog};
use crate::routes::with_registry_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use hiring_ledger::config::{AppConfig, RegistryConfig};
use hiring_ledger::error::AppError;
use hiring_ledger::registry::{Registry, Roster};
use hiring_ledger::telemetry;
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
    if let Some(admin) = args.admin.take() {
        config.registry.admin = RegistryConfig::admin_identity(&admin)?;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let audit = Arc::new(AuditLog::default());
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        audit: audit.clone(),
    };

    let registry = Arc::new(Registry::new(config.registry.admin.clone(), audit));
    let roster = Roster::from_paths(
        config.registry.applicants_csv.as_deref(),
        config.registry.jobs_csv.as_deref(),
    )?;
    if !roster.is_empty() {
        let summary = registry.seed(roster)?;
        info!(
            applicants = summary.applicants.len(),
            jobs = summary.jobs.len(),
            "roster loaded"
        );
    }

    let app = with_registry_routes(registry)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, admin = %config.registry.admin, "hiring ledger ready");

    axum::serve(listener, app).await?;
    Ok(())
}
