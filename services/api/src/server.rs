use crate::cli::ServeArgs;
use crate::infra::{AppState, Marketplace};
use crate::routes::with_marketplace_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use driverhire::auth::SessionGate;
use driverhire::config::AppConfig;
use driverhire::error::AppError;
use driverhire::telemetry;
use driverhire::workflows::notifications::ResendNotifier;
use driverhire::workflows::profiles::{ProfileServiceError, ProfileSettings};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

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

    let notifier = Arc::new(ResendNotifier::new(&config.notifications));
    if !notifier.is_configured() {
        warn!("RESEND_API_KEY not set; outbound e-mail will be skipped");
    }

    let settings = ProfileSettings::from_config(&config.notifications, &config.storage);
    let marketplace = Marketplace::in_memory(notifier, settings);
    for admin in &args.admins {
        marketplace
            .seed_admin(admin, None)
            .map_err(ProfileServiceError::from)?;
        info!(%admin, "admin profile provisioned");
    }

    let sessions = SessionGate::from_config(&config.auth);
    if !sessions.is_enabled() {
        warn!("AUTH_JWT_SECRET not set; session-protected routes will answer 401");
    }

    let app = with_marketplace_routes(&marketplace, sessions)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "driverhire marketplace ready");

    axum::serve(listener, app).await?;
    Ok(())
}
