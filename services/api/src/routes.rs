use crate::infra::{AppState, Marketplace};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use driverhire::auth::SessionGate;
use driverhire::workflows::bookings::booking_router;
use driverhire::workflows::feedback::feedback_router;
use driverhire::workflows::notifications::Notifier;
use driverhire::workflows::profiles::profile_router;
use serde_json::json;

pub(crate) fn with_marketplace_routes<N>(
    marketplace: &Marketplace<N>,
    sessions: SessionGate,
) -> axum::Router
where
    N: Notifier + 'static,
{
    profile_router(marketplace.profiles.clone(), sessions.clone())
        .merge(booking_router(marketplace.bookings.clone(), sessions.clone()))
        .merge(feedback_router(marketplace.feedback.clone(), sessions))
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
