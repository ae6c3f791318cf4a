use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::json;

use super::domain::{
    AvailabilityRequest, DriverDirectoryQuery, KycDecisionRequest, KycSubmissionRequest,
    ProfileId, UpdateDriverProfileRequest, UpsertProfileRequest, UserSearchQuery,
    UserStatusRequest,
};
use super::repository::ProfileRepository;
use super::service::{ProfileService, ProfileServiceError};
use crate::auth::{ensure_same_user, require_session, Session, SessionGate};
use crate::workflows::http::{access_status, error_response, repository_status};
use crate::workflows::notifications::Notifier;

type SharedService<R, N> = Arc<ProfileService<R, N>>;

/// Router exposing profile, availability and KYC endpoints.
pub fn profile_router<R, N>(service: SharedService<R, N>, sessions: SessionGate) -> Router
where
    R: ProfileRepository + 'static,
    N: Notifier + 'static,
{
    let protected = Router::new()
        .route("/api/v1/profiles/upsert", post(upsert_handler::<R, N>))
        .route("/api/v1/profiles/kyc", post(submit_kyc_handler::<R, N>))
        .route(
            "/api/v1/drivers/availability",
            post(availability_handler::<R, N>),
        )
        .route(
            "/api/v1/drivers/profile",
            post(update_driver_handler::<R, N>),
        )
        .route("/api/v1/admin/users", get(list_users_handler::<R, N>))
        .route(
            "/api/v1/admin/user-status",
            post(user_status_handler::<R, N>),
        )
        .route(
            "/api/v1/admin/approve-drivers",
            post(approve_drivers_handler::<R, N>),
        )
        .route("/api/v1/admin/kyc", get(pending_kyc_handler::<R, N>))
        .route(
            "/api/v1/admin/kyc/decision",
            post(decide_kyc_handler::<R, N>),
        )
        .route_layer(middleware::from_fn_with_state(sessions, require_session));

    Router::new()
        .route("/api/v1/drivers", get(list_drivers_handler::<R, N>))
        .route(
            "/api/v1/profiles/:profile_id",
            get(get_profile_handler::<R, N>),
        )
        .merge(protected)
        .with_state(service)
}

pub(crate) fn service_error_response(error: ProfileServiceError) -> Response {
    let status = match &error {
        ProfileServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ProfileServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ProfileServiceError::Repository(inner) => repository_status(inner),
        ProfileServiceError::Access(inner) => access_status(inner),
    };
    error_response(status, error.to_string())
}

pub(crate) async fn upsert_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Extension(session): Extension<Session>,
    Json(request): Json<UpsertProfileRequest>,
) -> Response
where
    R: ProfileRepository + 'static,
    N: Notifier + 'static,
{
    if let Err(err) = ensure_same_user(&session, request.id.as_deref(), "id") {
        return service_error_response(err.into());
    }
    match service.upsert_on_auth(request) {
        Ok(profile) => (StatusCode::OK, Json(json!({ "profile": profile }))).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn submit_kyc_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Extension(session): Extension<Session>,
    Json(request): Json<KycSubmissionRequest>,
) -> Response
where
    R: ProfileRepository + 'static,
    N: Notifier + 'static,
{
    if let Err(err) = ensure_same_user(&session, request.id.as_deref(), "id") {
        return service_error_response(err.into());
    }
    match service.submit_kyc(request).await {
        Ok(outcome) => {
            let payload = json!({
                "success": true,
                "profile": outcome.profile,
                "notification": outcome.notification,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn availability_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Extension(session): Extension<Session>,
    Json(request): Json<AvailabilityRequest>,
) -> Response
where
    R: ProfileRepository + 'static,
    N: Notifier + 'static,
{
    if let Err(err) = ensure_same_user(&session, request.id.as_deref(), "id") {
        return service_error_response(err.into());
    }
    match service.toggle_availability(request) {
        Ok(profile) => (StatusCode::OK, Json(json!({ "profile": profile }))).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn update_driver_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Extension(session): Extension<Session>,
    Json(request): Json<UpdateDriverProfileRequest>,
) -> Response
where
    R: ProfileRepository + 'static,
    N: Notifier + 'static,
{
    if let Err(err) = ensure_same_user(&session, request.id.as_deref(), "id") {
        return service_error_response(err.into());
    }
    match service.update_driver_profile(request) {
        Ok(outcome) => {
            let payload = json!({
                "success": true,
                "profile": outcome.profile,
                "created": outcome.created,
                "message": "Profile updated successfully",
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn list_drivers_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Query(query): Query<DriverDirectoryQuery>,
) -> Response
where
    R: ProfileRepository + 'static,
    N: Notifier + 'static,
{
    match service.list_drivers(&query) {
        Ok(drivers) => (StatusCode::OK, Json(json!({ "drivers": drivers }))).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn get_profile_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path(profile_id): Path<String>,
) -> Response
where
    R: ProfileRepository + 'static,
    N: Notifier + 'static,
{
    match service.get(&ProfileId(profile_id)) {
        Ok(profile) => (StatusCode::OK, Json(json!({ "profile": profile }))).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn list_users_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Extension(session): Extension<Session>,
    Query(query): Query<UserSearchQuery>,
) -> Response
where
    R: ProfileRepository + 'static,
    N: Notifier + 'static,
{
    if let Err(err) = service.authorize_admin(&session) {
        return service_error_response(err);
    }
    match service.list_users(&query) {
        Ok(page) => {
            let payload = json!({
                "users": page.items,
                "total": page.total,
                "page": page.page,
                "page_size": page.page_size,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn user_status_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Extension(session): Extension<Session>,
    Json(request): Json<UserStatusRequest>,
) -> Response
where
    R: ProfileRepository + 'static,
    N: Notifier + 'static,
{
    if let Err(err) = service.authorize_admin(&session) {
        return service_error_response(err);
    }
    match service.update_user_status(request) {
        Ok(profile) => {
            let payload = json!({ "success": true, "profile": profile });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn approve_drivers_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Extension(session): Extension<Session>,
) -> Response
where
    R: ProfileRepository + 'static,
    N: Notifier + 'static,
{
    if let Err(err) = service.authorize_admin(&session) {
        return service_error_response(err);
    }
    match service.approve_pending_drivers() {
        Ok(approved) => {
            let payload = json!({
                "success": true,
                "message": format!("Approved {} drivers", approved.len()),
                "approved_users": approved,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn pending_kyc_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Extension(session): Extension<Session>,
) -> Response
where
    R: ProfileRepository + 'static,
    N: Notifier + 'static,
{
    if let Err(err) = service.authorize_admin(&session) {
        return service_error_response(err);
    }
    match service.pending_kyc() {
        Ok(profiles) => (StatusCode::OK, Json(json!({ "profiles": profiles }))).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn decide_kyc_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Extension(session): Extension<Session>,
    Json(request): Json<KycDecisionRequest>,
) -> Response
where
    R: ProfileRepository + 'static,
    N: Notifier + 'static,
{
    if let Err(err) = service.authorize_admin(&session) {
        return service_error_response(err);
    }
    match service.decide_kyc(request).await {
        Ok(outcome) => {
            let payload = json!({
                "success": true,
                "profile": outcome.profile,
                "notification": outcome.notification,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}
