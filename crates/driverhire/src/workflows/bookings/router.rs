use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::json;

use super::domain::{BookingSearchQuery, BookingStatusRequest, CreateBookingRequest};
use super::repository::BookingRepository;
use super::service::{BookingService, BookingServiceError};
use crate::auth::{attach_session, require_session, Session, SessionGate};
use crate::workflows::http::{access_status, error_response, repository_status};
use crate::workflows::notifications::Notifier;
use crate::workflows::profiles::ProfileRepository;

type SharedService<B, R, N> = Arc<BookingService<B, R, N>>;

pub fn booking_router<B, R, N>(service: SharedService<B, R, N>, sessions: SessionGate) -> Router
where
    B: BookingRepository + 'static,
    R: ProfileRepository + 'static,
    N: Notifier + 'static,
{
    let protected = Router::new()
        .route("/api/v1/bookings/mine", get(mine_handler::<B, R, N>))
        .route("/api/v1/admin/bookings", get(admin_list_handler::<B, R, N>))
        .route(
            "/api/v1/admin/bookings/status",
            post(status_handler::<B, R, N>),
        )
        .route_layer(middleware::from_fn_with_state(
            sessions.clone(),
            require_session,
        ));

    let public = Router::new()
        .route("/api/v1/bookings", post(create_handler::<B, R, N>))
        .route_layer(middleware::from_fn_with_state(sessions, attach_session));

    public.merge(protected).with_state(service)
}

pub(crate) fn service_error_response(error: BookingServiceError) -> Response {
    let status = match &error {
        BookingServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        BookingServiceError::DriverNotFound(_) | BookingServiceError::NotFound(_) => {
            StatusCode::NOT_FOUND
        }
        BookingServiceError::Repository(inner) => repository_status(inner),
        BookingServiceError::Access(inner) => access_status(inner),
    };
    error_response(status, error.to_string())
}

pub(crate) async fn create_handler<B, R, N>(
    State(service): State<SharedService<B, R, N>>,
    session: Option<Extension<Session>>,
    Json(request): Json<CreateBookingRequest>,
) -> Response
where
    B: BookingRepository + 'static,
    R: ProfileRepository + 'static,
    N: Notifier + 'static,
{
    let session = session.map(|Extension(session)| session);
    match service.create(request, session.as_ref()).await {
        Ok(outcome) => {
            let payload = json!({
                "success": true,
                "booking": outcome.booking,
                "notification": outcome.notification,
            });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn mine_handler<B, R, N>(
    State(service): State<SharedService<B, R, N>>,
    Extension(session): Extension<Session>,
) -> Response
where
    B: BookingRepository + 'static,
    R: ProfileRepository + 'static,
    N: Notifier + 'static,
{
    match service.for_participant(&session) {
        Ok(bookings) => (StatusCode::OK, Json(json!({ "bookings": bookings }))).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn admin_list_handler<B, R, N>(
    State(service): State<SharedService<B, R, N>>,
    Extension(session): Extension<Session>,
    Query(query): Query<BookingSearchQuery>,
) -> Response
where
    B: BookingRepository + 'static,
    R: ProfileRepository + 'static,
    N: Notifier + 'static,
{
    if let Err(err) = service.authorize_admin(&session) {
        return service_error_response(err);
    }
    match service.list(&query) {
        Ok(page) => {
            let payload = json!({
                "bookings": page.items,
                "total": page.total,
                "page": page.page,
                "page_size": page.page_size,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn status_handler<B, R, N>(
    State(service): State<SharedService<B, R, N>>,
    Extension(session): Extension<Session>,
    Json(request): Json<BookingStatusRequest>,
) -> Response
where
    B: BookingRepository + 'static,
    R: ProfileRepository + 'static,
    N: Notifier + 'static,
{
    if let Err(err) = service.authorize_admin(&session) {
        return service_error_response(err);
    }
    match service.update_status(request) {
        Ok(booking) => {
            let payload = json!({ "success": true, "booking": booking });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}
