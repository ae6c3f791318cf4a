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

use super::domain::{CreateReportRequest, CreateReviewRequest, ReviewQuery};
use super::repository::FeedbackRepository;
use super::service::{FeedbackService, FeedbackServiceError};
use crate::auth::{ensure_same_user, require_session, Session, SessionGate};
use crate::workflows::http::{access_status, error_response, repository_status};
use crate::workflows::profiles::ProfileRepository;

type SharedService<F, R> = Arc<FeedbackService<F, R>>;

pub fn feedback_router<F, R>(service: SharedService<F, R>, sessions: SessionGate) -> Router
where
    F: FeedbackRepository + 'static,
    R: ProfileRepository + 'static,
{
    let protected = Router::new()
        .route("/api/v1/reviews", post(create_review_handler::<F, R>))
        .route("/api/v1/reports", post(create_report_handler::<F, R>))
        .route("/api/v1/admin/reports", get(list_reports_handler::<F, R>))
        .route_layer(middleware::from_fn_with_state(sessions, require_session));

    // GET /api/v1/reviews stays public while POST on the same path needs a session.
    let public = Router::new().route("/api/v1/reviews", get(list_reviews_handler::<F, R>));

    public.merge(protected).with_state(service)
}

pub(crate) fn service_error_response(error: FeedbackServiceError) -> Response {
    let status = match &error {
        FeedbackServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        FeedbackServiceError::Repository(inner) => repository_status(inner),
        FeedbackServiceError::Access(inner) => access_status(inner),
    };
    error_response(status, error.to_string())
}

pub(crate) async fn create_review_handler<F, R>(
    State(service): State<SharedService<F, R>>,
    Extension(session): Extension<Session>,
    Json(request): Json<CreateReviewRequest>,
) -> Response
where
    F: FeedbackRepository + 'static,
    R: ProfileRepository + 'static,
{
    if let Err(err) = ensure_same_user(&session, request.reviewer_id.as_deref(), "reviewer_id") {
        return service_error_response(err.into());
    }
    match service.create_review(request) {
        Ok(review) => {
            let payload = json!({ "success": true, "review": review });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn list_reviews_handler<F, R>(
    State(service): State<SharedService<F, R>>,
    Query(query): Query<ReviewQuery>,
) -> Response
where
    F: FeedbackRepository + 'static,
    R: ProfileRepository + 'static,
{
    match service.list_reviews(&query) {
        Ok(reviews) => (StatusCode::OK, Json(json!({ "reviews": reviews }))).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn create_report_handler<F, R>(
    State(service): State<SharedService<F, R>>,
    Extension(session): Extension<Session>,
    Json(request): Json<CreateReportRequest>,
) -> Response
where
    F: FeedbackRepository + 'static,
    R: ProfileRepository + 'static,
{
    if let Err(err) = ensure_same_user(&session, request.reporter_id.as_deref(), "reporter_id") {
        return service_error_response(err.into());
    }
    match service.create_report(request) {
        Ok(report) => {
            let payload = json!({ "success": true, "report": report });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn list_reports_handler<F, R>(
    State(service): State<SharedService<F, R>>,
    Extension(session): Extension<Session>,
) -> Response
where
    F: FeedbackRepository + 'static,
    R: ProfileRepository + 'static,
{
    if let Err(err) = service.authorize_admin(&session) {
        return service_error_response(err);
    }
    match service.list_reports() {
        Ok(reports) => (StatusCode::OK, Json(json!({ "reports": reports }))).into_response(),
        Err(err) => service_error_response(err),
    }
}
