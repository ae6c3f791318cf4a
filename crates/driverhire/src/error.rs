use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::bookings::BookingServiceError;
use crate::workflows::feedback::FeedbackServiceError;
use crate::workflows::profiles::ProfileServiceError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

/// Process-level failure surfaced by the binaries.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Workflow(WorkflowError),
}

/// Any of the marketplace service errors, for callers that drive several workflows in sequence.
#[derive(Debug)]
pub enum WorkflowError {
    Profiles(ProfileServiceError),
    Bookings(BookingServiceError),
    Feedback(FeedbackServiceError),
}

impl fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowError::Profiles(err) => write!(f, "profiles: {}", err),
            WorkflowError::Bookings(err) => write!(f, "bookings: {}", err),
            WorkflowError::Feedback(err) => write!(f, "feedback: {}", err),
        }
    }
}

impl std::error::Error for WorkflowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WorkflowError::Profiles(err) => Some(err),
            WorkflowError::Bookings(err) => Some(err),
            WorkflowError::Feedback(err) => Some(err),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Workflow(err) => write!(f, "workflow error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Workflow(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Workflow(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ProfileServiceError> for AppError {
    fn from(value: ProfileServiceError) -> Self {
        Self::Workflow(WorkflowError::Profiles(value))
    }
}

impl From<BookingServiceError> for AppError {
    fn from(value: BookingServiceError) -> Self {
        Self::Workflow(WorkflowError::Bookings(value))
    }
}

impl From<FeedbackServiceError> for AppError {
    fn from(value: FeedbackServiceError) -> Self {
        Self::Workflow(WorkflowError::Feedback(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::profiles::ProfileId;

    #[test]
    fn workflow_errors_render_as_bad_request() {
        let err: AppError =
            ProfileServiceError::NotFound(ProfileId("driver-1".to_string())).into();
        assert_eq!(
            err.to_string(),
            "workflow error: profiles: profile driver-1 not found"
        );
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn config_errors_are_internal() {
        let err: AppError = ConfigError::MissingJwtSecret.into();
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
