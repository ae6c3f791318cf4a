use std::sync::Arc;

use crate::workflows::feedback::{
    feedback_router, CreateReportRequest, CreateReviewRequest, FeedbackService,
};
use crate::workflows::memory::{InMemoryFeedbackRepository, InMemoryProfileRepository};
use crate::workflows::test_support::gate;

pub(super) type TestService = FeedbackService<InMemoryFeedbackRepository, InMemoryProfileRepository>;

pub(super) fn build_service() -> (Arc<TestService>, InMemoryProfileRepository) {
    let profiles = InMemoryProfileRepository::default();
    let service = FeedbackService::new(
        Arc::new(InMemoryFeedbackRepository::default()),
        Arc::new(profiles.clone()),
    );
    (Arc::new(service), profiles)
}

pub(super) fn router(service: Arc<TestService>) -> axum::Router {
    feedback_router(service, gate())
}

pub(super) fn review(reviewer: &str, reviewed: &str, rating: i64) -> CreateReviewRequest {
    CreateReviewRequest {
        reviewer_id: Some(reviewer.to_string()),
        reviewed_user_id: Some(reviewed.to_string()),
        booking_id: None,
        rating: Some(rating),
        comment: Some("Punctual and careful".to_string()),
    }
}

pub(super) fn report(reporter: &str, reported: &str) -> CreateReportRequest {
    CreateReportRequest {
        reporter_id: Some(reporter.to_string()),
        reported_user_id: Some(reported.to_string()),
        reason: Some("No-show".to_string()),
        details: None,
    }
}
