//! Reviews and abuse reports.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    CreateReportRequest, CreateReviewRequest, Report, ReportId, ReportView, Review, ReviewId,
    ReviewQuery, ReviewView,
};
pub use repository::FeedbackRepository;
pub use router::feedback_router;
pub use service::{FeedbackService, FeedbackServiceError};
