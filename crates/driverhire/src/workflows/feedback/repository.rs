use super::domain::{Report, Review};
use crate::workflows::profiles::ProfileId;
use crate::workflows::repository::RepositoryError;

/// Append-only storage for reviews and reports.
pub trait FeedbackRepository: Send + Sync {
    fn insert_review(&self, review: Review) -> Result<Review, RepositoryError>;
    /// Newest first, optionally narrowed to one reviewed user.
    fn reviews(&self, reviewed_user: Option<&ProfileId>) -> Result<Vec<Review>, RepositoryError>;
    fn insert_report(&self, report: Report) -> Result<Report, RepositoryError>;
    /// Newest first.
    fn reports(&self) -> Result<Vec<Report>, RepositoryError>;
}
