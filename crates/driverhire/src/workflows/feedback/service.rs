use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{
    CreateReportRequest, CreateReviewRequest, Report, ReportId, ReportView, Review, ReviewId,
    ReviewQuery, ReviewView, MAX_RATING, MIN_RATING,
};
use super::repository::FeedbackRepository;
use crate::auth::{ensure_admin, AccessError, Session};
use crate::workflows::bookings::BookingId;
use crate::workflows::profiles::{Profile, ProfileId, ProfileRepository};
use crate::workflows::repository::RepositoryError;
use crate::workflows::validation::{present, RequiredFields, ValidationError};

static REVIEW_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static REPORT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_review_id() -> ReviewId {
    let id = REVIEW_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ReviewId(format!("rev-{id:06}"))
}

fn next_report_id() -> ReportId {
    let id = REPORT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ReportId(format!("rpt-{id:06}"))
}

/// Reviews and abuse reports exchanged between marketplace users.
pub struct FeedbackService<F, R> {
    feedback: Arc<F>,
    profiles: Arc<R>,
}

impl<F, R> FeedbackService<F, R>
where
    F: FeedbackRepository + 'static,
    R: ProfileRepository + 'static,
{
    pub fn new(feedback: Arc<F>, profiles: Arc<R>) -> Self {
        Self { feedback, profiles }
    }

    pub fn authorize_admin(&self, session: &Session) -> Result<Profile, FeedbackServiceError> {
        Ok(ensure_admin(self.profiles.as_ref(), session)?)
    }

    pub fn create_review(
        &self,
        request: CreateReviewRequest,
    ) -> Result<Review, FeedbackServiceError> {
        let mut fields = RequiredFields::new();
        let reviewer_id = ProfileId(fields.take("reviewer_id", request.reviewer_id));
        let reviewed_user_id = ProfileId(fields.take("reviewed_user_id", request.reviewed_user_id));
        let rating = fields.require("rating", request.rating);
        fields.finish()?;

        let rating = rating
            .and_then(|raw| u8::try_from(raw).ok())
            .filter(|value| (MIN_RATING..=MAX_RATING).contains(value))
            .ok_or_else(|| ValidationError::RatingOutOfRange(request.rating.unwrap_or_default()))?;

        let review = self.feedback.insert_review(Review {
            id: next_review_id(),
            reviewer_id,
            reviewed_user_id,
            booking_id: present(request.booking_id).map(BookingId),
            rating,
            comment: present(request.comment),
            created_at: Utc::now(),
        })?;
        info!(
            review = %review.id,
            reviewed = %review.reviewed_user_id,
            rating = review.rating,
            "review recorded"
        );
        Ok(review)
    }

    /// Reviews joined with each reviewer's e-mail.
    pub fn list_reviews(&self, query: &ReviewQuery) -> Result<Vec<ReviewView>, FeedbackServiceError> {
        let reviewed = present(query.user_id.clone()).map(ProfileId);
        let reviews = self.feedback.reviews(reviewed.as_ref())?;
        let profiles = self.lookup(reviews.iter().map(|review| &review.reviewer_id))?;

        Ok(reviews
            .into_iter()
            .map(|review| ReviewView {
                reviewer_email: profiles
                    .get(&review.reviewer_id)
                    .and_then(|profile| profile.email.clone()),
                review,
            })
            .collect())
    }

    pub fn create_report(
        &self,
        request: CreateReportRequest,
    ) -> Result<Report, FeedbackServiceError> {
        let mut fields = RequiredFields::new();
        let reporter_id = ProfileId(fields.take("reporter_id", request.reporter_id));
        let reported_user_id = ProfileId(fields.take("reported_user_id", request.reported_user_id));
        let reason = fields.take("reason", request.reason);
        fields.finish()?;

        let report = self.feedback.insert_report(Report {
            id: next_report_id(),
            reporter_id,
            reported_user_id,
            reason,
            details: present(request.details),
            created_at: Utc::now(),
        })?;
        info!(report = %report.id, reported = %report.reported_user_id, "user reported");
        Ok(report)
    }

    /// Reports joined with the reported user's name and e-mail.
    pub fn list_reports(&self) -> Result<Vec<ReportView>, FeedbackServiceError> {
        let reports = self.feedback.reports()?;
        let profiles = self.lookup(reports.iter().map(|report| &report.reported_user_id))?;

        Ok(reports
            .into_iter()
            .map(|report| {
                let reported = profiles.get(&report.reported_user_id);
                ReportView {
                    reported_full_name: reported.and_then(|profile| profile.full_name.clone()),
                    reported_email: reported.and_then(|profile| profile.email.clone()),
                    report,
                }
            })
            .collect())
    }

    fn lookup<'a>(
        &self,
        ids: impl Iterator<Item = &'a ProfileId>,
    ) -> Result<HashMap<ProfileId, Profile>, FeedbackServiceError> {
        let mut found = HashMap::new();
        for id in ids {
            if found.contains_key(id) {
                continue;
            }
            if let Some(profile) = self.profiles.fetch(id)? {
                found.insert(id.clone(), profile);
            }
        }
        Ok(found)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FeedbackServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Access(#[from] AccessError),
}
