//! Process-local stores used by the demo binary, development mode and tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::workflows::bookings::{Booking, BookingFilter, BookingId, BookingRepository};
use crate::workflows::feedback::{FeedbackRepository, Report, Review};
use crate::workflows::notifications::{
    DispatchReceipt, EmailMessage, NotificationError, Notifier,
};
use crate::workflows::profiles::{Profile, ProfileFilter, ProfileId, ProfileRepository};
use crate::workflows::repository::RepositoryError;

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("in-memory store poisoned".to_string()))
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryProfileRepository {
    records: Arc<Mutex<HashMap<ProfileId, Profile>>>,
}

impl ProfileRepository for InMemoryProfileRepository {
    fn upsert(&self, profile: Profile) -> Result<Profile, RepositoryError> {
        let mut guard = lock(&self.records)?;
        let stored = match guard.get(&profile.id) {
            Some(existing) => Profile {
                created_at: existing.created_at,
                ..profile
            },
            None => profile,
        };
        guard.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    fn update(&self, profile: Profile) -> Result<Profile, RepositoryError> {
        let mut guard = lock(&self.records)?;
        match guard.get_mut(&profile.id) {
            Some(slot) => {
                *slot = profile.clone();
                Ok(profile)
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &ProfileId) -> Result<Option<Profile>, RepositoryError> {
        Ok(lock(&self.records)?.get(id).cloned())
    }

    fn list(&self, filter: &ProfileFilter) -> Result<Vec<Profile>, RepositoryError> {
        let mut rows: Vec<Profile> = lock(&self.records)?
            .values()
            .filter(|profile| filter.matches(profile))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(rows)
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryBookingRepository {
    records: Arc<Mutex<HashMap<BookingId, Booking>>>,
}

impl BookingRepository for InMemoryBookingRepository {
    fn insert(&self, booking: Booking) -> Result<Booking, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.contains_key(&booking.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(booking.id.clone(), booking.clone());
        Ok(booking)
    }

    fn update(&self, booking: Booking) -> Result<Booking, RepositoryError> {
        let mut guard = lock(&self.records)?;
        match guard.get_mut(&booking.id) {
            Some(slot) => {
                *slot = booking.clone();
                Ok(booking)
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &BookingId) -> Result<Option<Booking>, RepositoryError> {
        Ok(lock(&self.records)?.get(id).cloned())
    }

    fn list(&self, filter: &BookingFilter) -> Result<Vec<Booking>, RepositoryError> {
        let mut rows: Vec<Booking> = lock(&self.records)?
            .values()
            .filter(|booking| filter.matches(booking))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(rows)
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryFeedbackRepository {
    reviews: Arc<Mutex<Vec<Review>>>,
    reports: Arc<Mutex<Vec<Report>>>,
}

impl FeedbackRepository for InMemoryFeedbackRepository {
    fn insert_review(&self, review: Review) -> Result<Review, RepositoryError> {
        lock(&self.reviews)?.push(review.clone());
        Ok(review)
    }

    fn reviews(&self, reviewed_user: Option<&ProfileId>) -> Result<Vec<Review>, RepositoryError> {
        // Append order doubles as creation order.
        Ok(lock(&self.reviews)?
            .iter()
            .rev()
            .filter(|review| reviewed_user.map_or(true, |id| &review.reviewed_user_id == id))
            .cloned()
            .collect())
    }

    fn insert_report(&self, report: Report) -> Result<Report, RepositoryError> {
        lock(&self.reports)?.push(report.clone());
        Ok(report)
    }

    fn reports(&self) -> Result<Vec<Report>, RepositoryError> {
        Ok(lock(&self.reports)?.iter().rev().cloned().collect())
    }
}

/// Notifier that keeps every message instead of sending it.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
    failure: Option<String>,
}

impl RecordingNotifier {
    /// Records each message, then reports a transport failure.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            sent: Arc::default(),
            failure: Some(reason.into()),
        }
    }

    pub fn messages(&self) -> Vec<EmailMessage> {
        self.sent
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: EmailMessage) -> Result<DispatchReceipt, NotificationError> {
        let position = {
            let mut guard = self
                .sent
                .lock()
                .map_err(|_| NotificationError::Transport("outbox poisoned".to_string()))?;
            guard.push(message);
            guard.len()
        };
        match &self.failure {
            Some(reason) => Err(NotificationError::Transport(reason.clone())),
            None => Ok(DispatchReceipt::Delivered {
                id: Some(format!("mem-{position}")),
            }),
        }
    }
}
