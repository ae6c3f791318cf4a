use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::domain::{
    Booking, BookingId, BookingOutcome, BookingSearchQuery, BookingStatus, BookingStatusRequest,
    CreateBookingRequest,
};
use super::repository::{BookingFilter, BookingRepository};
use crate::auth::{ensure_admin, ensure_same_user, AccessError, Session};
use crate::workflows::notifications::{self, templates, Notifier};
use crate::workflows::paging::{Page, PageRequest};
use crate::workflows::profiles::{Profile, ProfileId, ProfileRepository};
use crate::workflows::repository::RepositoryError;
use crate::workflows::validation::{present, RequiredFields, ValidationError};

static BOOKING_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_booking_id() -> BookingId {
    let id = BOOKING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    BookingId(format!("bkg-{id:06}"))
}

/// Client hire requests and their administration.
pub struct BookingService<B, R, N> {
    bookings: Arc<B>,
    profiles: Arc<R>,
    notifier: Arc<N>,
}

impl<B, R, N> BookingService<B, R, N>
where
    B: BookingRepository + 'static,
    R: ProfileRepository + 'static,
    N: Notifier + 'static,
{
    pub fn new(bookings: Arc<B>, profiles: Arc<R>, notifier: Arc<N>) -> Self {
        Self {
            bookings,
            profiles,
            notifier,
        }
    }

    pub fn authorize_admin(&self, session: &Session) -> Result<Profile, BookingServiceError> {
        Ok(ensure_admin(self.profiles.as_ref(), session)?)
    }

    /// Record a request for an existing driver and notify them.
    ///
    /// The employer is the signed-in caller, if any; anonymous requests have none.
    /// The booking is returned even when the e-mail could not be sent.
    pub async fn create(
        &self,
        request: CreateBookingRequest,
        session: Option<&Session>,
    ) -> Result<BookingOutcome, BookingServiceError> {
        let mut fields = RequiredFields::new();
        let driver_id = ProfileId(fields.take("driver_id", request.driver_id));
        let client_name = fields.take("client_name", request.client_name);
        let client_email = fields.take("client_email", request.client_email);
        fields.finish()?;

        let employer_id = match session {
            Some(session) => {
                ensure_same_user(session, request.employer_id.as_deref(), "employer_id")?;
                Some(session.user_id.clone())
            }
            None => {
                if present(request.employer_id).is_some() {
                    debug!("employer_id ignored on anonymous booking");
                }
                None
            }
        };

        let driver = self
            .profiles
            .fetch(&driver_id)?
            .ok_or_else(|| BookingServiceError::DriverNotFound(driver_id.clone()))?;

        let now = Utc::now();
        let booking = self.bookings.insert(Booking {
            id: next_booking_id(),
            driver_id,
            employer_id,
            client_name,
            client_email,
            client_phone: present(request.client_phone),
            message: present(request.message),
            status: BookingStatus::requested(),
            created_at: now,
            updated_at: now,
        })?;
        info!(booking = %booking.id, driver = %booking.driver_id, "booking requested");

        let recipient = driver
            .email
            .as_deref()
            .unwrap_or(booking.client_email.as_str());
        let message = templates::booking_request(recipient, driver.display_name(), &booking);
        let notification = notifications::dispatch(self.notifier.as_ref(), Some(message)).await;

        Ok(BookingOutcome {
            booking,
            notification,
        })
    }

    /// Bookings where the caller is the driver or the employer.
    pub fn for_participant(&self, session: &Session) -> Result<Vec<Booking>, BookingServiceError> {
        Ok(self
            .bookings
            .list(&BookingFilter::participant(session.user_id.clone()))?)
    }

    /// Overwrite the status with any non-empty label.
    pub fn update_status(
        &self,
        request: BookingStatusRequest,
    ) -> Result<Booking, BookingServiceError> {
        let mut fields = RequiredFields::new();
        let id = BookingId(fields.take("id", request.id));
        let status = BookingStatus(fields.take("status", request.status));
        fields.finish()?;

        let mut booking = self
            .bookings
            .fetch(&id)?
            .ok_or_else(|| BookingServiceError::NotFound(id.clone()))?;
        let previous = std::mem::replace(&mut booking.status, status);
        booking.updated_at = Utc::now();

        let stored = self.bookings.update(booking)?;
        info!(
            booking = %stored.id,
            previous = %previous,
            current = %stored.status,
            "booking status overridden"
        );
        Ok(stored)
    }

    pub fn list(&self, query: &BookingSearchQuery) -> Result<Page<Booking>, BookingServiceError> {
        let filter = BookingFilter {
            status: present(query.status.clone()).map(BookingStatus),
            ..BookingFilter::default()
        };
        let window = PageRequest::new(query.page, query.page_size);
        Ok(window.apply(self.bookings.list(&filter)?))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BookingServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("driver {0} not found")]
    DriverNotFound(ProfileId),
    #[error("booking {0} not found")]
    NotFound(BookingId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Access(#[from] AccessError),
}
