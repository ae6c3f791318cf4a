use super::domain::{Booking, BookingId, BookingStatus};
use crate::workflows::profiles::ProfileId;
use crate::workflows::repository::RepositoryError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    /// Driver or employer on the booking.
    pub participant: Option<ProfileId>,
}

impl BookingFilter {
    pub fn participant(id: ProfileId) -> Self {
        Self {
            participant: Some(id),
            ..Self::default()
        }
    }

    pub fn matches(&self, booking: &Booking) -> bool {
        if self
            .status
            .as_ref()
            .is_some_and(|status| &booking.status != status)
        {
            return false;
        }
        self.participant
            .as_ref()
            .map_or(true, |participant| booking.involves(participant))
    }
}

/// Storage abstraction over the `bookings` table.
pub trait BookingRepository: Send + Sync {
    /// `Conflict` when the id is already taken.
    fn insert(&self, booking: Booking) -> Result<Booking, RepositoryError>;
    /// `NotFound` when absent.
    fn update(&self, booking: Booking) -> Result<Booking, RepositoryError>;
    fn fetch(&self, id: &BookingId) -> Result<Option<Booking>, RepositoryError>;
    /// Matching rows, newest first.
    fn list(&self, filter: &BookingFilter) -> Result<Vec<Booking>, RepositoryError>;
}
