use std::sync::Arc;

use crate::workflows::bookings::{booking_router, BookingService, CreateBookingRequest};
use crate::workflows::memory::{
    InMemoryBookingRepository, InMemoryProfileRepository, RecordingNotifier,
};
use crate::workflows::test_support::gate;

pub(super) type TestService =
    BookingService<InMemoryBookingRepository, InMemoryProfileRepository, RecordingNotifier>;

pub(super) struct Harness {
    pub(super) service: Arc<TestService>,
    pub(super) bookings: InMemoryBookingRepository,
    pub(super) profiles: InMemoryProfileRepository,
    pub(super) notifier: RecordingNotifier,
}

pub(super) fn harness() -> Harness {
    harness_with(RecordingNotifier::default())
}

pub(super) fn harness_with(notifier: RecordingNotifier) -> Harness {
    let bookings = InMemoryBookingRepository::default();
    let profiles = InMemoryProfileRepository::default();
    let service = Arc::new(BookingService::new(
        Arc::new(bookings.clone()),
        Arc::new(profiles.clone()),
        Arc::new(notifier.clone()),
    ));
    Harness {
        service,
        bookings,
        profiles,
        notifier,
    }
}

impl Harness {
    pub(super) fn router(&self) -> axum::Router {
        booking_router(self.service.clone(), gate())
    }
}

pub(super) fn request(driver: &str) -> CreateBookingRequest {
    CreateBookingRequest {
        driver_id: Some(driver.to_string()),
        client_name: Some("Wanjiru Mwangi".to_string()),
        client_email: Some("wanjiru@example.com".to_string()),
        ..CreateBookingRequest::default()
    }
}
