//! Client hire requests addressed to drivers.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Booking, BookingId, BookingOutcome, BookingSearchQuery, BookingStatus, BookingStatusRequest,
    CreateBookingRequest,
};
pub use repository::{BookingFilter, BookingRepository};
pub use router::booking_router;
pub use service::{BookingService, BookingServiceError};
