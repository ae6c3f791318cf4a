//! Profiles for drivers, employers and administrators, including the KYC
//! verification lifecycle and the public driver directory.

pub mod domain;
pub(crate) mod kyc;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AvailabilityRequest, DriverDirectoryQuery, DriverProfileUpdate, KycDecision,
    KycDecisionRequest, KycDocuments, KycStatus, KycSubmissionRequest, PendingKycView, Profile,
    ProfileId, Role, UpdateDriverProfileRequest, UpsertProfileRequest, UserSearchQuery,
    UserStatusRequest,
};
pub use repository::{ProfileFilter, ProfileRepository};
pub use router::profile_router;
pub use service::{
    KycOutcome, ProfileService, ProfileServiceError, ProfileSettings, ProfileUpdateOutcome,
};
