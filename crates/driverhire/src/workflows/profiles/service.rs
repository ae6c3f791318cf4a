use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{
    AvailabilityRequest, DriverDirectoryQuery, DriverProfileUpdate, KycDecision,
    KycDecisionRequest, KycStatus, KycSubmissionRequest, PendingKycView, Profile, ProfileId,
    Role, UpdateDriverProfileRequest, UpsertProfileRequest, UserSearchQuery, UserStatusRequest,
};
use super::kyc;
use super::repository::{ProfileFilter, ProfileRepository};
use crate::auth::{ensure_admin, AccessError, Session};
use crate::config::{NotificationConfig, StorageConfig};
use crate::workflows::notifications::{self, templates, NotificationReport, Notifier};
use crate::workflows::paging::{Page, PageRequest};
use crate::workflows::repository::RepositoryError;
use crate::workflows::validation::{present, RequiredFields, ValidationError};

/// Settings that shape outbound links.
#[derive(Debug, Clone)]
pub struct ProfileSettings {
    pub site_url: String,
    pub storage_public_url: Option<String>,
}

impl ProfileSettings {
    pub fn from_config(notifications: &NotificationConfig, storage: &StorageConfig) -> Self {
        Self {
            site_url: notifications.site_url.clone(),
            storage_public_url: storage.public_url.clone(),
        }
    }
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self::from_config(&NotificationConfig::default(), &StorageConfig::default())
    }
}

/// Profile write paired with what happened to its notification.
#[derive(Debug, Clone, Serialize)]
pub struct KycOutcome {
    pub profile: Profile,
    pub notification: NotificationReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdateOutcome {
    pub profile: Profile,
    pub created: bool,
}

/// Profile, availability and identity-verification workflow.
pub struct ProfileService<R, N> {
    repository: Arc<R>,
    notifier: Arc<N>,
    settings: ProfileSettings,
}

impl<R, N> ProfileService<R, N>
where
    R: ProfileRepository + 'static,
    N: Notifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>, settings: ProfileSettings) -> Self {
        Self {
            repository,
            notifier,
            settings,
        }
    }

    pub fn authorize_admin(&self, session: &Session) -> Result<Profile, ProfileServiceError> {
        Ok(ensure_admin(self.repository.as_ref(), session)?)
    }

    /// Called after sign-in. Drivers are approved and listed as available immediately.
    ///
    /// The admin role is never granted here; an existing admin row keeps its role and flags.
    pub fn upsert_on_auth(
        &self,
        request: UpsertProfileRequest,
    ) -> Result<Profile, ProfileServiceError> {
        let mut fields = RequiredFields::new();
        let id = ProfileId(fields.take("id", request.id));
        let email = fields.take("email", request.email);
        fields.finish()?;

        let now = Utc::now();
        let mut profile = self
            .repository
            .fetch(&id)?
            .unwrap_or_else(|| Profile::new(id, now));
        profile.email = Some(email);
        profile.updated_at = now;
        if profile.role != Some(Role::Admin) {
            let requested = match request.role {
                Some(Role::Admin) => {
                    warn!(profile = %profile.id, "admin role requested on sign-in; ignoring");
                    profile.role
                }
                role => role,
            };
            let is_driver = requested == Some(Role::Driver);
            profile.role = requested;
            profile.is_driver = is_driver;
            profile.is_approved = is_driver;
            profile.is_available = is_driver;
        }

        let stored = self.repository.upsert(profile)?;
        info!(profile = %stored.id, role = ?stored.role, "profile upserted");
        Ok(stored)
    }

    /// Store KYC documents, move the profile to `pending` and confirm receipt by e-mail.
    pub async fn submit_kyc(
        &self,
        request: KycSubmissionRequest,
    ) -> Result<KycOutcome, ProfileServiceError> {
        let submission = kyc::validate_submission(request)?;
        let mut profile = self.require(&submission.id)?;

        let transition = kyc::apply_submission(&mut profile, submission.documents, Utc::now());
        let profile = self.repository.update(profile)?;
        info!(
            profile = %profile.id,
            previous = transition.previous.label(),
            "kyc documents submitted"
        );

        let notification = if transition.previous == KycStatus::Pending {
            NotificationReport::skipped("documents already awaiting review")
        } else {
            let recipient = submission.email.or_else(|| profile.email.clone());
            let message = recipient
                .as_deref()
                .map(|to| templates::kyc_received(to, profile.display_name()));
            notifications::dispatch(self.notifier.as_ref(), message).await
        };

        Ok(KycOutcome {
            profile,
            notification,
        })
    }

    /// Record an administrator verdict. Any current status is overwritten.
    pub async fn decide_kyc(
        &self,
        request: KycDecisionRequest,
    ) -> Result<KycOutcome, ProfileServiceError> {
        let (id, decision) = kyc::validate_decision(request)?;
        let mut profile = self.require(&id)?;

        let transition = kyc::apply_decision(&mut profile, decision, Utc::now());
        let profile = self.repository.update(profile)?;
        if transition.bypassed_review() {
            warn!(
                profile = %profile.id,
                previous = transition.previous.label(),
                current = transition.current.label(),
                "kyc verdict applied outside pending review"
            );
        } else {
            info!(profile = %profile.id, current = transition.current.label(), "kyc decided");
        }

        let name = profile.display_name();
        let site_url = self.settings.site_url.as_str();
        let message = profile.email.as_deref().map(|to| match decision {
            KycDecision::Approved => templates::kyc_verified(to, name, site_url),
            KycDecision::Rejected => templates::kyc_declined(to, name, site_url),
        });
        let notification = notifications::dispatch(self.notifier.as_ref(), message).await;

        Ok(KycOutcome {
            profile,
            notification,
        })
    }

    pub fn toggle_availability(
        &self,
        request: AvailabilityRequest,
    ) -> Result<Profile, ProfileServiceError> {
        let mut fields = RequiredFields::new();
        let id = ProfileId(fields.take("id", request.id));
        fields.finish()?;

        let mut profile = self.require(&id)?;
        profile.is_available = request.is_available.unwrap_or(!profile.is_available);
        profile.updated_at = Utc::now();

        let stored = self.repository.update(profile)?;
        info!(profile = %stored.id, available = stored.is_available, "availability changed");
        Ok(stored)
    }

    /// Apply non-blank driver attributes, creating an approved driver row when none exists.
    pub fn update_driver_profile(
        &self,
        request: UpdateDriverProfileRequest,
    ) -> Result<ProfileUpdateOutcome, ProfileServiceError> {
        let mut fields = RequiredFields::new();
        let id = ProfileId(fields.take("id", request.id));
        fields.finish()?;

        let updates = request
            .updates
            .filter(|updates| *updates != DriverProfileUpdate::default())
            .ok_or(ValidationError::NoUpdates)?;

        let now = Utc::now();
        let (mut profile, created) = match self.repository.fetch(&id)? {
            Some(existing) => (existing, false),
            None => {
                let mut fresh = Profile::new(id, now);
                fresh.is_approved = true;
                fresh.is_available = true;
                (fresh, true)
            }
        };

        apply_driver_updates(&mut profile, updates);
        profile.is_driver = true;
        profile.updated_at = now;

        let profile = if created {
            self.repository.upsert(profile)?
        } else {
            self.repository.update(profile)?
        };
        info!(profile = %profile.id, created, "driver profile updated");
        Ok(ProfileUpdateOutcome { profile, created })
    }

    pub fn get(&self, id: &ProfileId) -> Result<Profile, ProfileServiceError> {
        self.require(id)
    }

    /// Public directory: approved drivers, optionally narrowed by location, vehicle and availability.
    pub fn list_drivers(
        &self,
        query: &DriverDirectoryQuery,
    ) -> Result<Vec<Profile>, ProfileServiceError> {
        let location = query.location.as_deref().map(str::to_lowercase);
        let vehicle = query.vehicle_type.as_deref().map(str::to_lowercase);

        let drivers = self
            .repository
            .list(&ProfileFilter::approved_drivers())?
            .into_iter()
            .filter(|profile| !query.available_only || profile.is_available)
            .filter(|profile| contains(profile.location.as_deref(), location.as_deref()))
            .filter(|profile| contains(profile.vehicle_type.as_deref(), vehicle.as_deref()))
            .collect();
        Ok(drivers)
    }

    pub fn update_user_status(
        &self,
        request: UserStatusRequest,
    ) -> Result<Profile, ProfileServiceError> {
        let mut fields = RequiredFields::new();
        let id = ProfileId(fields.take("id", request.id));
        fields.finish()?;

        let mut profile = self.require(&id)?;
        if let Some(approved) = request.is_approved {
            profile.is_approved = approved;
        }
        if let Some(available) = request.is_available {
            profile.is_available = available;
        }
        if let Some(role) = request.role {
            profile.role = Some(role);
        }
        profile.updated_at = Utc::now();

        let stored = self.repository.update(profile)?;
        info!(
            profile = %stored.id,
            approved = stored.is_approved,
            available = stored.is_available,
            role = ?stored.role,
            "user status overridden"
        );
        Ok(stored)
    }

    /// Approve and list every driver still awaiting approval.
    pub fn approve_pending_drivers(&self) -> Result<Vec<Profile>, ProfileServiceError> {
        let now = Utc::now();
        let mut approved = Vec::new();
        for mut profile in self.repository.list(&ProfileFilter::unapproved_drivers())? {
            profile.is_approved = true;
            profile.is_available = true;
            profile.updated_at = now;
            approved.push(self.repository.update(profile)?);
        }
        info!(count = approved.len(), "pending drivers approved");
        Ok(approved)
    }

    pub fn list_users(&self, query: &UserSearchQuery) -> Result<Page<Profile>, ProfileServiceError> {
        let filter = ProfileFilter {
            role: query.role,
            search: present(query.q.clone()),
            ..ProfileFilter::default()
        };
        let window = PageRequest::new(query.page, query.page_size);
        Ok(window.apply(self.repository.list(&filter)?))
    }

    pub fn pending_kyc(&self) -> Result<Vec<PendingKycView>, ProfileServiceError> {
        let base = self.settings.storage_public_url.as_deref();
        Ok(self
            .repository
            .list(&ProfileFilter::kyc(KycStatus::Pending))?
            .iter()
            .map(|profile| kyc::pending_view(profile, base))
            .collect())
    }

    fn require(&self, id: &ProfileId) -> Result<Profile, ProfileServiceError> {
        self.repository
            .fetch(id)?
            .ok_or_else(|| ProfileServiceError::NotFound(id.clone()))
    }
}

fn contains(value: Option<&str>, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) => value.is_some_and(|value| value.to_lowercase().contains(needle)),
        None => true,
    }
}

fn apply_driver_updates(profile: &mut Profile, updates: DriverProfileUpdate) {
    let DriverProfileUpdate {
        full_name,
        phone,
        location,
        availability,
        vehicle_type,
        license_type,
        rate,
        years_experience,
        photo_url,
        bio,
    } = updates;

    for (slot, value) in [
        (&mut profile.full_name, full_name),
        (&mut profile.phone, phone),
        (&mut profile.location, location),
        (&mut profile.availability, availability),
        (&mut profile.vehicle_type, vehicle_type),
        (&mut profile.license_type, license_type),
        (&mut profile.rate, rate),
        (&mut profile.photo_url, photo_url),
        (&mut profile.bio, bio),
    ] {
        if let Some(value) = present(value) {
            *slot = Some(value);
        }
    }
    if years_experience.is_some() {
        profile.years_experience = years_experience;
    }
}

/// Error raised by the profile service.
#[derive(Debug, thiserror::Error)]
pub enum ProfileServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("profile {0} not found")]
    NotFound(ProfileId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Access(#[from] AccessError),
}
