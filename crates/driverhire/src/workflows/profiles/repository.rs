use super::domain::{KycStatus, Profile, ProfileId, Role};
use crate::workflows::repository::RepositoryError;

/// Row filter pushed down to the profile store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFilter {
    pub is_driver: Option<bool>,
    pub is_approved: Option<bool>,
    pub kyc_status: Option<KycStatus>,
    pub role: Option<Role>,
    /// Case-insensitive substring over email and full name.
    pub search: Option<String>,
}

impl ProfileFilter {
    pub fn approved_drivers() -> Self {
        Self {
            is_driver: Some(true),
            is_approved: Some(true),
            ..Self::default()
        }
    }

    pub fn unapproved_drivers() -> Self {
        Self {
            is_driver: Some(true),
            is_approved: Some(false),
            ..Self::default()
        }
    }

    pub fn kyc(status: KycStatus) -> Self {
        Self {
            kyc_status: Some(status),
            ..Self::default()
        }
    }

    pub fn matches(&self, profile: &Profile) -> bool {
        if self.is_driver.is_some_and(|flag| profile.is_driver != flag) {
            return false;
        }
        if self.is_approved.is_some_and(|flag| profile.is_approved != flag) {
            return false;
        }
        if self.kyc_status.is_some_and(|status| profile.kyc_status != status) {
            return false;
        }
        if self.role.is_some() && profile.role != self.role {
            return false;
        }
        match self.search.as_deref() {
            Some(needle) => {
                let needle = needle.to_lowercase();
                [profile.email.as_deref(), profile.full_name.as_deref()]
                    .into_iter()
                    .flatten()
                    .any(|haystack| haystack.to_lowercase().contains(&needle))
            }
            None => true,
        }
    }
}

/// Storage abstraction over the hosted `profiles` table.
pub trait ProfileRepository: Send + Sync {
    /// Insert or replace the row keyed by `profile.id`.
    fn upsert(&self, profile: Profile) -> Result<Profile, RepositoryError>;
    /// Replace an existing row; `NotFound` when absent.
    fn update(&self, profile: Profile) -> Result<Profile, RepositoryError>;
    fn fetch(&self, id: &ProfileId) -> Result<Option<Profile>, RepositoryError>;
    /// Matching rows, newest first.
    fn list(&self, filter: &ProfileFilter) -> Result<Vec<Profile>, RepositoryError>;
}
