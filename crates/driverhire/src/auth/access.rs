use tracing::warn;

use super::Session;
use crate::workflows::profiles::{Profile, ProfileRepository};
use crate::workflows::repository::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("{field} does not match the signed-in user")]
    IdentityMismatch { field: &'static str },
    #[error("administrator role required")]
    AdminRequired,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Self-service writes may only target the caller's own rows.
///
/// A missing or blank `claimed` value passes; request validation reports it.
pub fn ensure_same_user(
    session: &Session,
    claimed: Option<&str>,
    field: &'static str,
) -> Result<(), AccessError> {
    match claimed.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) if value != session.user_id.as_str() => {
            warn!(user = %session.user_id, field, "cross-account write rejected");
            Err(AccessError::IdentityMismatch { field })
        }
        _ => Ok(()),
    }
}

/// The caller's stored profile must carry the admin role.
pub fn ensure_admin<R>(repository: &R, session: &Session) -> Result<Profile, AccessError>
where
    R: ProfileRepository + ?Sized,
{
    match repository.fetch(&session.user_id)? {
        Some(profile) if profile.is_admin() => Ok(profile),
        _ => {
            warn!(user = %session.user_id, "admin route denied");
            Err(AccessError::AdminRequired)
        }
    }
}
