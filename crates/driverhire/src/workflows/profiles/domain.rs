use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier issued by the authentication provider for each user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub String);

impl ProfileId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Marketplace role chosen at sign-up or assigned by an administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Driver,
    Employer,
    Admin,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Driver => "driver",
            Role::Employer => "employer",
            Role::Admin => "admin",
        }
    }
}

/// Identity verification state stored on each profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KycStatus {
    #[default]
    None,
    Pending,
    Approved,
    Rejected,
}

impl KycStatus {
    pub const fn label(self) -> &'static str {
        match self {
            KycStatus::None => "none",
            KycStatus::Pending => "pending",
            KycStatus::Approved => "approved",
            KycStatus::Rejected => "rejected",
        }
    }
}

/// Administrator verdict on a KYC submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KycDecision {
    Approved,
    Rejected,
}

impl KycDecision {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub const fn status(self) -> KycStatus {
        match self {
            KycDecision::Approved => KycStatus::Approved,
            KycDecision::Rejected => KycStatus::Rejected,
        }
    }
}

/// One row per user, unifying the driver and employer sides of the marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub is_driver: bool,
    pub is_approved: bool,
    pub is_available: bool,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub availability: Option<String>,
    pub vehicle_type: Option<String>,
    pub license_type: Option<String>,
    pub rate: Option<String>,
    pub years_experience: Option<u32>,
    pub photo_url: Option<String>,
    pub bio: Option<String>,
    pub kyc_status: KycStatus,
    pub kyc_id_document_url: Option<String>,
    pub kyc_selfie_url: Option<String>,
    pub kyc_drivers_license_url: Option<String>,
    pub kyc_dob: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Blank row with every optional attribute unset.
    pub fn new(id: ProfileId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            email: None,
            role: None,
            is_driver: false,
            is_approved: false,
            is_available: false,
            full_name: None,
            phone: None,
            location: None,
            availability: None,
            vehicle_type: None,
            license_type: None,
            rate: None,
            years_experience: None,
            photo_url: None,
            bio: None,
            kyc_status: KycStatus::None,
            kyc_id_document_url: None,
            kyc_selfie_url: None,
            kyc_drivers_license_url: None,
            kyc_dob: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    pub fn display_name(&self) -> Option<&str> {
        self.full_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Body of the sign-in upsert call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertProfileRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

/// Document references and date of birth submitted for identity verification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KycSubmissionRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub kyc_id_document_url: Option<String>,
    #[serde(default)]
    pub kyc_selfie_url: Option<String>,
    #[serde(default)]
    pub kyc_drivers_license_url: Option<String>,
    #[serde(default)]
    pub kyc_dob: Option<String>,
}

/// Validated KYC payload ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KycDocuments {
    pub id_document_url: String,
    pub selfie_url: String,
    pub drivers_license_url: String,
    pub dob: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KycDecisionRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Explicit value to set, or `None` to flip the stored flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub is_available: Option<bool>,
}

/// Editable driver attributes. Absent, empty and whitespace-only values are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverProfileUpdate {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub license_type: Option<String>,
    #[serde(default)]
    pub rate: Option<String>,
    #[serde(default)]
    pub years_experience: Option<u32>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDriverProfileRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub updates: Option<DriverProfileUpdate>,
}

/// Administrator override of approval, availability and role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStatusRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub is_approved: Option<bool>,
    #[serde(default)]
    pub is_available: Option<bool>,
    #[serde(default)]
    pub role: Option<Role>,
}

/// Public directory filters applied on top of the approved-driver listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverDirectoryQuery {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub available_only: bool,
}

/// Administrator user search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSearchQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

/// Pending verification entry with resolved document links for reviewers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingKycView {
    pub id: ProfileId,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub kyc_dob: Option<NaiveDate>,
    pub id_document_link: Option<String>,
    pub selfie_link: Option<String>,
    pub drivers_license_link: Option<String>,
}
