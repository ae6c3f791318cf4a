use chrono::{DateTime, Utc};

use super::domain::{
    KycDecision, KycDecisionRequest, KycDocuments, KycStatus, KycSubmissionRequest,
    PendingKycView, Profile, ProfileId,
};
use crate::workflows::validation::{parse_date, present, RequiredFields, ValidationError};

const KYC_BUCKET: &str = "kyc-docs";

/// Validated submission: who submitted, where to confirm, and what was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidatedSubmission {
    pub(crate) id: ProfileId,
    pub(crate) email: Option<String>,
    pub(crate) documents: KycDocuments,
}

pub(crate) fn validate_submission(
    request: KycSubmissionRequest,
) -> Result<ValidatedSubmission, ValidationError> {
    let mut fields = RequiredFields::new();
    let id = fields.take("id", request.id);
    let id_document_url = fields.take("kyc_id_document_url", request.kyc_id_document_url);
    let selfie_url = fields.take("kyc_selfie_url", request.kyc_selfie_url);
    let drivers_license_url =
        fields.take("kyc_drivers_license_url", request.kyc_drivers_license_url);
    let dob = fields.take("kyc_dob", request.kyc_dob);
    fields.finish()?;

    Ok(ValidatedSubmission {
        id: ProfileId(id),
        email: present(request.email),
        documents: KycDocuments {
            id_document_url,
            selfie_url,
            drivers_license_url,
            dob: parse_date("kyc_dob", &dob)?,
        },
    })
}

pub(crate) fn validate_decision(
    request: KycDecisionRequest,
) -> Result<(ProfileId, KycDecision), ValidationError> {
    let mut fields = RequiredFields::new();
    let id = fields.take("id", request.id);
    let status = fields.take("status", request.status);
    fields.finish()?;

    let decision =
        KycDecision::parse(&status).ok_or(ValidationError::InvalidKycDecision(status))?;
    Ok((ProfileId(id), decision))
}

/// Record of a status change so callers can log or report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KycTransition {
    pub previous: KycStatus,
    pub current: KycStatus,
}

impl KycTransition {
    /// Admin verdicts are accepted from any state; this flags the ones that skipped review.
    pub fn bypassed_review(&self) -> bool {
        self.previous != KycStatus::Pending && self.current != KycStatus::Pending
    }
}

/// Store the documents and (re)open review. Valid from every state.
pub(crate) fn apply_submission(
    profile: &mut Profile,
    documents: KycDocuments,
    now: DateTime<Utc>,
) -> KycTransition {
    let previous = profile.kyc_status;
    profile.kyc_id_document_url = Some(documents.id_document_url);
    profile.kyc_selfie_url = Some(documents.selfie_url);
    profile.kyc_drivers_license_url = Some(documents.drivers_license_url);
    profile.kyc_dob = Some(documents.dob);
    profile.kyc_status = KycStatus::Pending;
    profile.updated_at = now;
    KycTransition {
        previous,
        current: KycStatus::Pending,
    }
}

pub(crate) fn apply_decision(
    profile: &mut Profile,
    decision: KycDecision,
    now: DateTime<Utc>,
) -> KycTransition {
    let previous = profile.kyc_status;
    profile.kyc_status = decision.status();
    profile.updated_at = now;
    KycTransition {
        previous,
        current: profile.kyc_status,
    }
}

/// Absolute URLs pass through; bare storage paths are joined onto the public bucket URL.
pub(crate) fn document_link(stored: Option<&str>, public_base: Option<&str>) -> Option<String> {
    let stored = stored.map(str::trim).filter(|value| !value.is_empty())?;
    if stored.starts_with("http://") || stored.starts_with("https://") {
        return Some(stored.to_string());
    }
    public_base.map(|base| {
        format!(
            "{}/{KYC_BUCKET}/{}",
            base.trim_end_matches('/'),
            stored.trim_start_matches('/')
        )
    })
}

pub(crate) fn pending_view(profile: &Profile, public_base: Option<&str>) -> PendingKycView {
    PendingKycView {
        id: profile.id.clone(),
        email: profile.email.clone(),
        full_name: profile.full_name.clone(),
        kyc_dob: profile.kyc_dob,
        id_document_link: document_link(profile.kyc_id_document_url.as_deref(), public_base),
        selfie_link: document_link(profile.kyc_selfie_url.as_deref(), public_base),
        drivers_license_link: document_link(
            profile.kyc_drivers_license_url.as_deref(),
            public_base,
        ),
    }
}
