use std::sync::Arc;

use crate::workflows::memory::{InMemoryProfileRepository, RecordingNotifier};
use crate::workflows::profiles::{
    profile_router, KycSubmissionRequest, ProfileService, ProfileSettings,
};
use crate::workflows::test_support::gate;

pub(super) type TestService = ProfileService<InMemoryProfileRepository, RecordingNotifier>;

pub(super) fn settings() -> ProfileSettings {
    ProfileSettings {
        site_url: "https://edh.test".to_string(),
        storage_public_url: Some("https://cdn.edh.test/storage/v1/object/public".to_string()),
    }
}

pub(super) fn build_service() -> (TestService, InMemoryProfileRepository, RecordingNotifier) {
    build_with(RecordingNotifier::default())
}

pub(super) fn build_with(
    notifier: RecordingNotifier,
) -> (TestService, InMemoryProfileRepository, RecordingNotifier) {
    let repository = InMemoryProfileRepository::default();
    let service = ProfileService::new(
        Arc::new(repository.clone()),
        Arc::new(notifier.clone()),
        settings(),
    );
    (service, repository, notifier)
}

pub(super) fn router() -> (axum::Router, InMemoryProfileRepository, RecordingNotifier) {
    let (service, repository, notifier) = build_service();
    (profile_router(Arc::new(service), gate()), repository, notifier)
}

pub(super) fn kyc_request(id: &str) -> KycSubmissionRequest {
    KycSubmissionRequest {
        id: Some(id.to_string()),
        email: None,
        kyc_id_document_url: Some(format!("{id}/id.jpg")),
        kyc_selfie_url: Some(format!("{id}/selfie.jpg")),
        kyc_drivers_license_url: Some(format!("{id}/license.jpg")),
        kyc_dob: Some("1990-06-01".to_string()),
    }
}
