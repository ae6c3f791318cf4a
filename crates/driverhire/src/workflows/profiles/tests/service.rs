use super::common::*;
use crate::workflows::memory::RecordingNotifier;
use crate::workflows::notifications::templates::{
    KYC_DECLINED_SUBJECT, KYC_RECEIVED_SUBJECT, KYC_VERIFIED_SUBJECT,
};
use crate::workflows::notifications::NotificationStatus;
use crate::workflows::profiles::{
    AvailabilityRequest, DriverDirectoryQuery, DriverProfileUpdate, KycDecisionRequest, KycStatus,
    ProfileId, ProfileRepository, ProfileServiceError, Role, UpdateDriverProfileRequest,
    UpsertProfileRequest, UserSearchQuery, UserStatusRequest,
};
use crate::workflows::test_support::seed;
use crate::workflows::validation::ValidationError;

fn upsert(id: &str, email: &str, role: Option<Role>) -> UpsertProfileRequest {
    UpsertProfileRequest {
        id: Some(id.to_string()),
        email: Some(email.to_string()),
        role,
    }
}

fn decision(id: &str, status: &str) -> KycDecisionRequest {
    KycDecisionRequest {
        id: Some(id.to_string()),
        status: Some(status.to_string()),
    }
}

#[test]
fn driver_sign_in_is_auto_approved() {
    let (service, _, _) = build_service();
    let profile = service
        .upsert_on_auth(upsert("driver-1", "d@example.com", Some(Role::Driver)))
        .expect("upsert succeeds");
    assert!(profile.is_driver && profile.is_approved && profile.is_available);

    let employer = service
        .upsert_on_auth(upsert("emp-1", "e@example.com", Some(Role::Employer)))
        .expect("upsert succeeds");
    assert!(!employer.is_driver && !employer.is_approved && !employer.is_available);
}

#[test]
fn repeated_upsert_keeps_latest_email_and_existing_details() {
    let (service, repository, _) = build_service();
    service
        .upsert_on_auth(upsert("driver-1", "first@example.com", Some(Role::Driver)))
        .expect("first upsert");
    let mut stored = repository
        .fetch(&ProfileId("driver-1".to_string()))
        .expect("fetch")
        .expect("present");
    stored.full_name = Some("Kamau".to_string());
    repository.update(stored).expect("seed name");

    let profile = service
        .upsert_on_auth(upsert("driver-1", "second@example.com", Some(Role::Driver)))
        .expect("second upsert");
    assert_eq!(profile.email.as_deref(), Some("second@example.com"));
    assert_eq!(profile.full_name.as_deref(), Some("Kamau"));
}

#[test]
fn upsert_requires_id_and_email() {
    let (service, _, _) = build_service();
    let request = UpsertProfileRequest {
        id: Some("driver-1".to_string()),
        email: Some("  ".to_string()),
        role: None,
    };
    match service.upsert_on_auth(request) {
        Err(ProfileServiceError::Validation(ValidationError::MissingFields { fields })) => {
            assert_eq!(fields, vec!["email"]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn sign_in_cannot_grant_admin_role() {
    let (service, _, _) = build_service();
    let profile = service
        .upsert_on_auth(upsert("emp-1", "e@example.com", Some(Role::Admin)))
        .expect("upsert succeeds");
    assert_eq!(profile.role, None);
    assert!(!profile.is_approved);

    let employer = service
        .upsert_on_auth(upsert("emp-1", "e@example.com", Some(Role::Employer)))
        .expect("upsert succeeds");
    let escalated = service
        .upsert_on_auth(upsert("emp-1", "e@example.com", Some(Role::Admin)))
        .expect("upsert succeeds");
    assert_eq!(employer.role, Some(Role::Employer));
    assert_eq!(escalated.role, Some(Role::Employer));
    assert!(!escalated.is_approved);
}

#[test]
fn admin_keeps_role_across_sign_ins() {
    let (service, repository, _) = build_service();
    let mut admin = seed(&repository, "admin-1", Role::Admin, Some("ops@example.com"));
    admin.is_approved = true;
    repository.upsert(admin).expect("approve admin");

    for role in [None, Some(Role::Driver)] {
        let profile = service
            .upsert_on_auth(upsert("admin-1", "ops+new@example.com", role))
            .expect("upsert succeeds");
        assert_eq!(profile.role, Some(Role::Admin));
        assert!(profile.is_approved);
        assert!(!profile.is_driver);
        assert_eq!(profile.email.as_deref(), Some("ops+new@example.com"));
    }
}

#[tokio::test]
async fn kyc_submission_moves_to_pending_and_confirms_receipt() {
    let (service, repository, notifier) = build_service();
    seed(&repository, "driver-1", Role::Driver, Some("d@example.com"));

    let outcome = service
        .submit_kyc(kyc_request("driver-1"))
        .await
        .expect("submission succeeds");

    assert_eq!(outcome.profile.kyc_status, KycStatus::Pending);
    assert!(outcome.notification.is_sent());
    let messages = notifier.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].to, "d@example.com");
    assert_eq!(messages[0].subject, KYC_RECEIVED_SUBJECT);
}

#[tokio::test]
async fn resubmission_while_pending_is_not_reacknowledged() {
    let (service, repository, notifier) = build_service();
    seed(&repository, "driver-1", Role::Driver, Some("d@example.com"));

    service
        .submit_kyc(kyc_request("driver-1"))
        .await
        .expect("first submission");
    let again = service
        .submit_kyc(kyc_request("driver-1"))
        .await
        .expect("resubmission");

    assert_eq!(again.profile.kyc_status, KycStatus::Pending);
    assert_eq!(again.notification.status, NotificationStatus::Skipped);
    assert_eq!(notifier.messages().len(), 1);

    service
        .decide_kyc(decision("driver-1", "rejected"))
        .await
        .expect("declined");
    let after_decline = service
        .submit_kyc(kyc_request("driver-1"))
        .await
        .expect("resubmitted after decline");
    assert!(after_decline.notification.is_sent());
    let received = notifier
        .messages()
        .into_iter()
        .filter(|message| message.subject == KYC_RECEIVED_SUBJECT)
        .count();
    assert_eq!(received, 2);
}

#[tokio::test]
async fn incomplete_kyc_submission_writes_nothing() {
    let (service, repository, notifier) = build_service();
    seed(&repository, "driver-1", Role::Driver, Some("d@example.com"));

    for strip in ["id", "kyc_id_document_url", "kyc_selfie_url", "kyc_dob"] {
        let mut request = kyc_request("driver-1");
        match strip {
            "id" => request.id = None,
            "kyc_id_document_url" => request.kyc_id_document_url = Some(String::new()),
            "kyc_selfie_url" => request.kyc_selfie_url = None,
            _ => request.kyc_dob = Some(" ".to_string()),
        }
        let result = service.submit_kyc(request).await;
        assert!(
            matches!(result, Err(ProfileServiceError::Validation(_))),
            "{strip} should be required"
        );
    }

    let stored = repository
        .fetch(&ProfileId("driver-1".to_string()))
        .expect("fetch")
        .expect("present");
    assert_eq!(stored.kyc_status, KycStatus::None);
    assert!(stored.kyc_id_document_url.is_none());
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn kyc_for_unknown_profile_is_not_found() {
    let (service, _, _) = build_service();
    let result = service.submit_kyc(kyc_request("ghost")).await;
    assert!(matches!(result, Err(ProfileServiceError::NotFound(_))));
}

#[tokio::test]
async fn verdicts_send_matching_notifications() {
    let (service, repository, notifier) = build_service();
    seed(&repository, "driver-1", Role::Driver, Some("d@example.com"));
    service
        .submit_kyc(kyc_request("driver-1"))
        .await
        .expect("submitted");

    let approved = service
        .decide_kyc(decision("driver-1", "approved"))
        .await
        .expect("approved");
    assert_eq!(approved.profile.kyc_status, KycStatus::Approved);

    let rejected = service
        .decide_kyc(decision("driver-1", "Rejected"))
        .await
        .expect("rejected");
    assert_eq!(rejected.profile.kyc_status, KycStatus::Rejected);

    let subjects: Vec<String> = notifier
        .messages()
        .into_iter()
        .map(|message| message.subject)
        .collect();
    assert_eq!(
        subjects,
        vec![
            KYC_RECEIVED_SUBJECT.to_string(),
            KYC_VERIFIED_SUBJECT.to_string(),
            KYC_DECLINED_SUBJECT.to_string(),
        ]
    );
    assert!(notifier.messages()[1]
        .text
        .contains("https://edh.test/drivers/dashboard"));
    assert!(notifier.messages()[2].text.contains("https://edh.test/drivers/kyc"));
}

#[tokio::test]
async fn verdict_without_submission_is_still_applied() {
    let (service, repository, _) = build_service();
    seed(&repository, "driver-1", Role::Driver, Some("d@example.com"));
    let outcome = service
        .decide_kyc(decision("driver-1", "approved"))
        .await
        .expect("permissive verdict");
    assert_eq!(outcome.profile.kyc_status, KycStatus::Approved);
}

#[tokio::test]
async fn unknown_verdict_is_rejected() {
    let (service, repository, _) = build_service();
    seed(&repository, "driver-1", Role::Driver, None);
    let result = service.decide_kyc(decision("driver-1", "maybe")).await;
    assert!(matches!(
        result,
        Err(ProfileServiceError::Validation(
            ValidationError::InvalidKycDecision(_)
        ))
    ));
}

#[tokio::test]
async fn notification_failure_does_not_fail_the_verdict() {
    let (service, repository, _) = build_with(RecordingNotifier::failing("provider down"));
    seed(&repository, "driver-1", Role::Driver, Some("d@example.com"));
    let outcome = service
        .decide_kyc(decision("driver-1", "approved"))
        .await
        .expect("verdict stored");
    assert_eq!(outcome.notification.status, NotificationStatus::Failed);
    let stored = repository
        .fetch(&ProfileId("driver-1".to_string()))
        .expect("fetch")
        .expect("present");
    assert_eq!(stored.kyc_status, KycStatus::Approved);
}

#[tokio::test]
async fn missing_email_skips_notification() {
    let (service, repository, notifier) = build_service();
    seed(&repository, "driver-1", Role::Driver, None);
    let outcome = service
        .decide_kyc(decision("driver-1", "rejected"))
        .await
        .expect("verdict stored");
    assert_eq!(outcome.notification.status, NotificationStatus::Skipped);
    assert!(notifier.messages().is_empty());
}

#[test]
fn toggling_twice_restores_availability() {
    let (service, repository, _) = build_service();
    seed(&repository, "driver-1", Role::Driver, None);
    let request = AvailabilityRequest {
        id: Some("driver-1".to_string()),
        is_available: None,
    };

    let first = service
        .toggle_availability(request.clone())
        .expect("first toggle");
    let second = service.toggle_availability(request).expect("second toggle");
    assert!(first.is_available);
    assert!(!second.is_available);

    let explicit = service
        .toggle_availability(AvailabilityRequest {
            id: Some("driver-1".to_string()),
            is_available: Some(false),
        })
        .expect("explicit value");
    assert!(!explicit.is_available);
}

#[test]
fn blank_updates_never_clobber_stored_values() {
    let (service, repository, _) = build_service();
    let mut driver = seed(&repository, "driver-1", Role::Driver, None);
    driver.full_name = Some("Achieng Odhiambo".to_string());
    driver.location = Some("Nairobi".to_string());
    driver.is_driver = false;
    repository.update(driver).expect("seed details");

    let outcome = service
        .update_driver_profile(UpdateDriverProfileRequest {
            id: Some("driver-1".to_string()),
            updates: Some(DriverProfileUpdate {
                full_name: Some(String::new()),
                location: Some("   ".to_string()),
                rate: Some("Ksh 2,500/day".to_string()),
                ..DriverProfileUpdate::default()
            }),
        })
        .expect("update succeeds");

    assert!(!outcome.created);
    assert!(outcome.profile.is_driver);
    assert_eq!(outcome.profile.full_name.as_deref(), Some("Achieng Odhiambo"));
    assert_eq!(outcome.profile.location.as_deref(), Some("Nairobi"));
    assert_eq!(outcome.profile.rate.as_deref(), Some("Ksh 2,500/day"));
}

#[test]
fn update_creates_missing_driver_row() {
    let (service, _, _) = build_service();
    let outcome = service
        .update_driver_profile(UpdateDriverProfileRequest {
            id: Some("driver-9".to_string()),
            updates: Some(DriverProfileUpdate {
                vehicle_type: Some("Matatu".to_string()),
                years_experience: Some(4),
                ..DriverProfileUpdate::default()
            }),
        })
        .expect("created");
    assert!(outcome.created);
    assert!(outcome.profile.is_driver && outcome.profile.is_approved);
    assert_eq!(outcome.profile.years_experience, Some(4));
}

#[test]
fn empty_update_is_rejected() {
    let (service, _, _) = build_service();
    let result = service.update_driver_profile(UpdateDriverProfileRequest {
        id: Some("driver-1".to_string()),
        updates: Some(DriverProfileUpdate::default()),
    });
    assert!(matches!(
        result,
        Err(ProfileServiceError::Validation(ValidationError::NoUpdates))
    ));
}

#[test]
fn directory_lists_only_approved_drivers() {
    let (service, repository, _) = build_service();
    let mut listed = seed(&repository, "driver-1", Role::Driver, None);
    listed.is_approved = true;
    listed.is_available = true;
    listed.location = Some("Nairobi CBD".to_string());
    listed.vehicle_type = Some("Saloon".to_string());
    repository.update(listed).expect("approve");
    seed(&repository, "driver-2", Role::Driver, None);
    seed(&repository, "emp-1", Role::Employer, None);

    let all = service
        .list_drivers(&DriverDirectoryQuery::default())
        .expect("list");
    assert_eq!(all.len(), 1);

    let filtered = service
        .list_drivers(&DriverDirectoryQuery {
            location: Some("nairobi".to_string()),
            vehicle_type: Some("truck".to_string()),
            available_only: true,
        })
        .expect("list");
    assert!(filtered.is_empty());
}

#[test]
fn admin_overrides_and_bulk_approval() {
    let (service, repository, _) = build_service();
    seed(&repository, "driver-1", Role::Driver, None);
    seed(&repository, "driver-2", Role::Driver, None);

    let approved = service.approve_pending_drivers().expect("bulk approve");
    assert_eq!(approved.len(), 2);
    assert!(approved.iter().all(|profile| profile.is_approved && profile.is_available));
    assert!(service.approve_pending_drivers().expect("idempotent").is_empty());

    let demoted = service
        .update_user_status(UserStatusRequest {
            id: Some("driver-1".to_string()),
            is_approved: Some(false),
            is_available: None,
            role: Some(Role::Employer),
        })
        .expect("override");
    assert!(!demoted.is_approved);
    assert!(demoted.is_available);
    assert_eq!(demoted.role, Some(Role::Employer));
}

#[test]
fn user_search_pages_and_filters() {
    let (service, repository, _) = build_service();
    for index in 0..5 {
        seed(
            &repository,
            &format!("driver-{index}"),
            Role::Driver,
            Some(&format!("driver{index}@example.com")),
        );
    }
    seed(&repository, "emp-1", Role::Employer, Some("boss@example.com"));

    let page = service
        .list_users(&UserSearchQuery {
            q: None,
            role: Some(Role::Driver),
            page: Some(2),
            page_size: Some(2),
        })
        .expect("list");
    assert_eq!(page.total, 5);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.page, 2);

    let search = service
        .list_users(&UserSearchQuery {
            q: Some("BOSS".to_string()),
            ..UserSearchQuery::default()
        })
        .expect("search");
    assert_eq!(search.total, 1);

    let clamped = service
        .list_users(&UserSearchQuery {
            page_size: Some(500),
            ..UserSearchQuery::default()
        })
        .expect("clamped");
    assert_eq!(clamped.page_size, 100);
}

#[tokio::test]
async fn pending_queue_resolves_document_links() {
    let (service, repository, _) = build_service();
    seed(&repository, "driver-1", Role::Driver, Some("d@example.com"));
    service
        .submit_kyc(kyc_request("driver-1"))
        .await
        .expect("submitted");

    let queue = service.pending_kyc().expect("queue");
    assert_eq!(queue.len(), 1);
    assert_eq!(
        queue[0].selfie_link.as_deref(),
        Some("https://cdn.edh.test/storage/v1/object/public/kyc-docs/driver-1/selfie.jpg")
    );
}
