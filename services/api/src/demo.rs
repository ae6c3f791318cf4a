use crate::infra::Marketplace;
use clap::Args;
use driverhire::auth::Session;
use driverhire::error::AppError;
use driverhire::workflows::bookings::{BookingStatusRequest, CreateBookingRequest};
use driverhire::workflows::feedback::{CreateReviewRequest, ReviewQuery};
use driverhire::workflows::memory::RecordingNotifier;
use driverhire::workflows::notifications::EmailMessage;
use driverhire::workflows::profiles::{
    DriverDirectoryQuery, DriverProfileUpdate, KycDecisionRequest, KycSubmissionRequest,
    ProfileId, ProfileServiceError, ProfileSettings, Role, UpdateDriverProfileRequest,
    UpsertProfileRequest,
};
use std::sync::Arc;

const DRIVER_ID: &str = "demo-driver";
const EMPLOYER_ID: &str = "demo-employer";
const ADMIN_ID: &str = "demo-admin";

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Decline the driver's KYC documents instead of approving them
    #[arg(long)]
    pub(crate) reject_kyc: bool,
    /// Site URL used in e-mail links
    #[arg(long, default_value = "https://easydriverhire.com")]
    pub(crate) site_url: String,
    /// Print the full body of every e-mail the workflow would send
    #[arg(long)]
    pub(crate) show_emails: bool,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            reject_kyc: false,
            site_url: "https://easydriverhire.com".to_string(),
            show_emails: false,
        }
    }
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        reject_kyc,
        site_url,
        show_emails,
    } = args;

    let notifier = RecordingNotifier::default();
    let settings = ProfileSettings {
        site_url,
        storage_public_url: Some("https://storage.easydriverhire.com/public".to_string()),
    };
    let marketplace = Marketplace::in_memory(Arc::new(notifier.clone()), settings);
    let mut outbox = Outbox::new(notifier, show_emails);

    println!("EasyDriverHire workflow demo (in-memory stores, e-mail captured locally)");

    println!("\n1. Sign-up");
    marketplace
        .seed_admin(ADMIN_ID, Some("ops@easydriverhire.com"))
        .map_err(ProfileServiceError::from)?;
    let driver = marketplace.profiles.upsert_on_auth(UpsertProfileRequest {
        id: Some(DRIVER_ID.to_string()),
        email: Some("kamau.driver@example.com".to_string()),
        role: Some(Role::Driver),
    })?;
    println!(
        "- Driver {} signed in -> approved {} | available {}",
        driver.id, driver.is_approved, driver.is_available
    );
    let employer = marketplace.profiles.upsert_on_auth(UpsertProfileRequest {
        id: Some(EMPLOYER_ID.to_string()),
        email: Some("amina.employer@example.com".to_string()),
        role: Some(Role::Employer),
    })?;
    println!("- Employer {} signed in", employer.id);

    println!("\n2. Driver profile");
    let updated = marketplace
        .profiles
        .update_driver_profile(UpdateDriverProfileRequest {
            id: Some(DRIVER_ID.to_string()),
            updates: Some(DriverProfileUpdate {
                full_name: Some("Kamau Njoroge".to_string()),
                location: Some("Nairobi".to_string()),
                vehicle_type: Some("Saloon".to_string()),
                rate: Some("Ksh 2,500/day".to_string()),
                years_experience: Some(6),
                bio: Some(String::new()),
                ..DriverProfileUpdate::default()
            }),
        })?;
    println!(
        "- {} | {} | {} | {}",
        updated.profile.display_name().unwrap_or("unnamed"),
        updated.profile.location.as_deref().unwrap_or("-"),
        updated.profile.vehicle_type.as_deref().unwrap_or("-"),
        updated.profile.rate.as_deref().unwrap_or("-"),
    );

    println!("\n3. KYC");
    let submitted = marketplace
        .profiles
        .submit_kyc(KycSubmissionRequest {
            id: Some(DRIVER_ID.to_string()),
            email: None,
            kyc_id_document_url: Some(format!("{DRIVER_ID}/national-id.jpg")),
            kyc_selfie_url: Some(format!("{DRIVER_ID}/selfie.jpg")),
            kyc_drivers_license_url: Some(format!("{DRIVER_ID}/license.jpg")),
            kyc_dob: Some("1989-04-17".to_string()),
        })
        .await?;
    println!("- Submitted -> status {}", submitted.profile.kyc_status.label());
    outbox.flush();

    for entry in marketplace.profiles.pending_kyc()? {
        println!(
            "- Review queue: {} (selfie {})",
            entry.id,
            entry.selfie_link.as_deref().unwrap_or("unavailable")
        );
    }

    let verdict = if reject_kyc { "rejected" } else { "approved" };
    let decided = marketplace
        .profiles
        .decide_kyc(KycDecisionRequest {
            id: Some(DRIVER_ID.to_string()),
            status: Some(verdict.to_string()),
        })
        .await?;
    println!("- Admin verdict -> status {}", decided.profile.kyc_status.label());
    outbox.flush();

    println!("\n4. Directory");
    let listed = marketplace.profiles.list_drivers(&DriverDirectoryQuery {
        location: Some("nairobi".to_string()),
        vehicle_type: None,
        available_only: true,
    })?;
    for profile in &listed {
        println!(
            "- {} ({})",
            profile.display_name().unwrap_or("unnamed"),
            profile.id
        );
    }

    println!("\n5. Booking");
    let employer_session = Session {
        user_id: ProfileId(EMPLOYER_ID.to_string()),
        email: employer.email.clone(),
    };
    let outcome = marketplace
        .bookings
        .create(
            CreateBookingRequest {
                driver_id: Some(DRIVER_ID.to_string()),
                client_name: Some("Amina Hassan".to_string()),
                client_email: Some("amina.employer@example.com".to_string()),
                client_phone: Some("+254 700 000 000".to_string()),
                message: Some("Airport pickups for the week of the 20th".to_string()),
                employer_id: None,
            },
            Some(&employer_session),
        )
        .await?;
    println!(
        "- Booking {} -> status {}",
        outcome.booking.id, outcome.booking.status
    );
    outbox.flush();

    let confirmed = marketplace.bookings.update_status(BookingStatusRequest {
        id: Some(outcome.booking.id.0.clone()),
        status: Some("confirmed".to_string()),
    })?;
    println!("- Admin override -> status {}", confirmed.status);

    let mine = marketplace.bookings.for_participant(&employer_session)?;
    println!("- Employer sees {} booking(s)", mine.len());

    println!("\n6. Feedback");
    let review = marketplace.feedback.create_review(CreateReviewRequest {
        reviewer_id: Some(EMPLOYER_ID.to_string()),
        reviewed_user_id: Some(DRIVER_ID.to_string()),
        booking_id: Some(outcome.booking.id.0.clone()),
        rating: Some(5),
        comment: Some("On time every day".to_string()),
    })?;
    println!("- Review {} recorded ({} stars)", review.id, review.rating);
    for view in marketplace.feedback.list_reviews(&ReviewQuery {
        user_id: Some(DRIVER_ID.to_string()),
    })? {
        println!(
            "  - {} stars from {}",
            view.review.rating,
            view.reviewer_email.as_deref().unwrap_or("unknown reviewer")
        );
    }

    println!("\nDemo complete: {} e-mail(s) captured", outbox.total());
    Ok(())
}

/// Prints captured e-mails as each workflow step produces them.
struct Outbox {
    notifier: RecordingNotifier,
    printed: usize,
    verbose: bool,
}

impl Outbox {
    fn new(notifier: RecordingNotifier, verbose: bool) -> Self {
        Self {
            notifier,
            printed: 0,
            verbose,
        }
    }

    fn flush(&mut self) {
        let messages = self.notifier.messages();
        for message in messages.iter().skip(self.printed) {
            render_email(message, self.verbose);
        }
        self.printed = messages.len();
    }

    fn total(&self) -> usize {
        self.notifier.messages().len()
    }
}

fn render_email(message: &EmailMessage, verbose: bool) {
    println!("  E-mail to {}: {}", message.to, message.subject);
    if verbose {
        for line in message.text.lines() {
            println!("    | {line}");
        }
    }
}
