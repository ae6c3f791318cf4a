use chrono::Utc;
use driverhire::workflows::bookings::BookingService;
use driverhire::workflows::feedback::FeedbackService;
use driverhire::workflows::memory::{
    InMemoryBookingRepository, InMemoryFeedbackRepository, InMemoryProfileRepository,
};
use driverhire::workflows::notifications::Notifier;
use driverhire::workflows::profiles::{
    Profile, ProfileId, ProfileRepository, ProfileService, ProfileSettings, Role,
};
use driverhire::workflows::repository::RepositoryError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type ProfileApi<N> = ProfileService<InMemoryProfileRepository, N>;
pub(crate) type BookingApi<N> =
    BookingService<InMemoryBookingRepository, InMemoryProfileRepository, N>;
pub(crate) type FeedbackApi = FeedbackService<InMemoryFeedbackRepository, InMemoryProfileRepository>;

/// Every workflow service wired against one set of in-memory stores.
pub(crate) struct Marketplace<N> {
    pub(crate) store: InMemoryProfileRepository,
    pub(crate) profiles: Arc<ProfileApi<N>>,
    pub(crate) bookings: Arc<BookingApi<N>>,
    pub(crate) feedback: Arc<FeedbackApi>,
}

impl<N> Marketplace<N>
where
    N: Notifier + 'static,
{
    pub(crate) fn in_memory(notifier: Arc<N>, settings: ProfileSettings) -> Self {
        let store = InMemoryProfileRepository::default();
        let profile_store = Arc::new(store.clone());
        let profiles = Arc::new(ProfileService::new(
            profile_store.clone(),
            notifier.clone(),
            settings,
        ));
        let bookings = Arc::new(BookingService::new(
            Arc::new(InMemoryBookingRepository::default()),
            profile_store.clone(),
            notifier,
        ));
        let feedback = Arc::new(FeedbackService::new(
            Arc::new(InMemoryFeedbackRepository::default()),
            profile_store,
        ));
        Self {
            store,
            profiles,
            bookings,
            feedback,
        }
    }

    /// Admin rows are provisioned out of band; this is the in-memory equivalent.
    pub(crate) fn seed_admin(
        &self,
        id: &str,
        email: Option<&str>,
    ) -> Result<Profile, RepositoryError> {
        let mut profile = Profile::new(ProfileId(id.to_string()), Utc::now());
        profile.role = Some(Role::Admin);
        profile.email = email.map(str::to_string);
        self.store.upsert(profile)
    }
}
