//! Shared fixture: the full service stack wired over in-memory backends.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use stashhub_core::traits::identity::{CurrentUser, IdentityProvider, SessionIdentity};
use stashhub_core::types::UserId;
use stashhub_database::memory::MemoryBackend;
use stashhub_entity::profile::Profile;
use stashhub_service::{
    ActivityLogger, ActorNameCache, EnvironmentService, InventoryCache, InventoryService,
    NotificationService, SearchService, ShareService,
};

/// The whole service stack over one in-memory store and one session.
pub struct TestApp {
    pub backend: Arc<MemoryBackend>,
    pub identity: Arc<SessionIdentity>,
    pub cache: Arc<InventoryCache>,
    pub names: Arc<ActorNameCache>,
    pub activity: Arc<ActivityLogger>,
    pub environments: Arc<EnvironmentService>,
    pub shares: Arc<ShareService>,
    pub inventory: Arc<InventoryService>,
    pub notifications: Arc<NotificationService>,
    pub search: SearchService,
}

impl TestApp {
    pub fn new() -> Self {
        let backend = Arc::new(MemoryBackend::new());
        Self::with_backend(backend)
    }

    /// Build a second stack (a second device or user) over the same store.
    pub fn sibling(&self) -> Self {
        Self::with_backend(Arc::clone(&self.backend))
    }

    fn with_backend(backend: Arc<MemoryBackend>) -> Self {
        let identity = Arc::new(SessionIdentity::new());
        let cache = Arc::new(InventoryCache::new());
        let names = Arc::new(ActorNameCache::new());

        let activity = Arc::new(ActivityLogger::new(
            backend.clone(),
            backend.clone(),
            Arc::clone(&names),
        ));
        let environments = Arc::new(EnvironmentService::new(
            backend.clone(),
            backend.clone(),
            identity.clone(),
        ));
        let shares = Arc::new(ShareService::new(
            backend.clone(),
            backend.clone(),
            backend.clone(),
            backend.clone(),
            identity.clone(),
        ));
        let inventory = Arc::new(InventoryService::new(
            backend.clone(),
            backend.clone(),
            backend.clone(),
            identity.clone(),
            Arc::clone(&shares),
            Arc::clone(&cache),
            Arc::clone(&activity),
        ));
        let notifications = Arc::new(NotificationService::new(backend.clone(), identity.clone()));
        let search = SearchService::new(Arc::clone(&cache));

        Self {
            backend,
            identity,
            cache,
            names,
            activity,
            environments,
            shares,
            inventory,
            notifications,
            search,
        }
    }

    /// Register an account (profile row) and return its identity.
    pub async fn register_user(&self, email: &str, full_name: Option<&str>) -> CurrentUser {
        let id = UserId::new();
        self.backend
            .seed_profile(Profile {
                id,
                email: email.to_string(),
                full_name: full_name.map(str::to_string),
                phone: None,
            })
            .await;
        CurrentUser::new(id, email)
    }

    pub fn sign_in(&self, user: &CurrentUser) {
        self.identity.sign_in(user.clone());
    }

    pub fn sign_out(&self) {
        self.identity.sign_out();
    }
}

/// Poll until the condition holds or a short deadline passes.
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..200 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    false
}

/// The current user through the trait, for assertions.
pub async fn current_user(identity: &SessionIdentity) -> Option<CurrentUser> {
    identity.current_user().await.unwrap()
}
