//! Session-scoped cache of resolved actor display names.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use stashhub_core::traits::identity::CurrentUser;
use stashhub_core::types::UserId;

/// Caches the display name resolved for each actor so the profile lookup
/// happens once per session instead of once per logged mutation.
#[derive(Debug, Default)]
pub struct ActorNameCache {
    names: DashMap<UserId, String>,
}

impl ActorNameCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached name.
    pub fn get(&self, id: UserId) -> Option<String> {
        self.names.get(&id).map(|entry| entry.clone())
    }

    /// Cache a resolved name.
    pub fn insert(&self, id: UserId, name: String) {
        self.names.insert(id, name);
    }

    /// Drop every cached name.
    pub fn clear(&self) {
        self.names.clear();
    }

    /// Spawn a task that clears the cache whenever the session ends, so a
    /// later sign-in under a different account resolves names afresh.
    pub fn spawn_invalidation(
        self: Arc<Self>,
        mut session: watch::Receiver<Option<CurrentUser>>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            while session.changed().await.is_ok() {
                if session.borrow_and_update().is_none() {
                    debug!("session ended, clearing actor name cache");
                    self.clear();
                }
            }
        })
    }
}
