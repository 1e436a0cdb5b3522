//! Best-effort activity logging.
//!
//! Every successful mutation is recorded with an entry naming who did
//! what. Logging is strictly best-effort: a failed append is reported
//! with `warn!` and never fails the mutation that already succeeded.

use std::sync::Arc;

use tracing::warn;

use stashhub_core::result::AppResult;
use stashhub_core::traits::identity::CurrentUser;
use stashhub_core::types::pagination::{PageRequest, PageResponse};
use stashhub_core::types::{ContainerId, EnvironmentId, ItemId};
use stashhub_database::repositories::{ActivityLogRepository, ProfileRepository};
use stashhub_entity::activity::{ActivityEntry, ActivityEvent, CreateActivityEntry};

use crate::session::fallback_display_name;

use super::name_cache::ActorNameCache;

/// Writes and reads the per-environment activity history.
pub struct ActivityLogger {
    activity: Arc<dyn ActivityLogRepository>,
    profiles: Arc<dyn ProfileRepository>,
    names: Arc<ActorNameCache>,
}

impl ActivityLogger {
    /// Create a new activity logger.
    pub fn new(
        activity: Arc<dyn ActivityLogRepository>,
        profiles: Arc<dyn ProfileRepository>,
        names: Arc<ActorNameCache>,
    ) -> Self {
        Self {
            activity,
            profiles,
            names,
        }
    }

    /// Append one entry for a mutation the remote store already confirmed.
    ///
    /// Failures are logged and swallowed: history is worth keeping but
    /// never worth failing a completed mutation over.
    pub async fn record(
        &self,
        actor: &CurrentUser,
        event: ActivityEvent,
        environment_id: EnvironmentId,
        container_id: Option<ContainerId>,
        item_id: Option<ItemId>,
        metadata: serde_json::Value,
    ) {
        let actor_display_name = self.resolve_actor_name(actor).await;
        let entry = CreateActivityEntry {
            environment_id,
            container_id,
            item_id,
            actor_id: actor.id,
            actor_display_name,
            event,
            metadata,
        };
        if let Err(e) = self.activity.append(&entry).await {
            warn!(
                %event,
                environment_id = %environment_id,
                error = %e,
                "failed to append activity entry"
            );
        }
    }

    /// List an environment's history, most recent first.
    pub async fn list_for_environment(
        &self,
        environment_id: EnvironmentId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ActivityEntry>> {
        self.activity.find_by_environment(environment_id, page).await
    }

    /// Resolve the actor's display name, cached per session.
    ///
    /// Fallback order: profile full name, auth-provided display name,
    /// the local part of the email, then a fixed placeholder.
    async fn resolve_actor_name(&self, actor: &CurrentUser) -> String {
        if let Some(name) = self.names.get(actor.id) {
            return name;
        }

        let profile_name = match self.profiles.find_by_id(actor.id).await {
            Ok(profile) => profile.and_then(|p| p.full_name),
            Err(e) => {
                // Fall through without caching so a later call can retry.
                warn!(actor_id = %actor.id, error = %e, "profile lookup failed");
                return fallback_display_name(actor);
            }
        };

        let name = profile_name.unwrap_or_else(|| fallback_display_name(actor));
        self.names.insert(actor.id, name.clone());
        name
    }
}
