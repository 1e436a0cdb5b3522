//! Share lifecycle service.
//!
//! A share is an email-addressed invite on one environment. It starts
//! `Pending`, becomes `Accepted` when the invitee takes it, and is simply
//! deleted on decline or revoke. While a share row exists for an
//! (environment, email) pair, no second invite can be issued for it.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use stashhub_core::AppError;
use stashhub_core::result::AppResult;
use stashhub_core::traits::identity::{CurrentUser, IdentityProvider};
use stashhub_core::types::{EnvironmentId, ShareId};
use stashhub_database::repositories::{
    EnvironmentRepository, NotificationRepository, ProfileRepository, ShareRepository,
};
use stashhub_entity::environment::Environment;
use stashhub_entity::notification::CreateNotification;
use stashhub_entity::share::{CreateShare, Share, ShareStatus};

use crate::session::{fallback_display_name, require_user};

/// The result of an invite attempt.
///
/// Only genuine failures (no session, not the owner, remote errors) are
/// `Err`; these variants are expected outcomes the caller presents to the
/// user.
#[derive(Debug, Clone)]
pub enum InviteOutcome {
    /// The invite was created.
    Invited(Share),
    /// The owner tried to invite themselves.
    SelfShare,
    /// No registered account matches the email.
    UserNotFound,
    /// The invitee already holds an accepted share.
    AlreadyShared,
    /// An invite for this invitee is already awaiting an answer.
    InvitePending,
}

/// Manages share invites and the invitee's pending list.
pub struct ShareService {
    shares: Arc<dyn ShareRepository>,
    environments: Arc<dyn EnvironmentRepository>,
    profiles: Arc<dyn ProfileRepository>,
    notifications: Arc<dyn NotificationRepository>,
    identity: Arc<dyn IdentityProvider>,
    /// Pending invites addressed to the current user, refreshed by
    /// [`list_pending_for_current_user`](Self::list_pending_for_current_user).
    pending: RwLock<Vec<Share>>,
}

impl ShareService {
    /// Create a new share service.
    pub fn new(
        shares: Arc<dyn ShareRepository>,
        environments: Arc<dyn EnvironmentRepository>,
        profiles: Arc<dyn ProfileRepository>,
        notifications: Arc<dyn NotificationRepository>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            shares,
            environments,
            profiles,
            notifications,
            identity,
            pending: RwLock::new(Vec::new()),
        }
    }

    /// Invite an email address to an environment. Owner-only.
    ///
    /// The duplicate guard is check-then-insert; two racing invites for
    /// the same pair can both pass the check, in which case the unique
    /// index rejects the loser with a `Duplicate` error.
    pub async fn create_share(
        &self,
        environment_id: EnvironmentId,
        invitee_email: &str,
    ) -> AppResult<InviteOutcome> {
        let user = require_user(self.identity.as_ref()).await?;
        let environment = self.owned_environment(&user, environment_id).await?;

        let email = invitee_email.trim().to_lowercase();
        if email.is_empty() {
            return Err(AppError::validation("Invitee email must not be empty"));
        }
        if email == user.email.to_lowercase() {
            return Ok(InviteOutcome::SelfShare);
        }

        let Some(profile) = self.profiles.find_by_email(&email).await? else {
            return Ok(InviteOutcome::UserNotFound);
        };

        if let Some(existing) = self.shares.find_outstanding(environment_id, &email).await? {
            return Ok(match existing.status {
                ShareStatus::Accepted => InviteOutcome::AlreadyShared,
                ShareStatus::Pending => InviteOutcome::InvitePending,
            });
        }

        let share = self
            .shares
            .create(&CreateShare {
                environment_id,
                invitee_email: email,
                status: ShareStatus::Pending,
            })
            .await?;

        // Best-effort: a missed notification must not undo the invite.
        let notification = CreateNotification {
            recipient_user_id: profile.id,
            message: format!(
                "{} invited you to \"{}\"",
                self.inviter_name(&user).await,
                environment.name
            ),
        };
        if let Err(e) = self.notifications.create(&notification).await {
            warn!(share_id = %share.id, error = %e, "failed to notify invitee");
        }

        info!(
            share_id = %share.id,
            environment_id = %environment_id,
            invitee = %share.invitee_email,
            "share invite created"
        );
        Ok(InviteOutcome::Invited(share))
    }

    /// Accept a pending invite. Invitee-only.
    pub async fn accept_share(&self, id: ShareId) -> AppResult<Share> {
        let user = require_user(self.identity.as_ref()).await?;
        let share = self.invitee_share(&user, id).await?;

        let accepted = self
            .shares
            .set_status(share.id, ShareStatus::Accepted)
            .await?
            .ok_or_else(|| AppError::not_found("Share no longer exists"))?;

        self.drop_pending(id).await;
        info!(share_id = %id, environment_id = %accepted.environment_id, "share accepted");
        Ok(accepted)
    }

    /// Decline a pending invite by deleting its row. Invitee-only.
    pub async fn decline_share(&self, id: ShareId) -> AppResult<()> {
        let user = require_user(self.identity.as_ref()).await?;
        let share = self.invitee_share(&user, id).await?;

        if !self.shares.delete(share.id).await? {
            return Err(AppError::not_found("Share no longer exists"));
        }
        self.drop_pending(id).await;
        info!(share_id = %id, environment_id = %share.environment_id, "share declined");
        Ok(())
    }

    /// Revoke a share in any status. Owner-only; the former invitee is
    /// not told, their view converges through the change feed.
    pub async fn revoke_share(&self, id: ShareId) -> AppResult<()> {
        let user = require_user(self.identity.as_ref()).await?;
        let share = self
            .shares
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Share not found"))?;
        self.owned_environment(&user, share.environment_id).await?;

        if !self.shares.delete(id).await? {
            return Err(AppError::not_found("Share no longer exists"));
        }
        info!(share_id = %id, environment_id = %share.environment_id, "share revoked");
        Ok(())
    }

    /// List every share on an environment, any status. Owner-only.
    pub async fn list_shares(&self, environment_id: EnvironmentId) -> AppResult<Vec<Share>> {
        let user = require_user(self.identity.as_ref()).await?;
        self.owned_environment(&user, environment_id).await?;
        self.shares.find_by_environment(environment_id).await
    }

    /// Reload and return the current user's pending invites.
    pub async fn list_pending_for_current_user(&self) -> AppResult<Vec<Share>> {
        let user = require_user(self.identity.as_ref()).await?;
        let pending = self.shares.find_pending_by_email(&user.email).await?;
        *self.pending.write().await = pending.clone();
        Ok(pending)
    }

    /// The pending invites as of the last reload, without touching the
    /// remote store.
    pub async fn pending_snapshot(&self) -> Vec<Share> {
        self.pending.read().await.clone()
    }

    /// Every environment the current user can see: the ones they own
    /// plus the ones shared with them and accepted, deduplicated.
    pub async fn list_accessible_environments(&self) -> AppResult<Vec<Environment>> {
        let user = require_user(self.identity.as_ref()).await?;

        let owned = self.environments.find_by_owner(user.id).await?;
        let accepted = self.shares.find_accepted_by_email(&user.email).await?;
        let shared_ids: Vec<EnvironmentId> =
            accepted.iter().map(|s| s.environment_id).collect();
        let shared = self.environments.find_by_ids(&shared_ids).await?;

        let mut seen: HashSet<EnvironmentId> = HashSet::new();
        let mut environments = Vec::with_capacity(owned.len() + shared.len());
        for env in owned.into_iter().chain(shared) {
            if seen.insert(env.id) {
                environments.push(env);
            }
        }
        Ok(environments)
    }

    async fn owned_environment(
        &self,
        user: &CurrentUser,
        environment_id: EnvironmentId,
    ) -> AppResult<Environment> {
        let environment = self
            .environments
            .find_by_id(environment_id)
            .await?
            .ok_or_else(|| AppError::not_found("Environment not found"))?;
        if environment.owner_id != user.id {
            return Err(AppError::authorization(
                "Only the environment owner may manage its shares",
            ));
        }
        Ok(environment)
    }

    async fn invitee_share(&self, user: &CurrentUser, id: ShareId) -> AppResult<Share> {
        let share = self
            .shares
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Share not found"))?;
        if !share.invitee_email.eq_ignore_ascii_case(&user.email) {
            return Err(AppError::authorization(
                "Only the invitee may answer this invite",
            ));
        }
        Ok(share)
    }

    async fn drop_pending(&self, id: ShareId) {
        self.pending.write().await.retain(|s| s.id != id);
    }

    /// Name the invite notification carries for the inviter, resolved the
    /// same way activity entries name their actor: profile full name,
    /// then the auth display name, then the email local part.
    async fn inviter_name(&self, user: &CurrentUser) -> String {
        match self.profiles.find_by_id(user.id).await {
            Ok(profile) => profile
                .and_then(|p| p.full_name)
                .unwrap_or_else(|| fallback_display_name(user)),
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "profile lookup failed");
                fallback_display_name(user)
            }
        }
    }
}
