//! Environment share entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use stashhub_core::types::{EnvironmentId, ShareId};

/// Lifecycle state of a share invite.
///
/// `Pending → Accepted` is the only transition; decline by the invitee and
/// revoke by the owner both delete the row outright (no tombstone state).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "share_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ShareStatus {
    /// Invite sent, not yet answered.
    Pending,
    /// Invite accepted by the invitee.
    Accepted,
}

/// An invitation granting a non-owner access to an environment.
///
/// At most one outstanding (pending or accepted) share may exist per
/// (environment, invitee email) pair.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Share {
    /// Unique share identifier.
    pub id: ShareId,
    /// The environment being shared.
    pub environment_id: EnvironmentId,
    /// The invited account's email, stored lowercased.
    pub invitee_email: String,
    /// Current lifecycle state.
    pub status: ShareStatus,
    /// When the invite was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new share invite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShare {
    /// The environment being shared.
    pub environment_id: EnvironmentId,
    /// The invited account's email (lowercased by the caller).
    pub invitee_email: String,
    /// Initial state; always `Pending` for new invites.
    pub status: ShareStatus,
}
