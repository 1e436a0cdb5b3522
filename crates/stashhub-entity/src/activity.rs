//! Activity log entry entity model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use stashhub_core::types::{ActivityEntryId, ContainerId, EnvironmentId, ItemId, UserId};

/// The mutation an activity entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "activity_event")]
pub enum ActivityEvent {
    /// A container was created.
    #[sqlx(rename = "container.create")]
    #[serde(rename = "container.create")]
    ContainerCreate,
    /// A container was deleted.
    #[sqlx(rename = "container.delete")]
    #[serde(rename = "container.delete")]
    ContainerDelete,
    /// An item was created.
    #[sqlx(rename = "item.create")]
    #[serde(rename = "item.create")]
    ItemCreate,
    /// An item was updated.
    #[sqlx(rename = "item.update")]
    #[serde(rename = "item.update")]
    ItemUpdate,
    /// An item was deleted.
    #[sqlx(rename = "item.delete")]
    #[serde(rename = "item.delete")]
    ItemDelete,
}

impl ActivityEvent {
    /// The event name as stored and displayed.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ContainerCreate => "container.create",
            Self::ContainerDelete => "container.delete",
            Self::ItemCreate => "item.create",
            Self::ItemUpdate => "item.update",
            Self::ItemDelete => "item.delete",
        }
    }
}

impl fmt::Display for ActivityEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable activity log entry recording one successful mutation.
///
/// Entries are append-only: the core never updates or deletes them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActivityEntry {
    /// Unique entry identifier.
    pub id: ActivityEntryId,
    /// The environment the mutation happened in.
    pub environment_id: EnvironmentId,
    /// The container involved, if any.
    pub container_id: Option<ContainerId>,
    /// The item involved, if any.
    pub item_id: Option<ItemId>,
    /// The user who performed the mutation.
    pub actor_id: UserId,
    /// Display name resolved at write time, so history stays readable
    /// even if the profile later changes.
    pub actor_display_name: String,
    /// The mutation recorded.
    pub event: ActivityEvent,
    /// Structured details (names, before/after values).
    pub metadata: serde_json::Value,
    /// When the mutation occurred.
    pub created_at: DateTime<Utc>,
}

/// Data required to append a new activity entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateActivityEntry {
    /// The environment the mutation happened in.
    pub environment_id: EnvironmentId,
    /// The container involved, if any.
    pub container_id: Option<ContainerId>,
    /// The item involved, if any.
    pub item_id: Option<ItemId>,
    /// The acting user.
    pub actor_id: UserId,
    /// Resolved display name of the actor.
    pub actor_display_name: String,
    /// The mutation recorded.
    pub event: ActivityEvent,
    /// Structured details.
    pub metadata: serde_json::Value,
}
