//! Container entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use stashhub_core::types::{ContainerId, EnvironmentId, UserId};

/// A named grouping of items within an environment.
///
/// Container names are unique within (owner, environment), compared
/// case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Container {
    /// Unique container identifier.
    pub id: ContainerId,
    /// The environment this container belongs to.
    pub environment_id: EnvironmentId,
    /// The user who created the container.
    pub owner_id: UserId,
    /// Container name.
    pub name: String,
    /// When the container was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateContainer {
    /// The environment this container belongs to.
    pub environment_id: EnvironmentId,
    /// The creating user.
    pub owner_id: UserId,
    /// Container name.
    pub name: String,
}
