//! Environment entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use stashhub_core::types::{EnvironmentId, UserId};

/// A named, shareable workspace owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Environment {
    /// Unique environment identifier.
    pub id: EnvironmentId,
    /// Environment name.
    pub name: String,
    /// The owning user.
    pub owner_id: UserId,
    /// When the environment was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEnvironment {
    /// Environment name.
    pub name: String,
    /// The owning user.
    pub owner_id: UserId,
}
