//! Item entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use stashhub_core::types::{ContainerId, ItemId};

/// A named, quantity-bearing entry within a container.
///
/// Item names are unique within their container (case-insensitive). The
/// quantity is an opaque string passed through unmodified; the core
/// performs no arithmetic on it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Item {
    /// Unique item identifier.
    pub id: ItemId,
    /// The container this item belongs to.
    pub container_id: ContainerId,
    /// Item name.
    pub name: String,
    /// Opaque quantity, stored as entered.
    pub quantity: String,
    /// When the item was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItem {
    /// The container this item belongs to.
    pub container_id: ContainerId,
    /// Item name.
    pub name: String,
    /// Opaque quantity.
    pub quantity: String,
}
