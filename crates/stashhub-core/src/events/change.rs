//! Change-feed notification types.
//!
//! The remote store pushes one [`ChangeEvent`] per row mutation. Payloads
//! carry the raw old/new rows as loose JSON, the way a logical-decoding feed
//! delivers them; consumers never diff fields, since any event for a watched
//! table triggers a full scoped reload.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The remote tables a change feed can be scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreTable {
    /// The `environments` table.
    Environments,
    /// The `environment_shares` table.
    EnvironmentShares,
    /// The `containers` table.
    Containers,
    /// The `items` table.
    Items,
    /// The `activity_log` table.
    ActivityLog,
    /// The `profiles` table.
    Profiles,
    /// The `notifications` table.
    Notifications,
}

impl StoreTable {
    /// The remote table name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Environments => "environments",
            Self::EnvironmentShares => "environment_shares",
            Self::Containers => "containers",
            Self::Items => "items",
            Self::ActivityLog => "activity_log",
            Self::Profiles => "profiles",
            Self::Notifications => "notifications",
        }
    }
}

impl fmt::Display for StoreTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of row mutation a change notification describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// A row was inserted.
    Insert,
    /// A row was updated.
    Update,
    /// A row was deleted.
    Delete,
}

/// A single change notification from the remote store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// The table the change occurred on.
    pub table: StoreTable,
    /// The kind of mutation.
    pub kind: ChangeKind,
    /// The row before the change (updates and deletes).
    pub old: Option<serde_json::Value>,
    /// The row after the change (inserts and updates).
    pub new: Option<serde_json::Value>,
}

impl ChangeEvent {
    /// Create an insert notification.
    pub fn insert(table: StoreTable, new: serde_json::Value) -> Self {
        Self {
            table,
            kind: ChangeKind::Insert,
            old: None,
            new: Some(new),
        }
    }

    /// Create an update notification.
    pub fn update(table: StoreTable, old: serde_json::Value, new: serde_json::Value) -> Self {
        Self {
            table,
            kind: ChangeKind::Update,
            old: Some(old),
            new: Some(new),
        }
    }

    /// Create a delete notification.
    pub fn delete(table: StoreTable, old: serde_json::Value) -> Self {
        Self {
            table,
            kind: ChangeKind::Delete,
            old: Some(old),
            new: None,
        }
    }
}
