//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use stashhub_core::types::{NotificationId, UserId};

/// A message delivered to one user, e.g. a share invitation notice.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// The user this notification is addressed to.
    pub recipient_user_id: UserId,
    /// Human-readable message body.
    pub message: String,
    /// Whether the recipient has marked it read.
    pub read: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNotification {
    /// The recipient.
    pub recipient_user_id: UserId,
    /// Message body.
    pub message: String,
}
