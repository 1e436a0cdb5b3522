//! User notification service.

use std::sync::Arc;

use tracing::info;

use stashhub_core::AppError;
use stashhub_core::result::AppResult;
use stashhub_core::traits::identity::IdentityProvider;
use stashhub_core::types::{NotificationId, UserId};
use stashhub_core::types::pagination::{PageRequest, PageResponse};
use stashhub_database::repositories::NotificationRepository;
use stashhub_entity::notification::{CreateNotification, Notification};

use crate::session::require_user;

/// Reads and maintains the current user's notifications.
pub struct NotificationService {
    notifications: Arc<dyn NotificationRepository>,
    identity: Arc<dyn IdentityProvider>,
}

impl NotificationService {
    /// Create a new notification service.
    pub fn new(
        notifications: Arc<dyn NotificationRepository>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            notifications,
            identity,
        }
    }

    /// List the current user's notifications, newest first.
    pub async fn list_for_current_user(
        &self,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let user = require_user(self.identity.as_ref()).await?;
        self.notifications.find_by_recipient(user.id, page).await
    }

    /// Mark one of the current user's notifications read.
    pub async fn mark_read(&self, id: NotificationId) -> AppResult<()> {
        let user = require_user(self.identity.as_ref()).await?;
        if !self.notifications.mark_read(id, user.id).await? {
            return Err(AppError::not_found("Notification not found"));
        }
        Ok(())
    }

    /// Delete one of the current user's notifications.
    pub async fn delete(&self, id: NotificationId) -> AppResult<()> {
        let user = require_user(self.identity.as_ref()).await?;
        if !self.notifications.delete(id, user.id).await? {
            return Err(AppError::not_found("Notification not found"));
        }
        Ok(())
    }

    /// Send a notification to any user.
    pub async fn notify(&self, recipient: UserId, message: &str) -> AppResult<Notification> {
        let notification = self
            .notifications
            .create(&CreateNotification {
                recipient_user_id: recipient,
                message: message.to_string(),
            })
            .await?;
        info!(notification_id = %notification.id, recipient = %recipient, "notification sent");
        Ok(notification)
    }
}
