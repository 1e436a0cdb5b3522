//! Notification repository.

use async_trait::async_trait;
use sqlx::PgPool;

use stashhub_core::result::AppResult;
use stashhub_core::types::pagination::{PageRequest, PageResponse};
use stashhub_core::types::{NotificationId, UserId};
use stashhub_entity::notification::{CreateNotification, Notification};

use super::map_db_err;

/// Access to the `notifications` table.
#[async_trait]
pub trait NotificationRepository: Send + Sync + 'static {
    /// Create a new notification and return it.
    async fn create(&self, notification: &CreateNotification) -> AppResult<Notification>;

    /// List notifications for a recipient, most recent first.
    async fn find_by_recipient(
        &self,
        recipient: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>>;

    /// Mark a notification read. Scoped to the recipient so one user
    /// cannot touch another's notifications. Returns `true` on success.
    async fn mark_read(&self, id: NotificationId, recipient: UserId) -> AppResult<bool>;

    /// Delete a notification, scoped to the recipient.
    async fn delete(&self, id: NotificationId, recipient: UserId) -> AppResult<bool>;
}

/// PostgreSQL-backed notification repository.
#[derive(Debug, Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn create(&self, notification: &CreateNotification) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (id, recipient_user_id, message, read, created_at) \
             VALUES ($1, $2, $3, FALSE, NOW()) RETURNING *",
        )
        .bind(NotificationId::new())
        .bind(notification.recipient_user_id)
        .bind(&notification.message)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err("Failed to create notification"))
    }

    async fn find_by_recipient(
        &self,
        recipient: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE recipient_user_id = $1")
                .bind(recipient)
                .fetch_one(&self.pool)
                .await
                .map_err(map_db_err("Failed to count notifications"))?;

        let notifications = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE recipient_user_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(recipient)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err("Failed to list notifications"))?;

        Ok(PageResponse::new(
            notifications,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn mark_read(&self, id: NotificationId, recipient: UserId) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE WHERE id = $1 AND recipient_user_id = $2",
        )
        .bind(id)
        .bind(recipient)
        .execute(&self.pool)
        .await
        .map_err(map_db_err("Failed to mark notification read"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: NotificationId, recipient: UserId) -> AppResult<bool> {
        let result =
            sqlx::query("DELETE FROM notifications WHERE id = $1 AND recipient_user_id = $2")
                .bind(id)
                .bind(recipient)
                .execute(&self.pool)
                .await
                .map_err(map_db_err("Failed to delete notification"))?;
        Ok(result.rows_affected() > 0)
    }
}
