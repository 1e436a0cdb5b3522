//! Environment share repository.

use async_trait::async_trait;
use sqlx::PgPool;

use stashhub_core::result::AppResult;
use stashhub_core::types::{EnvironmentId, ShareId};
use stashhub_entity::share::{CreateShare, Share, ShareStatus};

use super::map_db_err;

/// Access to the `environment_shares` table.
#[async_trait]
pub trait ShareRepository: Send + Sync + 'static {
    /// Find a share by ID.
    async fn find_by_id(&self, id: ShareId) -> AppResult<Option<Share>>;

    /// List every share (any status) for one environment.
    async fn find_by_environment(&self, environment_id: EnvironmentId) -> AppResult<Vec<Share>>;

    /// Find the outstanding (pending or accepted) share for one
    /// (environment, invitee email) pair, if any.
    async fn find_outstanding(
        &self,
        environment_id: EnvironmentId,
        invitee_email: &str,
    ) -> AppResult<Option<Share>>;

    /// List pending invites addressed to an email.
    async fn find_pending_by_email(&self, invitee_email: &str) -> AppResult<Vec<Share>>;

    /// List accepted shares held by an email.
    async fn find_accepted_by_email(&self, invitee_email: &str) -> AppResult<Vec<Share>>;

    /// Create a new share invite and return it.
    async fn create(&self, share: &CreateShare) -> AppResult<Share>;

    /// Set the status of a share. Returns the updated row, or `None` if
    /// the share no longer exists.
    async fn set_status(&self, id: ShareId, status: ShareStatus) -> AppResult<Option<Share>>;

    /// Delete a share row. Returns `true` if a row was deleted.
    async fn delete(&self, id: ShareId) -> AppResult<bool>;
}

/// PostgreSQL-backed share repository.
#[derive(Debug, Clone)]
pub struct PgShareRepository {
    pool: PgPool,
}

impl PgShareRepository {
    /// Create a new share repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShareRepository for PgShareRepository {
    async fn find_by_id(&self, id: ShareId) -> AppResult<Option<Share>> {
        sqlx::query_as::<_, Share>("SELECT * FROM environment_shares WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err("Failed to find share"))
    }

    async fn find_by_environment(&self, environment_id: EnvironmentId) -> AppResult<Vec<Share>> {
        sqlx::query_as::<_, Share>(
            "SELECT * FROM environment_shares WHERE environment_id = $1 ORDER BY created_at",
        )
        .bind(environment_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err("Failed to list shares"))
    }

    async fn find_outstanding(
        &self,
        environment_id: EnvironmentId,
        invitee_email: &str,
    ) -> AppResult<Option<Share>> {
        sqlx::query_as::<_, Share>(
            "SELECT * FROM environment_shares \
             WHERE environment_id = $1 AND lower(invitee_email) = lower($2)",
        )
        .bind(environment_id)
        .bind(invitee_email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err("Failed to look up outstanding share"))
    }

    async fn find_pending_by_email(&self, invitee_email: &str) -> AppResult<Vec<Share>> {
        sqlx::query_as::<_, Share>(
            "SELECT * FROM environment_shares \
             WHERE lower(invitee_email) = lower($1) AND status = 'pending' \
             ORDER BY created_at",
        )
        .bind(invitee_email)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err("Failed to list pending invites"))
    }

    async fn find_accepted_by_email(&self, invitee_email: &str) -> AppResult<Vec<Share>> {
        sqlx::query_as::<_, Share>(
            "SELECT * FROM environment_shares \
             WHERE lower(invitee_email) = lower($1) AND status = 'accepted' \
             ORDER BY created_at",
        )
        .bind(invitee_email)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err("Failed to list accepted shares"))
    }

    async fn create(&self, share: &CreateShare) -> AppResult<Share> {
        sqlx::query_as::<_, Share>(
            "INSERT INTO environment_shares (id, environment_id, invitee_email, status, created_at) \
             VALUES ($1, $2, lower($3), $4, NOW()) RETURNING *",
        )
        .bind(ShareId::new())
        .bind(share.environment_id)
        .bind(&share.invitee_email)
        .bind(share.status)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err("Failed to create share"))
    }

    async fn set_status(&self, id: ShareId, status: ShareStatus) -> AppResult<Option<Share>> {
        sqlx::query_as::<_, Share>(
            "UPDATE environment_shares SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err("Failed to update share status"))
    }

    async fn delete(&self, id: ShareId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM environment_shares WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err("Failed to delete share"))?;
        Ok(result.rows_affected() > 0)
    }
}
