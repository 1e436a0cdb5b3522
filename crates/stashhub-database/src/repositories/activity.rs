//! Activity log repository.

use async_trait::async_trait;
use sqlx::PgPool;

use stashhub_core::result::AppResult;
use stashhub_core::types::pagination::{PageRequest, PageResponse};
use stashhub_core::types::{ActivityEntryId, EnvironmentId};
use stashhub_entity::activity::{ActivityEntry, CreateActivityEntry};

use super::map_db_err;

/// Access to the append-only `activity_log` table.
///
/// There is deliberately no update or delete operation.
#[async_trait]
pub trait ActivityLogRepository: Send + Sync + 'static {
    /// Append one entry and return it.
    async fn append(&self, entry: &CreateActivityEntry) -> AppResult<ActivityEntry>;

    /// List entries for one environment, most recent first.
    async fn find_by_environment(
        &self,
        environment_id: EnvironmentId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ActivityEntry>>;
}

/// PostgreSQL-backed activity log repository.
#[derive(Debug, Clone)]
pub struct PgActivityLogRepository {
    pool: PgPool,
}

impl PgActivityLogRepository {
    /// Create a new activity log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityLogRepository for PgActivityLogRepository {
    async fn append(&self, entry: &CreateActivityEntry) -> AppResult<ActivityEntry> {
        sqlx::query_as::<_, ActivityEntry>(
            "INSERT INTO activity_log \
             (id, environment_id, container_id, item_id, actor_id, actor_display_name, \
              event, metadata, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW()) RETURNING *",
        )
        .bind(ActivityEntryId::new())
        .bind(entry.environment_id)
        .bind(entry.container_id)
        .bind(entry.item_id)
        .bind(entry.actor_id)
        .bind(&entry.actor_display_name)
        .bind(entry.event)
        .bind(&entry.metadata)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err("Failed to append activity entry"))
    }

    async fn find_by_environment(
        &self,
        environment_id: EnvironmentId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ActivityEntry>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM activity_log WHERE environment_id = $1")
                .bind(environment_id)
                .fetch_one(&self.pool)
                .await
                .map_err(map_db_err("Failed to count activity entries"))?;

        let entries = sqlx::query_as::<_, ActivityEntry>(
            "SELECT * FROM activity_log WHERE environment_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(environment_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err("Failed to list activity entries"))?;

        Ok(PageResponse::new(
            entries,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
