//! Item repository.

use async_trait::async_trait;
use sqlx::PgPool;

use stashhub_core::result::AppResult;
use stashhub_core::types::{ContainerId, ItemId};
use stashhub_entity::item::{CreateItem, Item};

use super::map_db_err;

/// Access to the `items` table.
#[async_trait]
pub trait ItemRepository: Send + Sync + 'static {
    /// List items within a container.
    async fn find_by_container(&self, container_id: ContainerId) -> AppResult<Vec<Item>>;

    /// Duplicate-guard lookup: item with this name (case-insensitive)
    /// within a container.
    async fn find_by_name(&self, container_id: ContainerId, name: &str)
    -> AppResult<Option<Item>>;

    /// Create a new item and return it.
    async fn create(&self, item: &CreateItem) -> AppResult<Item>;

    /// Update an item's name and quantity. Returns the updated row, or
    /// `None` if the item no longer exists.
    async fn update(&self, id: ItemId, name: &str, quantity: &str) -> AppResult<Option<Item>>;

    /// Delete an item by ID. Returns `true` if a row was deleted.
    async fn delete(&self, id: ItemId) -> AppResult<bool>;

    /// Delete every item in a container. Returns the number of rows deleted.
    async fn delete_by_container(&self, container_id: ContainerId) -> AppResult<u64>;
}

/// PostgreSQL-backed item repository.
#[derive(Debug, Clone)]
pub struct PgItemRepository {
    pool: PgPool,
}

impl PgItemRepository {
    /// Create a new item repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemRepository for PgItemRepository {
    async fn find_by_container(&self, container_id: ContainerId) -> AppResult<Vec<Item>> {
        sqlx::query_as::<_, Item>("SELECT * FROM items WHERE container_id = $1 ORDER BY created_at")
            .bind(container_id)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_err("Failed to list items"))
    }

    async fn find_by_name(
        &self,
        container_id: ContainerId,
        name: &str,
    ) -> AppResult<Option<Item>> {
        sqlx::query_as::<_, Item>(
            "SELECT * FROM items WHERE container_id = $1 AND lower(name) = lower($2)",
        )
        .bind(container_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err("Failed to look up item by name"))
    }

    async fn create(&self, item: &CreateItem) -> AppResult<Item> {
        sqlx::query_as::<_, Item>(
            "INSERT INTO items (id, container_id, name, quantity, created_at) \
             VALUES ($1, $2, $3, $4, NOW()) RETURNING *",
        )
        .bind(ItemId::new())
        .bind(item.container_id)
        .bind(&item.name)
        .bind(&item.quantity)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err("Failed to create item"))
    }

    async fn update(&self, id: ItemId, name: &str, quantity: &str) -> AppResult<Option<Item>> {
        sqlx::query_as::<_, Item>(
            "UPDATE items SET name = $2, quantity = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .bind(quantity)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err("Failed to update item"))
    }

    async fn delete(&self, id: ItemId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err("Failed to delete item"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_container(&self, container_id: ContainerId) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM items WHERE container_id = $1")
            .bind(container_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err("Failed to delete items for container"))?;
        Ok(result.rows_affected())
    }
}
