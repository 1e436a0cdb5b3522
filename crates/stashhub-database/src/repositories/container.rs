//! Container repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use stashhub_core::result::AppResult;
use stashhub_core::types::{ContainerId, EnvironmentId, UserId};
use stashhub_entity::container::{Container, CreateContainer};

use super::map_db_err;

/// Access to the `containers` table.
#[async_trait]
pub trait ContainerRepository: Send + Sync + 'static {
    /// Find a container by ID.
    async fn find_by_id(&self, id: ContainerId) -> AppResult<Option<Container>>;

    /// List containers within one environment.
    async fn find_by_environment(&self, environment_id: EnvironmentId)
    -> AppResult<Vec<Container>>;

    /// List containers across a set of environments.
    async fn find_by_environments(&self, ids: &[EnvironmentId]) -> AppResult<Vec<Container>>;

    /// Duplicate-guard lookup: container with this name (case-insensitive)
    /// within (owner, environment). Not atomic with a following insert;
    /// the unique index is the backstop.
    async fn find_by_name(
        &self,
        owner_id: UserId,
        environment_id: EnvironmentId,
        name: &str,
    ) -> AppResult<Option<Container>>;

    /// Count containers within an environment.
    async fn count_by_environment(&self, environment_id: EnvironmentId) -> AppResult<u64>;

    /// Create a new container and return it.
    async fn create(&self, container: &CreateContainer) -> AppResult<Container>;

    /// Delete a container by ID. Returns `true` if a row was deleted.
    async fn delete(&self, id: ContainerId) -> AppResult<bool>;
}

/// PostgreSQL-backed container repository.
#[derive(Debug, Clone)]
pub struct PgContainerRepository {
    pool: PgPool,
}

impl PgContainerRepository {
    /// Create a new container repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContainerRepository for PgContainerRepository {
    async fn find_by_id(&self, id: ContainerId) -> AppResult<Option<Container>> {
        sqlx::query_as::<_, Container>("SELECT * FROM containers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err("Failed to find container"))
    }

    async fn find_by_environment(
        &self,
        environment_id: EnvironmentId,
    ) -> AppResult<Vec<Container>> {
        sqlx::query_as::<_, Container>(
            "SELECT * FROM containers WHERE environment_id = $1 ORDER BY name",
        )
        .bind(environment_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err("Failed to list containers"))
    }

    async fn find_by_environments(&self, ids: &[EnvironmentId]) -> AppResult<Vec<Container>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<Uuid> = ids.iter().map(|id| id.0).collect();
        sqlx::query_as::<_, Container>(
            "SELECT * FROM containers WHERE environment_id = ANY($1) ORDER BY name",
        )
        .bind(&raw)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err("Failed to list containers by environments"))
    }

    async fn find_by_name(
        &self,
        owner_id: UserId,
        environment_id: EnvironmentId,
        name: &str,
    ) -> AppResult<Option<Container>> {
        sqlx::query_as::<_, Container>(
            "SELECT * FROM containers \
             WHERE owner_id = $1 AND environment_id = $2 AND lower(name) = lower($3)",
        )
        .bind(owner_id)
        .bind(environment_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err("Failed to look up container by name"))
    }

    async fn count_by_environment(&self, environment_id: EnvironmentId) -> AppResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM containers WHERE environment_id = $1")
                .bind(environment_id)
                .fetch_one(&self.pool)
                .await
                .map_err(map_db_err("Failed to count containers"))?;
        Ok(count as u64)
    }

    async fn create(&self, container: &CreateContainer) -> AppResult<Container> {
        sqlx::query_as::<_, Container>(
            "INSERT INTO containers (id, environment_id, owner_id, name, created_at) \
             VALUES ($1, $2, $3, $4, NOW()) RETURNING *",
        )
        .bind(ContainerId::new())
        .bind(container.environment_id)
        .bind(container.owner_id)
        .bind(&container.name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err("Failed to create container"))
    }

    async fn delete(&self, id: ContainerId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM containers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err("Failed to delete container"))?;
        Ok(result.rows_affected() > 0)
    }
}
