//! Environment repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use stashhub_core::result::AppResult;
use stashhub_core::types::{EnvironmentId, UserId};
use stashhub_entity::environment::{CreateEnvironment, Environment};

use super::map_db_err;

/// Access to the `environments` table.
#[async_trait]
pub trait EnvironmentRepository: Send + Sync + 'static {
    /// Find an environment by ID.
    async fn find_by_id(&self, id: EnvironmentId) -> AppResult<Option<Environment>>;

    /// List environments owned by a user.
    async fn find_by_owner(&self, owner_id: UserId) -> AppResult<Vec<Environment>>;

    /// List environments by a set of IDs.
    async fn find_by_ids(&self, ids: &[EnvironmentId]) -> AppResult<Vec<Environment>>;

    /// Create a new environment and return it.
    async fn create(&self, env: &CreateEnvironment) -> AppResult<Environment>;

    /// Delete an environment by ID. Returns `true` if a row was deleted.
    async fn delete(&self, id: EnvironmentId) -> AppResult<bool>;
}

/// PostgreSQL-backed environment repository.
#[derive(Debug, Clone)]
pub struct PgEnvironmentRepository {
    pool: PgPool,
}

impl PgEnvironmentRepository {
    /// Create a new environment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EnvironmentRepository for PgEnvironmentRepository {
    async fn find_by_id(&self, id: EnvironmentId) -> AppResult<Option<Environment>> {
        sqlx::query_as::<_, Environment>("SELECT * FROM environments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err("Failed to find environment"))
    }

    async fn find_by_owner(&self, owner_id: UserId) -> AppResult<Vec<Environment>> {
        sqlx::query_as::<_, Environment>(
            "SELECT * FROM environments WHERE owner_id = $1 ORDER BY created_at",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err("Failed to list environments"))
    }

    async fn find_by_ids(&self, ids: &[EnvironmentId]) -> AppResult<Vec<Environment>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<Uuid> = ids.iter().map(|id| id.0).collect();
        sqlx::query_as::<_, Environment>(
            "SELECT * FROM environments WHERE id = ANY($1) ORDER BY created_at",
        )
        .bind(&raw)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err("Failed to list environments by ids"))
    }

    async fn create(&self, env: &CreateEnvironment) -> AppResult<Environment> {
        sqlx::query_as::<_, Environment>(
            "INSERT INTO environments (id, name, owner_id, created_at) \
             VALUES ($1, $2, $3, NOW()) RETURNING *",
        )
        .bind(EnvironmentId::new())
        .bind(&env.name)
        .bind(env.owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err("Failed to create environment"))
    }

    async fn delete(&self, id: EnvironmentId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM environments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err("Failed to delete environment"))?;
        Ok(result.rows_affected() > 0)
    }
}
