//! Profile repository (read-only from the core's perspective).

use async_trait::async_trait;
use sqlx::PgPool;

use stashhub_core::result::AppResult;
use stashhub_core::types::UserId;
use stashhub_entity::profile::Profile;

use super::map_db_err;

/// Access to the `profiles` table.
#[async_trait]
pub trait ProfileRepository: Send + Sync + 'static {
    /// Find a profile by account ID.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<Profile>>;

    /// Find a profile by email, case-insensitively.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Profile>>;
}

/// PostgreSQL-backed profile repository.
#[derive(Debug, Clone)]
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    /// Create a new profile repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<Profile>> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err("Failed to find profile"))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Profile>> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE lower(email) = lower($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err("Failed to find profile by email"))
    }
}
