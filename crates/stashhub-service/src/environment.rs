//! Environment lifecycle service.

use std::sync::Arc;

use tracing::info;

use stashhub_core::AppError;
use stashhub_core::result::AppResult;
use stashhub_core::traits::identity::IdentityProvider;
use stashhub_core::types::EnvironmentId;
use stashhub_database::repositories::{ContainerRepository, EnvironmentRepository};
use stashhub_entity::environment::{CreateEnvironment, Environment};

use crate::session::require_user;

/// Manages the environments a user owns.
pub struct EnvironmentService {
    environments: Arc<dyn EnvironmentRepository>,
    containers: Arc<dyn ContainerRepository>,
    identity: Arc<dyn IdentityProvider>,
}

impl EnvironmentService {
    /// Create a new environment service.
    pub fn new(
        environments: Arc<dyn EnvironmentRepository>,
        containers: Arc<dyn ContainerRepository>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            environments,
            containers,
            identity,
        }
    }

    /// Create an environment owned by the current user.
    pub async fn create_environment(&self, name: &str) -> AppResult<Environment> {
        let user = require_user(self.identity.as_ref()).await?;
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Environment name must not be empty"));
        }

        let environment = self
            .environments
            .create(&CreateEnvironment {
                name: name.to_string(),
                owner_id: user.id,
            })
            .await?;

        info!(environment_id = %environment.id, "environment created");
        Ok(environment)
    }

    /// List the environments the current user owns.
    pub async fn list_owned(&self) -> AppResult<Vec<Environment>> {
        let user = require_user(self.identity.as_ref()).await?;
        self.environments.find_by_owner(user.id).await
    }

    /// Delete an environment. Owner-only, and refused with `Constraint`
    /// while the environment still holds containers; nothing is cascaded.
    pub async fn delete_environment(&self, id: EnvironmentId) -> AppResult<()> {
        let user = require_user(self.identity.as_ref()).await?;
        let environment = self
            .environments
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Environment not found"))?;
        if environment.owner_id != user.id {
            return Err(AppError::authorization(
                "Only the owner may delete an environment",
            ));
        }

        let containers = self.containers.count_by_environment(id).await?;
        if containers > 0 {
            return Err(AppError::constraint(format!(
                "Environment still holds {containers} container(s)"
            )));
        }

        if !self.environments.delete(id).await? {
            return Err(AppError::not_found("Environment no longer exists"));
        }
        info!(environment_id = %id, "environment deleted");
        Ok(())
    }
}
