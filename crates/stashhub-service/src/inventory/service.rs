//! Container and item mutations, loads, and the cache discipline.
//!
//! Every mutation is remote-first: the remote store confirms the write,
//! then the cache is updated, then the activity entry is appended. A
//! remote failure therefore leaves the cache exactly as it was.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};

use stashhub_core::AppError;
use stashhub_core::result::AppResult;
use stashhub_core::traits::identity::IdentityProvider;
use stashhub_core::types::{ContainerId, EnvironmentId};
use stashhub_database::repositories::{
    ContainerRepository, EnvironmentRepository, ItemRepository,
};
use stashhub_entity::activity::ActivityEvent;
use stashhub_entity::container::{Container, CreateContainer};
use stashhub_entity::item::{CreateItem, Item};

use crate::activity::ActivityLogger;
use crate::session::require_user;
use crate::share::ShareService;

use super::cache::{CachedContainer, InventoryCache};

/// Caller-supplied fields for a new item.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct NewItem {
    /// Item name, unique within the container.
    pub name: String,
    /// Free-form quantity, stored as given.
    pub quantity: String,
}

/// Caller-supplied fields for an item update.
///
/// The row is addressed by its name before the update, so a rename
/// carries both names.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UpdateItem {
    /// The item's current name.
    pub original_name: String,
    /// The name after the update.
    pub name: String,
    /// The quantity after the update.
    pub quantity: String,
}

/// Orchestrates container and item operations against the remote store
/// and the shared [`InventoryCache`].
pub struct InventoryService {
    containers: Arc<dyn ContainerRepository>,
    items: Arc<dyn ItemRepository>,
    environments: Arc<dyn EnvironmentRepository>,
    identity: Arc<dyn IdentityProvider>,
    shares: Arc<ShareService>,
    cache: Arc<InventoryCache>,
    activity: Arc<ActivityLogger>,
}

impl InventoryService {
    /// Create a new inventory service.
    pub fn new(
        containers: Arc<dyn ContainerRepository>,
        items: Arc<dyn ItemRepository>,
        environments: Arc<dyn EnvironmentRepository>,
        identity: Arc<dyn IdentityProvider>,
        shares: Arc<ShareService>,
        cache: Arc<InventoryCache>,
        activity: Arc<ActivityLogger>,
    ) -> Self {
        Self {
            containers,
            items,
            environments,
            identity,
            shares,
            cache,
            activity,
        }
    }

    /// The shared cache this service maintains.
    pub fn cache(&self) -> &Arc<InventoryCache> {
        &self.cache
    }

    /// Reload one environment's containers and items from the remote
    /// store, replacing that environment's slice of the cache.
    pub async fn load_for_environment(
        &self,
        environment_id: EnvironmentId,
    ) -> AppResult<Vec<CachedContainer>> {
        let containers = self.containers.find_by_environment(environment_id).await?;
        let entries = self.attach_items(containers).await?;
        self.cache
            .replace_environments(&[environment_id], entries.clone())
            .await;
        debug!(environment_id = %environment_id, containers = entries.len(), "inventory reloaded");
        Ok(entries)
    }

    /// Reload every environment visible to the current user (owned plus
    /// accepted shares), replacing the whole cache.
    pub async fn load_all(&self) -> AppResult<Vec<CachedContainer>> {
        let environments = self.shares.list_accessible_environments().await?;
        let ids: Vec<EnvironmentId> = environments.iter().map(|e| e.id).collect();
        let containers = self.containers.find_by_environments(&ids).await?;
        let entries = self.attach_items(containers).await?;
        self.cache.replace_all(entries.clone()).await;
        debug!(environments = ids.len(), containers = entries.len(), "inventory reloaded");
        Ok(entries)
    }

    /// Create a container.
    ///
    /// Returns `Ok(None)` without touching anything when a container of
    /// that name (case-insensitively) already exists for this owner in
    /// this environment. The check and the insert are separate steps;
    /// a racing create slips through the check and is rejected by the
    /// unique index as a `Duplicate` error instead.
    pub async fn create_container(
        &self,
        environment_id: EnvironmentId,
        name: &str,
    ) -> AppResult<Option<Container>> {
        let user = require_user(self.identity.as_ref()).await?;
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Container name must not be empty"));
        }

        if self
            .containers
            .find_by_name(user.id, environment_id, name)
            .await?
            .is_some()
        {
            debug!(environment_id = %environment_id, name, "container already exists");
            return Ok(None);
        }

        let container = self
            .containers
            .create(&CreateContainer {
                environment_id,
                owner_id: user.id,
                name: name.to_string(),
            })
            .await?;

        self.cache.insert_container(container.clone()).await;
        self.activity
            .record(
                &user,
                ActivityEvent::ContainerCreate,
                environment_id,
                Some(container.id),
                None,
                json!({
                    "container_name": container.name,
                    "environment_name": self.environment_name(environment_id).await,
                }),
            )
            .await;

        info!(container_id = %container.id, environment_id = %environment_id, "container created");
        Ok(Some(container))
    }

    /// Delete a container and everything in it.
    ///
    /// Two remote steps with no transaction around them: the items are
    /// deleted first, then the container row. A failure in between
    /// leaves an empty container behind, which a retry cleans up.
    pub async fn delete_container(
        &self,
        container_id: ContainerId,
        environment_id: EnvironmentId,
    ) -> AppResult<()> {
        let user = require_user(self.identity.as_ref()).await?;
        let entry = self
            .cache
            .get(container_id)
            .await
            .filter(|c| c.container.environment_id == environment_id)
            .ok_or_else(|| AppError::not_found("Container not found"))?;

        let removed_items = self.items.delete_by_container(container_id).await?;
        if !self.containers.delete(container_id).await? {
            return Err(AppError::not_found("Container no longer exists"));
        }

        self.cache.remove_container(container_id).await;
        self.activity
            .record(
                &user,
                ActivityEvent::ContainerDelete,
                environment_id,
                Some(container_id),
                None,
                json!({
                    "container_name": entry.container.name,
                    "item_count": removed_items,
                }),
            )
            .await;

        info!(
            container_id = %container_id,
            environment_id = %environment_id,
            removed_items,
            "container deleted"
        );
        Ok(())
    }

    /// Create an item in a container.
    ///
    /// Returns `Ok(None)` when the container already holds an item of
    /// that name; same check-then-insert shape as
    /// [`create_container`](Self::create_container).
    pub async fn create_item(
        &self,
        container_id: ContainerId,
        new_item: NewItem,
    ) -> AppResult<Option<Item>> {
        let user = require_user(self.identity.as_ref()).await?;
        let entry = self.cached_container(container_id).await?;
        let name = new_item.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Item name must not be empty"));
        }

        if self.items.find_by_name(container_id, name).await?.is_some() {
            debug!(container_id = %container_id, name, "item already exists");
            return Ok(None);
        }

        let item = self
            .items
            .create(&CreateItem {
                container_id,
                name: name.to_string(),
                quantity: new_item.quantity,
            })
            .await?;

        self.cache.push_item(container_id, item.clone()).await;
        let environment_id = entry.container.environment_id;
        self.activity
            .record(
                &user,
                ActivityEvent::ItemCreate,
                environment_id,
                Some(container_id),
                Some(item.id),
                json!({
                    "item_name": item.name,
                    "quantity": item.quantity,
                    "container_name": entry.container.name,
                    "environment_name": self.environment_name(environment_id).await,
                }),
            )
            .await;

        info!(item_id = %item.id, container_id = %container_id, "item created");
        Ok(Some(item))
    }

    /// Update an item's name and quantity, addressed by its current name.
    ///
    /// Returns `Ok(None)` when no such row exists remotely any more (for
    /// example it was deleted by another member since the last reload).
    pub async fn update_item(
        &self,
        container_id: ContainerId,
        update: UpdateItem,
    ) -> AppResult<Option<Item>> {
        let user = require_user(self.identity.as_ref()).await?;
        let entry = self.cached_container(container_id).await?;
        let name = update.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Item name must not be empty"));
        }

        let Some(prior) = self
            .items
            .find_by_name(container_id, &update.original_name)
            .await?
        else {
            debug!(container_id = %container_id, name = %update.original_name, "item row gone");
            return Ok(None);
        };

        let Some(updated) = self
            .items
            .update(prior.id, name, &update.quantity)
            .await?
        else {
            return Ok(None);
        };

        self.cache.replace_item(container_id, updated.clone()).await;
        self.activity
            .record(
                &user,
                ActivityEvent::ItemUpdate,
                entry.container.environment_id,
                Some(container_id),
                Some(updated.id),
                json!({
                    "item_name": updated.name,
                    "previous_name": prior.name,
                    "quantity": updated.quantity,
                    "previous_quantity": prior.quantity,
                    "container_name": entry.container.name,
                }),
            )
            .await;

        info!(item_id = %updated.id, container_id = %container_id, "item updated");
        Ok(Some(updated))
    }

    /// Delete an item, addressed by name.
    pub async fn delete_item(&self, container_id: ContainerId, item_name: &str) -> AppResult<()> {
        let user = require_user(self.identity.as_ref()).await?;
        let entry = self.cached_container(container_id).await?;

        let item = self
            .items
            .find_by_name(container_id, item_name)
            .await?
            .ok_or_else(|| AppError::not_found("Item not found"))?;
        if !self.items.delete(item.id).await? {
            return Err(AppError::not_found("Item no longer exists"));
        }

        self.cache.remove_item(container_id, item.id).await;
        self.activity
            .record(
                &user,
                ActivityEvent::ItemDelete,
                entry.container.environment_id,
                Some(container_id),
                Some(item.id),
                json!({
                    "item_name": item.name,
                    "quantity": item.quantity,
                    "container_name": entry.container.name,
                }),
            )
            .await;

        info!(item_id = %item.id, container_id = %container_id, "item deleted");
        Ok(())
    }

    async fn cached_container(&self, container_id: ContainerId) -> AppResult<CachedContainer> {
        self.cache
            .get(container_id)
            .await
            .ok_or_else(|| AppError::not_found("Container not found"))
    }

    async fn attach_items(&self, containers: Vec<Container>) -> AppResult<Vec<CachedContainer>> {
        let mut entries = Vec::with_capacity(containers.len());
        for container in containers {
            let items = self.items.find_by_container(container.id).await?;
            entries.push(CachedContainer::new(container, items));
        }
        Ok(entries)
    }

    /// Metadata enrichment only; a failed lookup degrades to null.
    async fn environment_name(&self, environment_id: EnvironmentId) -> Option<String> {
        self.environments
            .find_by_id(environment_id)
            .await
            .ok()
            .flatten()
            .map(|e| e.name)
    }
}
