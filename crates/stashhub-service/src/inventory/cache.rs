//! Read-through mirror of the containers and items visible to the session.
//!
//! The cache is only mutated after the remote store has confirmed the
//! corresponding write, never speculatively. On any remote failure the
//! cache keeps its previous contents, so consumers always see a state the
//! remote store held at some point.

use std::collections::HashMap;

use tokio::sync::RwLock;

use stashhub_core::types::{ContainerId, EnvironmentId, ItemId};
use stashhub_entity::container::Container;
use stashhub_entity::item::Item;

/// A container together with the items it holds.
#[derive(Debug, Clone)]
pub struct CachedContainer {
    /// The container row.
    pub container: Container,
    /// Items in the container, oldest first.
    pub items: Vec<Item>,
}

impl CachedContainer {
    /// Wrap a container with its items.
    pub fn new(container: Container, items: Vec<Item>) -> Self {
        Self { container, items }
    }

    /// Find an item by name, case-insensitively.
    pub fn item_by_name(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.name.eq_ignore_ascii_case(name))
    }
}

/// Shared in-memory mirror of the visible inventory.
#[derive(Debug, Default)]
pub struct InventoryCache {
    containers: RwLock<HashMap<ContainerId, CachedContainer>>,
}

impl InventoryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up one cached container.
    pub async fn get(&self, id: ContainerId) -> Option<CachedContainer> {
        self.containers.read().await.get(&id).cloned()
    }

    /// Replace the cached state for a set of environments.
    ///
    /// Entries for other environments are left untouched, so concurrent
    /// scoped reloads do not clobber each other.
    pub async fn replace_environments(
        &self,
        environment_ids: &[EnvironmentId],
        entries: Vec<CachedContainer>,
    ) {
        let mut containers = self.containers.write().await;
        containers.retain(|_, c| !environment_ids.contains(&c.container.environment_id));
        for entry in entries {
            containers.insert(entry.container.id, entry);
        }
    }

    /// Replace the entire cached state.
    pub async fn replace_all(&self, entries: Vec<CachedContainer>) {
        let mut containers = self.containers.write().await;
        containers.clear();
        for entry in entries {
            containers.insert(entry.container.id, entry);
        }
    }

    /// Record a confirmed container creation.
    pub async fn insert_container(&self, container: Container) {
        self.containers
            .write()
            .await
            .insert(container.id, CachedContainer::new(container, Vec::new()));
    }

    /// Record a confirmed container deletion.
    pub async fn remove_container(&self, id: ContainerId) {
        self.containers.write().await.remove(&id);
    }

    /// Record a confirmed item creation.
    pub async fn push_item(&self, container_id: ContainerId, item: Item) {
        if let Some(entry) = self.containers.write().await.get_mut(&container_id) {
            entry.items.push(item);
        }
    }

    /// Record a confirmed item update, matched by item ID.
    pub async fn replace_item(&self, container_id: ContainerId, item: Item) {
        if let Some(entry) = self.containers.write().await.get_mut(&container_id)
            && let Some(slot) = entry.items.iter_mut().find(|i| i.id == item.id)
        {
            *slot = item;
        }
    }

    /// Record a confirmed item deletion.
    pub async fn remove_item(&self, container_id: ContainerId, item_id: ItemId) {
        if let Some(entry) = self.containers.write().await.get_mut(&container_id) {
            entry.items.retain(|i| i.id != item_id);
        }
    }

    /// Snapshot one environment's containers, sorted by name.
    pub async fn snapshot_environment(
        &self,
        environment_id: EnvironmentId,
    ) -> Vec<CachedContainer> {
        let containers = self.containers.read().await;
        let mut entries: Vec<CachedContainer> = containers
            .values()
            .filter(|c| c.container.environment_id == environment_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.container.name.cmp(&b.container.name));
        entries
    }

    /// Snapshot every cached container, sorted by name.
    pub async fn snapshot_all(&self) -> Vec<CachedContainer> {
        let containers = self.containers.read().await;
        let mut entries: Vec<CachedContainer> = containers.values().cloned().collect();
        entries.sort_by(|a, b| a.container.name.cmp(&b.container.name));
        entries
    }

    /// Number of cached containers.
    pub async fn len(&self) -> usize {
        self.containers.read().await.len()
    }

    /// Whether the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.containers.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use stashhub_core::types::UserId;

    fn container(env: EnvironmentId, name: &str) -> Container {
        Container {
            id: ContainerId::new(),
            environment_id: env,
            owner_id: UserId::new(),
            name: name.to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_replace_environments_is_scoped() {
        let cache = InventoryCache::new();
        let garage = EnvironmentId::new();
        let office = EnvironmentId::new();
        cache.insert_container(container(garage, "Shelf A")).await;
        cache.insert_container(container(office, "Desk")).await;

        let fresh = container(garage, "Shelf B");
        cache
            .replace_environments(&[garage], vec![CachedContainer::new(fresh, Vec::new())])
            .await;

        assert_eq!(cache.snapshot_environment(garage).await.len(), 1);
        assert_eq!(
            cache.snapshot_environment(garage).await[0].container.name,
            "Shelf B"
        );
        assert_eq!(cache.snapshot_environment(office).await.len(), 1);
    }

    #[tokio::test]
    async fn test_item_lifecycle() {
        let cache = InventoryCache::new();
        let shelf = container(EnvironmentId::new(), "Shelf A");
        let shelf_id = shelf.id;
        cache.insert_container(shelf).await;

        let item = Item {
            id: ItemId::new(),
            container_id: shelf_id,
            name: "Drill".to_string(),
            quantity: "1".to_string(),
            created_at: Utc::now(),
        };
        cache.push_item(shelf_id, item.clone()).await;
        assert!(cache.get(shelf_id).await.unwrap().item_by_name("drill").is_some());

        let renamed = Item {
            name: "Impact Drill".to_string(),
            ..item.clone()
        };
        cache.replace_item(shelf_id, renamed).await;
        let entry = cache.get(shelf_id).await.unwrap();
        assert!(entry.item_by_name("Drill").is_none());
        assert!(entry.item_by_name("impact drill").is_some());

        cache.remove_item(shelf_id, item.id).await;
        assert!(cache.get(shelf_id).await.unwrap().items.is_empty());
    }
}
