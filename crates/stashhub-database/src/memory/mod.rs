//! In-memory backend implementing every repository trait.
//!
//! Used by tests and offline/demo wiring. Behavior mirrors the PostgreSQL
//! backend, including the case-insensitive unique indexes on container
//! names, item names, and outstanding shares: a violating insert fails
//! with `Duplicate`, exactly like a 23505 from Postgres.

use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::RwLock;

use async_trait::async_trait;

use stashhub_core::error::AppError;
use stashhub_core::result::AppResult;
use stashhub_core::types::pagination::{PageRequest, PageResponse};
use stashhub_core::types::{
    ActivityEntryId, ContainerId, EnvironmentId, ItemId, NotificationId, ShareId, UserId,
};
use stashhub_entity::activity::{ActivityEntry, CreateActivityEntry};
use stashhub_entity::container::{Container, CreateContainer};
use stashhub_entity::environment::{CreateEnvironment, Environment};
use stashhub_entity::item::{CreateItem, Item};
use stashhub_entity::notification::{CreateNotification, Notification};
use stashhub_entity::profile::Profile;
use stashhub_entity::share::{CreateShare, Share, ShareStatus};

use crate::repositories::{
    ActivityLogRepository, ContainerRepository, EnvironmentRepository, ItemRepository,
    NotificationRepository, ProfileRepository, ShareRepository,
};

#[derive(Debug, Default)]
struct Tables {
    environments: HashMap<EnvironmentId, Environment>,
    containers: HashMap<ContainerId, Container>,
    items: HashMap<ItemId, Item>,
    shares: HashMap<ShareId, Share>,
    activity: Vec<ActivityEntry>,
    profiles: HashMap<UserId, Profile>,
    notifications: Vec<Notification>,
}

/// In-memory relational store.
///
/// A single instance backs all repository traits, so cross-table state
/// (e.g. items under a deleted container) behaves like one database.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: RwLock<Tables>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a profile, as the registration flow would.
    pub async fn seed_profile(&self, profile: Profile) {
        let mut tables = self.tables.write().await;
        tables.profiles.insert(profile.id, profile);
    }

    /// Total number of stored activity entries, across environments.
    pub async fn activity_len(&self) -> usize {
        self.tables.read().await.activity.len()
    }
}

fn paginate<T: Clone + Serialize>(rows: Vec<T>, page: &PageRequest) -> PageResponse<T> {
    let total = rows.len() as u64;
    let items = rows
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    PageResponse::new(items, page.page, page.page_size, total)
}

#[async_trait]
impl EnvironmentRepository for MemoryBackend {
    async fn find_by_id(&self, id: EnvironmentId) -> AppResult<Option<Environment>> {
        Ok(self.tables.read().await.environments.get(&id).cloned())
    }

    async fn find_by_owner(&self, owner_id: UserId) -> AppResult<Vec<Environment>> {
        let tables = self.tables.read().await;
        let mut envs: Vec<Environment> = tables
            .environments
            .values()
            .filter(|e| e.owner_id == owner_id)
            .cloned()
            .collect();
        envs.sort_by_key(|e| e.created_at);
        Ok(envs)
    }

    async fn find_by_ids(&self, ids: &[EnvironmentId]) -> AppResult<Vec<Environment>> {
        let tables = self.tables.read().await;
        let mut envs: Vec<Environment> = ids
            .iter()
            .filter_map(|id| tables.environments.get(id).cloned())
            .collect();
        envs.sort_by_key(|e| e.created_at);
        Ok(envs)
    }

    async fn create(&self, env: &CreateEnvironment) -> AppResult<Environment> {
        let mut tables = self.tables.write().await;
        let environment = Environment {
            id: EnvironmentId::new(),
            name: env.name.clone(),
            owner_id: env.owner_id,
            created_at: Utc::now(),
        };
        tables.environments.insert(environment.id, environment.clone());
        Ok(environment)
    }

    async fn delete(&self, id: EnvironmentId) -> AppResult<bool> {
        Ok(self.tables.write().await.environments.remove(&id).is_some())
    }
}

#[async_trait]
impl ContainerRepository for MemoryBackend {
    async fn find_by_id(&self, id: ContainerId) -> AppResult<Option<Container>> {
        Ok(self.tables.read().await.containers.get(&id).cloned())
    }

    async fn find_by_environment(
        &self,
        environment_id: EnvironmentId,
    ) -> AppResult<Vec<Container>> {
        self.find_by_environments(&[environment_id]).await
    }

    async fn find_by_environments(&self, ids: &[EnvironmentId]) -> AppResult<Vec<Container>> {
        let tables = self.tables.read().await;
        let mut containers: Vec<Container> = tables
            .containers
            .values()
            .filter(|c| ids.contains(&c.environment_id))
            .cloned()
            .collect();
        containers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(containers)
    }

    async fn find_by_name(
        &self,
        owner_id: UserId,
        environment_id: EnvironmentId,
        name: &str,
    ) -> AppResult<Option<Container>> {
        let tables = self.tables.read().await;
        Ok(tables
            .containers
            .values()
            .find(|c| {
                c.owner_id == owner_id
                    && c.environment_id == environment_id
                    && c.name.eq_ignore_ascii_case(name)
            })
            .cloned())
    }

    async fn count_by_environment(&self, environment_id: EnvironmentId) -> AppResult<u64> {
        let tables = self.tables.read().await;
        Ok(tables
            .containers
            .values()
            .filter(|c| c.environment_id == environment_id)
            .count() as u64)
    }

    async fn create(&self, container: &CreateContainer) -> AppResult<Container> {
        let mut tables = self.tables.write().await;
        let collision = tables.containers.values().any(|c| {
            c.owner_id == container.owner_id
                && c.environment_id == container.environment_id
                && c.name.eq_ignore_ascii_case(&container.name)
        });
        if collision {
            return Err(AppError::duplicate("Failed to create container"));
        }
        let row = Container {
            id: ContainerId::new(),
            environment_id: container.environment_id,
            owner_id: container.owner_id,
            name: container.name.clone(),
            created_at: Utc::now(),
        };
        tables.containers.insert(row.id, row.clone());
        Ok(row)
    }

    async fn delete(&self, id: ContainerId) -> AppResult<bool> {
        Ok(self.tables.write().await.containers.remove(&id).is_some())
    }
}

#[async_trait]
impl ItemRepository for MemoryBackend {
    async fn find_by_container(&self, container_id: ContainerId) -> AppResult<Vec<Item>> {
        let tables = self.tables.read().await;
        let mut items: Vec<Item> = tables
            .items
            .values()
            .filter(|i| i.container_id == container_id)
            .cloned()
            .collect();
        items.sort_by_key(|i| i.created_at);
        Ok(items)
    }

    async fn find_by_name(
        &self,
        container_id: ContainerId,
        name: &str,
    ) -> AppResult<Option<Item>> {
        let tables = self.tables.read().await;
        Ok(tables
            .items
            .values()
            .find(|i| i.container_id == container_id && i.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn create(&self, item: &CreateItem) -> AppResult<Item> {
        let mut tables = self.tables.write().await;
        let collision = tables
            .items
            .values()
            .any(|i| i.container_id == item.container_id && i.name.eq_ignore_ascii_case(&item.name));
        if collision {
            return Err(AppError::duplicate("Failed to create item"));
        }
        let row = Item {
            id: ItemId::new(),
            container_id: item.container_id,
            name: item.name.clone(),
            quantity: item.quantity.clone(),
            created_at: Utc::now(),
        };
        tables.items.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: ItemId, name: &str, quantity: &str) -> AppResult<Option<Item>> {
        let mut tables = self.tables.write().await;
        let Some(row) = tables.items.get_mut(&id) else {
            return Ok(None);
        };
        row.name = name.to_string();
        row.quantity = quantity.to_string();
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: ItemId) -> AppResult<bool> {
        Ok(self.tables.write().await.items.remove(&id).is_some())
    }

    async fn delete_by_container(&self, container_id: ContainerId) -> AppResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.items.len();
        tables.items.retain(|_, i| i.container_id != container_id);
        Ok((before - tables.items.len()) as u64)
    }
}

#[async_trait]
impl ShareRepository for MemoryBackend {
    async fn find_by_id(&self, id: ShareId) -> AppResult<Option<Share>> {
        Ok(self.tables.read().await.shares.get(&id).cloned())
    }

    async fn find_by_environment(&self, environment_id: EnvironmentId) -> AppResult<Vec<Share>> {
        let tables = self.tables.read().await;
        let mut shares: Vec<Share> = tables
            .shares
            .values()
            .filter(|s| s.environment_id == environment_id)
            .cloned()
            .collect();
        shares.sort_by_key(|s| s.created_at);
        Ok(shares)
    }

    async fn find_outstanding(
        &self,
        environment_id: EnvironmentId,
        invitee_email: &str,
    ) -> AppResult<Option<Share>> {
        let tables = self.tables.read().await;
        Ok(tables
            .shares
            .values()
            .find(|s| {
                s.environment_id == environment_id
                    && s.invitee_email.eq_ignore_ascii_case(invitee_email)
            })
            .cloned())
    }

    async fn find_pending_by_email(&self, invitee_email: &str) -> AppResult<Vec<Share>> {
        self.find_by_email_and_status(invitee_email, ShareStatus::Pending)
            .await
    }

    async fn find_accepted_by_email(&self, invitee_email: &str) -> AppResult<Vec<Share>> {
        self.find_by_email_and_status(invitee_email, ShareStatus::Accepted)
            .await
    }

    async fn create(&self, share: &CreateShare) -> AppResult<Share> {
        let mut tables = self.tables.write().await;
        let collision = tables.shares.values().any(|s| {
            s.environment_id == share.environment_id
                && s.invitee_email.eq_ignore_ascii_case(&share.invitee_email)
        });
        if collision {
            return Err(AppError::duplicate("Failed to create share"));
        }
        let row = Share {
            id: ShareId::new(),
            environment_id: share.environment_id,
            invitee_email: share.invitee_email.to_lowercase(),
            status: share.status,
            created_at: Utc::now(),
        };
        tables.shares.insert(row.id, row.clone());
        Ok(row)
    }

    async fn set_status(&self, id: ShareId, status: ShareStatus) -> AppResult<Option<Share>> {
        let mut tables = self.tables.write().await;
        let Some(row) = tables.shares.get_mut(&id) else {
            return Ok(None);
        };
        row.status = status;
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: ShareId) -> AppResult<bool> {
        Ok(self.tables.write().await.shares.remove(&id).is_some())
    }
}

impl MemoryBackend {
    async fn find_by_email_and_status(
        &self,
        invitee_email: &str,
        status: ShareStatus,
    ) -> AppResult<Vec<Share>> {
        let tables = self.tables.read().await;
        let mut shares: Vec<Share> = tables
            .shares
            .values()
            .filter(|s| s.status == status && s.invitee_email.eq_ignore_ascii_case(invitee_email))
            .cloned()
            .collect();
        shares.sort_by_key(|s| s.created_at);
        Ok(shares)
    }
}

#[async_trait]
impl ActivityLogRepository for MemoryBackend {
    async fn append(&self, entry: &CreateActivityEntry) -> AppResult<ActivityEntry> {
        let mut tables = self.tables.write().await;
        let row = ActivityEntry {
            id: ActivityEntryId::new(),
            environment_id: entry.environment_id,
            container_id: entry.container_id,
            item_id: entry.item_id,
            actor_id: entry.actor_id,
            actor_display_name: entry.actor_display_name.clone(),
            event: entry.event,
            metadata: entry.metadata.clone(),
            created_at: Utc::now(),
        };
        tables.activity.push(row.clone());
        Ok(row)
    }

    async fn find_by_environment(
        &self,
        environment_id: EnvironmentId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ActivityEntry>> {
        let tables = self.tables.read().await;
        // Insertion order doubles as the time order; reverse for newest-first.
        let rows: Vec<ActivityEntry> = tables
            .activity
            .iter()
            .rev()
            .filter(|e| e.environment_id == environment_id)
            .cloned()
            .collect();
        Ok(paginate(rows, page))
    }
}

#[async_trait]
impl ProfileRepository for MemoryBackend {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<Profile>> {
        Ok(self.tables.read().await.profiles.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Profile>> {
        let tables = self.tables.read().await;
        Ok(tables
            .profiles
            .values()
            .find(|p| p.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}

#[async_trait]
impl NotificationRepository for MemoryBackend {
    async fn create(&self, notification: &CreateNotification) -> AppResult<Notification> {
        let mut tables = self.tables.write().await;
        let row = Notification {
            id: NotificationId::new(),
            recipient_user_id: notification.recipient_user_id,
            message: notification.message.clone(),
            read: false,
            created_at: Utc::now(),
        };
        tables.notifications.push(row.clone());
        Ok(row)
    }

    async fn find_by_recipient(
        &self,
        recipient: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let tables = self.tables.read().await;
        let rows: Vec<Notification> = tables
            .notifications
            .iter()
            .rev()
            .filter(|n| n.recipient_user_id == recipient)
            .cloned()
            .collect();
        Ok(paginate(rows, page))
    }

    async fn mark_read(&self, id: NotificationId, recipient: UserId) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        match tables
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.recipient_user_id == recipient)
        {
            Some(n) => {
                n.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: NotificationId, recipient: UserId) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.notifications.len();
        tables
            .notifications
            .retain(|n| !(n.id == id && n.recipient_user_id == recipient));
        Ok(tables.notifications.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stashhub_core::error::ErrorKind;

    #[tokio::test]
    async fn test_container_unique_index_emulation() {
        let backend = MemoryBackend::new();
        let owner = UserId::new();
        let env = EnvironmentId::new();
        let create = CreateContainer {
            environment_id: env,
            owner_id: owner,
            name: "Shelf A".to_string(),
        };
        ContainerRepository::create(&backend, &create).await.unwrap();

        let dup = CreateContainer {
            name: "shelf a".to_string(),
            ..create
        };
        let err = ContainerRepository::create(&backend, &dup).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Duplicate);
    }

    #[tokio::test]
    async fn test_delete_by_container_removes_only_that_container() {
        let backend = MemoryBackend::new();
        let a = ContainerId::new();
        let b = ContainerId::new();
        for (container, name) in [(a, "Drill"), (a, "Saw"), (b, "Tape")] {
            ItemRepository::create(
                &backend,
                &CreateItem {
                    container_id: container,
                    name: name.to_string(),
                    quantity: "1".to_string(),
                },
            )
            .await
            .unwrap();
        }

        let removed = backend.delete_by_container(a).await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(backend.find_by_container(b).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_activity_is_newest_first() {
        let backend = MemoryBackend::new();
        let env = EnvironmentId::new();
        let actor = UserId::new();
        for event in [
            stashhub_entity::ActivityEvent::ContainerCreate,
            stashhub_entity::ActivityEvent::ItemCreate,
        ] {
            backend
                .append(&CreateActivityEntry {
                    environment_id: env,
                    container_id: None,
                    item_id: None,
                    actor_id: actor,
                    actor_display_name: "alice".to_string(),
                    event,
                    metadata: serde_json::json!({}),
                })
                .await
                .unwrap();
        }

        let page = ActivityLogRepository::find_by_environment(&backend, env, &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(
            page.items[0].event,
            stashhub_entity::ActivityEvent::ItemCreate
        );
    }
}
