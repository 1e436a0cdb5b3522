//! Activity history: ordering, actor naming, and best-effort semantics.

mod common;

use std::sync::Arc;

use async_trait::async_trait;

use common::TestApp;
use stashhub_core::AppError;
use stashhub_core::result::AppResult;
use stashhub_core::types::EnvironmentId;
use stashhub_core::types::pagination::{PageRequest, PageResponse};
use stashhub_database::repositories::ActivityLogRepository;
use stashhub_entity::activity::{ActivityEntry, ActivityEvent, CreateActivityEntry};
use stashhub_service::inventory::{NewItem, UpdateItem};
use stashhub_service::{ActivityLogger, ActorNameCache, InventoryService};

#[tokio::test]
async fn test_mutations_append_history_newest_first() {
    let app = TestApp::new();
    let alice = app.register_user("alice@example.com", Some("Alice L")).await;
    app.sign_in(&alice);

    let garage = app.environments.create_environment("Garage").await.unwrap();
    let shelf = app
        .inventory
        .create_container(garage.id, "Shelf A")
        .await
        .unwrap()
        .unwrap();
    app.inventory
        .create_item(
            shelf.id,
            NewItem {
                name: "Drill".to_string(),
                quantity: "1".to_string(),
            },
        )
        .await
        .unwrap();
    app.inventory
        .update_item(
            shelf.id,
            UpdateItem {
                original_name: "Drill".to_string(),
                name: "Impact Drill".to_string(),
                quantity: "2".to_string(),
            },
        )
        .await
        .unwrap();
    app.inventory
        .delete_item(shelf.id, "Impact Drill")
        .await
        .unwrap();

    let page = app
        .activity
        .list_for_environment(garage.id, &PageRequest::default())
        .await
        .unwrap();
    let events: Vec<ActivityEvent> = page.items.iter().map(|e| e.event).collect();
    assert_eq!(
        events,
        vec![
            ActivityEvent::ItemDelete,
            ActivityEvent::ItemUpdate,
            ActivityEvent::ItemCreate,
            ActivityEvent::ContainerCreate,
        ]
    );
    for entry in &page.items {
        assert_eq!(entry.actor_display_name, "Alice L");
        assert_eq!(entry.actor_id, alice.id);
    }

    let update = &page.items[1];
    assert_eq!(update.metadata["previous_name"], "Drill");
    assert_eq!(update.metadata["item_name"], "Impact Drill");
    assert_eq!(update.metadata["previous_quantity"], "1");
    assert_eq!(update.metadata["quantity"], "2");
}

#[tokio::test]
async fn test_actor_name_falls_back_to_email_local_part() {
    let app = TestApp::new();
    // Registered, but the profile has no full name.
    let bob = app.register_user("bob.smith@example.com", None).await;
    app.sign_in(&bob);

    let garage = app.environments.create_environment("Garage").await.unwrap();
    app.inventory
        .create_container(garage.id, "Shelf A")
        .await
        .unwrap();

    let page = app
        .activity
        .list_for_environment(garage.id, &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.items[0].actor_display_name, "bob.smith");
}

#[tokio::test]
async fn test_history_pagination() {
    let app = TestApp::new();
    let alice = app.register_user("alice@example.com", None).await;
    app.sign_in(&alice);
    let garage = app.environments.create_environment("Garage").await.unwrap();

    for i in 0..7 {
        app.inventory
            .create_container(garage.id, &format!("Shelf {i}"))
            .await
            .unwrap();
    }

    let page = app
        .activity
        .list_for_environment(garage.id, &PageRequest::new(2, 3))
        .await
        .unwrap();
    assert_eq!(page.total_items, 7);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.items.len(), 3);
    assert!(page.has_next);
    assert!(page.has_previous);
}

/// Activity store that rejects every append.
struct BrokenActivityLog;

#[async_trait]
impl ActivityLogRepository for BrokenActivityLog {
    async fn append(&self, _entry: &CreateActivityEntry) -> AppResult<ActivityEntry> {
        Err(AppError::database("activity store unavailable"))
    }

    async fn find_by_environment(
        &self,
        _environment_id: EnvironmentId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ActivityEntry>> {
        Ok(PageResponse::empty(page))
    }
}

#[tokio::test]
async fn test_logging_failure_never_fails_the_mutation() {
    let app = TestApp::new();
    let alice = app.register_user("alice@example.com", None).await;
    app.sign_in(&alice);
    let garage = app.environments.create_environment("Garage").await.unwrap();

    let broken_logger = Arc::new(ActivityLogger::new(
        Arc::new(BrokenActivityLog),
        app.backend.clone(),
        Arc::new(ActorNameCache::new()),
    ));
    let inventory = InventoryService::new(
        app.backend.clone(),
        app.backend.clone(),
        app.backend.clone(),
        app.identity.clone(),
        Arc::clone(&app.shares),
        Arc::clone(&app.cache),
        broken_logger,
    );

    let shelf = inventory
        .create_container(garage.id, "Shelf A")
        .await
        .unwrap();
    assert!(shelf.is_some(), "mutation must succeed without its log entry");
}
