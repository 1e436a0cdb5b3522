//! Change-feed reconciliation, including the full two-user scenario.

mod common;

use std::sync::{Arc, Mutex};

use common::{TestApp, eventually};
use serde_json::json;
use stashhub_core::events::{ChangeEvent, StoreTable};
use stashhub_entity::share::Share;
use stashhub_realtime::MemoryChangeFeed;
use stashhub_service::inventory::{NewItem, UpdateItem};
use stashhub_service::{ReconcileScope, Reconciler};

#[tokio::test]
async fn test_container_event_triggers_scoped_reload() {
    let alice_app = TestApp::new();
    let alice = alice_app.register_user("alice@example.com", None).await;
    alice_app.sign_in(&alice);
    let garage = alice_app
        .environments
        .create_environment("Garage")
        .await
        .unwrap();
    alice_app
        .inventory
        .load_for_environment(garage.id)
        .await
        .unwrap();

    let feed = MemoryChangeFeed::new();
    let handle = Reconciler::spawn_inventory(
        &feed,
        Arc::clone(&alice_app.inventory),
        ReconcileScope::Environment(garage.id),
    );

    // Bob creates a container on his device; the store then notifies.
    let bob_app = alice_app.sibling();
    let bob = bob_app.register_user("bob@example.com", None).await;
    bob_app.sign_in(&bob);
    bob_app
        .inventory
        .load_for_environment(garage.id)
        .await
        .unwrap();
    let shelf = bob_app
        .inventory
        .create_container(garage.id, "Shelf A")
        .await
        .unwrap()
        .unwrap();
    feed.publish(ChangeEvent::insert(
        StoreTable::Containers,
        json!({"id": shelf.id, "name": "Shelf A"}),
    ));

    let converged = eventually(|| async {
        alice_app
            .cache
            .snapshot_environment(garage.id)
            .await
            .iter()
            .any(|c| c.container.name == "Shelf A")
    })
    .await;
    assert!(converged, "cache never picked up the remote container");

    handle.shutdown().await;
    assert_eq!(feed.subscriber_count(), 0);
}

#[tokio::test]
async fn test_share_event_reloads_pending_invites() {
    let alice_app = TestApp::new();
    let alice = alice_app.register_user("alice@example.com", None).await;
    alice_app.sign_in(&alice);
    let garage = alice_app
        .environments
        .create_environment("Garage")
        .await
        .unwrap();

    let bob_app = alice_app.sibling();
    let bob = bob_app.register_user("bob@example.com", None).await;
    bob_app.sign_in(&bob);

    let feed = MemoryChangeFeed::new();
    let seen: Arc<Mutex<Vec<Share>>> = Arc::new(Mutex::new(Vec::new()));
    let seen_by_callback = Arc::clone(&seen);
    let handle = Reconciler::spawn_shares(
        &feed,
        Arc::clone(&bob_app.shares),
        Some(Box::new(move |pending| {
            *seen_by_callback.lock().unwrap() = pending;
        })),
    );

    alice_app
        .shares
        .create_share(garage.id, "bob@example.com")
        .await
        .unwrap();
    feed.publish(ChangeEvent::insert(
        StoreTable::EnvironmentShares,
        json!({"invitee_email": "bob@example.com"}),
    ));

    let converged = eventually(|| async {
        !bob_app.shares.pending_snapshot().await.is_empty()
    })
    .await;
    assert!(converged, "pending list never reloaded");
    assert_eq!(seen.lock().unwrap().len(), 1);

    handle.shutdown().await;
}

#[tokio::test]
async fn test_dropping_the_handle_tears_the_subscription_down() {
    let app = TestApp::new();
    let feed = MemoryChangeFeed::new();
    let handle =
        Reconciler::spawn_inventory(&feed, Arc::clone(&app.inventory), ReconcileScope::All);
    assert_eq!(feed.subscriber_count(), 2);

    drop(handle);
    let torn_down = eventually(|| {
        let count = feed.subscriber_count();
        async move { count == 0 }
    })
    .await;
    assert!(torn_down, "subscriptions survived the handle");
}

// Two members of one shared environment, each with their own device:
// every mutation on one side becomes visible on the other after the
// change feed fires, and the history names both actors.
#[tokio::test]
async fn test_two_member_convergence() {
    let feed = MemoryChangeFeed::new();

    let alice_app = TestApp::new();
    let alice = alice_app
        .register_user("alice@example.com", Some("Alice L"))
        .await;
    alice_app.sign_in(&alice);
    let garage = alice_app
        .environments
        .create_environment("Garage")
        .await
        .unwrap();

    let bob_app = alice_app.sibling();
    let bob = bob_app.register_user("bob@example.com", Some("Bob M")).await;
    bob_app.sign_in(&bob);

    alice_app
        .shares
        .create_share(garage.id, "bob@example.com")
        .await
        .unwrap();
    let invite = bob_app.shares.list_pending_for_current_user().await.unwrap()[0].clone();
    bob_app.shares.accept_share(invite.id).await.unwrap();

    alice_app.inventory.load_all().await.unwrap();
    bob_app.inventory.load_all().await.unwrap();
    let _alice_sync = Reconciler::spawn_inventory(
        &feed,
        Arc::clone(&alice_app.inventory),
        ReconcileScope::All,
    );
    let _bob_sync = Reconciler::spawn_inventory(
        &feed,
        Arc::clone(&bob_app.inventory),
        ReconcileScope::All,
    );

    // Alice stocks the garage.
    let shelf = alice_app
        .inventory
        .create_container(garage.id, "Shelf A")
        .await
        .unwrap()
        .unwrap();
    alice_app
        .inventory
        .create_item(
            shelf.id,
            NewItem {
                name: "Drill".to_string(),
                quantity: "1".to_string(),
            },
        )
        .await
        .unwrap();
    feed.publish(ChangeEvent::insert(StoreTable::Items, json!({"name": "Drill"})));

    let bob_sees_drill = eventually(|| async {
        bob_app
            .cache
            .get(shelf.id)
            .await
            .is_some_and(|c| c.item_by_name("Drill").is_some())
    })
    .await;
    assert!(bob_sees_drill);

    // Bob adjusts the quantity from his side.
    bob_app
        .inventory
        .update_item(
            shelf.id,
            UpdateItem {
                original_name: "Drill".to_string(),
                name: "Drill".to_string(),
                quantity: "2".to_string(),
            },
        )
        .await
        .unwrap();
    feed.publish(ChangeEvent::update(
        StoreTable::Items,
        json!({"quantity": "1"}),
        json!({"quantity": "2"}),
    ));

    let alice_sees_update = eventually(|| async {
        alice_app
            .cache
            .get(shelf.id)
            .await
            .is_some_and(|c| c.item_by_name("Drill").is_some_and(|i| i.quantity == "2"))
    })
    .await;
    assert!(alice_sees_update);

    // Both actors appear in the shared history under their own names.
    let page = alice_app
        .activity
        .list_for_environment(garage.id, &Default::default())
        .await
        .unwrap();
    let actors: Vec<&str> = page
        .items
        .iter()
        .map(|e| e.actor_display_name.as_str())
        .collect();
    assert!(actors.contains(&"Alice L"));
    assert!(actors.contains(&"Bob M"));
}
