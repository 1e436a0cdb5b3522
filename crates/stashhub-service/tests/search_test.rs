//! Search over the cached inventory.

mod common;

use common::TestApp;
use stashhub_service::SearchMode;
use stashhub_service::inventory::NewItem;

async fn stocked_app() -> TestApp {
    let app = TestApp::new();
    let alice = app.register_user("alice@example.com", None).await;
    app.sign_in(&alice);

    let garage = app.environments.create_environment("Garage").await.unwrap();
    let shelf_a = app
        .inventory
        .create_container(garage.id, "Shelf A")
        .await
        .unwrap()
        .unwrap();
    let shelf_b = app
        .inventory
        .create_container(garage.id, "Étagère")
        .await
        .unwrap()
        .unwrap();

    for (container, name) in [
        (shelf_a.id, "Drill"),
        (shelf_a.id, "Drill bits"),
        (shelf_b.id, "Perceuse à colonne"),
    ] {
        app.inventory
            .create_item(
                container,
                NewItem {
                    name: name.to_string(),
                    quantity: "1".to_string(),
                },
            )
            .await
            .unwrap();
    }
    app
}

#[tokio::test]
async fn test_item_search_is_case_insensitive() {
    let app = stocked_app().await;
    let hits = app.search.search("drill", SearchMode::Items).await;
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].item.as_ref().unwrap().name, "Drill");
    assert_eq!(hits[1].item.as_ref().unwrap().name, "Drill bits");
    assert_eq!(hits[0].container.name, "Shelf A");
}

#[tokio::test]
async fn test_search_ignores_diacritics_both_ways() {
    let app = stocked_app().await;

    let hits = app.search.search("perceuse a", SearchMode::Items).await;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].item.as_ref().unwrap().name, "Perceuse à colonne");

    let hits = app.search.search("étagere", SearchMode::Containers).await;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].container.name, "Étagère");
    assert!(hits[0].item.is_none());
}

#[tokio::test]
async fn test_blank_query_matches_nothing() {
    let app = stocked_app().await;
    assert!(app.search.search("   ", SearchMode::Items).await.is_empty());
}

#[tokio::test]
async fn test_container_mode_does_not_match_items() {
    let app = stocked_app().await;
    assert!(
        app.search
            .search("drill", SearchMode::Containers)
            .await
            .is_empty()
    );
}
