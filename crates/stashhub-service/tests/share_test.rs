//! Share invite lifecycle against the in-memory stack.

mod common;

use common::TestApp;
use stashhub_core::error::ErrorKind;
use stashhub_core::types::pagination::PageRequest;
use stashhub_entity::share::ShareStatus;
use stashhub_service::InviteOutcome;

#[tokio::test]
async fn test_invite_outcomes() {
    let app = TestApp::new();
    let alice = app.register_user("alice@example.com", Some("Alice L")).await;
    app.register_user("bob@example.com", None).await;
    app.sign_in(&alice);

    let garage = app.environments.create_environment("Garage").await.unwrap();

    let outcome = app
        .shares
        .create_share(garage.id, "alice@example.com")
        .await
        .unwrap();
    assert!(matches!(outcome, InviteOutcome::SelfShare));

    let outcome = app
        .shares
        .create_share(garage.id, "nobody@example.com")
        .await
        .unwrap();
    assert!(matches!(outcome, InviteOutcome::UserNotFound));

    let outcome = app
        .shares
        .create_share(garage.id, "Bob@Example.com")
        .await
        .unwrap();
    let InviteOutcome::Invited(share) = outcome else {
        panic!("expected an invite");
    };
    assert_eq!(share.invitee_email, "bob@example.com");
    assert_eq!(share.status, ShareStatus::Pending);

    // A second invite while the first is unanswered.
    let outcome = app
        .shares
        .create_share(garage.id, "bob@example.com")
        .await
        .unwrap();
    assert!(matches!(outcome, InviteOutcome::InvitePending));
}

#[tokio::test]
async fn test_invite_after_acceptance_reports_already_shared() {
    let app = TestApp::new();
    let alice = app.register_user("alice@example.com", None).await;
    let bob = app.register_user("bob@example.com", None).await;
    app.sign_in(&alice);
    let garage = app.environments.create_environment("Garage").await.unwrap();

    let bob_app = app.sibling();
    app.shares
        .create_share(garage.id, "bob@example.com")
        .await
        .unwrap();

    bob_app.sign_in(&bob);
    let invite = bob_app.shares.list_pending_for_current_user().await.unwrap()[0].clone();
    let accepted = bob_app.shares.accept_share(invite.id).await.unwrap();
    assert_eq!(accepted.status, ShareStatus::Accepted);
    assert!(bob_app.shares.pending_snapshot().await.is_empty());

    let outcome = app
        .shares
        .create_share(garage.id, "bob@example.com")
        .await
        .unwrap();
    assert!(matches!(outcome, InviteOutcome::AlreadyShared));
}

#[tokio::test]
async fn test_decline_deletes_the_row() {
    let app = TestApp::new();
    let alice = app.register_user("alice@example.com", None).await;
    let bob = app.register_user("bob@example.com", None).await;
    app.sign_in(&alice);
    let garage = app.environments.create_environment("Garage").await.unwrap();
    app.shares
        .create_share(garage.id, "bob@example.com")
        .await
        .unwrap();

    let bob_app = app.sibling();
    bob_app.sign_in(&bob);
    let invite = bob_app.shares.list_pending_for_current_user().await.unwrap()[0].clone();
    bob_app.shares.decline_share(invite.id).await.unwrap();

    assert!(bob_app
        .shares
        .list_pending_for_current_user()
        .await
        .unwrap()
        .is_empty());
    // The owner sees no trace either; a fresh invite is possible.
    assert!(app.shares.list_shares(garage.id).await.unwrap().is_empty());
    let outcome = app
        .shares
        .create_share(garage.id, "bob@example.com")
        .await
        .unwrap();
    assert!(matches!(outcome, InviteOutcome::Invited(_)));
}

#[tokio::test]
async fn test_only_the_invitee_may_answer() {
    let app = TestApp::new();
    let alice = app.register_user("alice@example.com", None).await;
    app.register_user("bob@example.com", None).await;
    let carol = app.register_user("carol@example.com", None).await;
    app.sign_in(&alice);
    let garage = app.environments.create_environment("Garage").await.unwrap();
    let InviteOutcome::Invited(share) = app
        .shares
        .create_share(garage.id, "bob@example.com")
        .await
        .unwrap()
    else {
        panic!("expected an invite");
    };

    let carol_app = app.sibling();
    carol_app.sign_in(&carol);
    let err = carol_app.shares.accept_share(share.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test]
async fn test_revoke_is_owner_only_and_works_in_any_status() {
    let app = TestApp::new();
    let alice = app.register_user("alice@example.com", None).await;
    let bob = app.register_user("bob@example.com", None).await;
    app.sign_in(&alice);
    let garage = app.environments.create_environment("Garage").await.unwrap();
    let InviteOutcome::Invited(share) = app
        .shares
        .create_share(garage.id, "bob@example.com")
        .await
        .unwrap()
    else {
        panic!("expected an invite");
    };

    let bob_app = app.sibling();
    bob_app.sign_in(&bob);
    let err = bob_app.shares.revoke_share(share.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
    bob_app.shares.accept_share(share.id).await.unwrap();

    // Accepted shares can be revoked too.
    app.shares.revoke_share(share.id).await.unwrap();
    assert!(app.shares.list_shares(garage.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invite_notifies_the_invitee() {
    let app = TestApp::new();
    let alice = app.register_user("alice@example.com", Some("Alice L")).await;
    let bob = app.register_user("bob@example.com", None).await;
    app.sign_in(&alice);
    let garage = app.environments.create_environment("Garage").await.unwrap();
    app.shares
        .create_share(garage.id, "bob@example.com")
        .await
        .unwrap();

    let bob_app = app.sibling();
    bob_app.sign_in(&bob);
    let page = bob_app
        .notifications
        .list_for_current_user(&PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total_items, 1);
    assert_eq!(page.items[0].message, "Alice L invited you to \"Garage\"");
    assert!(!page.items[0].read);

    bob_app
        .notifications
        .mark_read(page.items[0].id)
        .await
        .unwrap();
    let page = bob_app
        .notifications
        .list_for_current_user(&PageRequest::default())
        .await
        .unwrap();
    assert!(page.items[0].read);

    bob_app.notifications.delete(page.items[0].id).await.unwrap();
    let page = bob_app
        .notifications
        .list_for_current_user(&PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total_items, 0);
}

#[tokio::test]
async fn test_invite_notification_names_inviter_by_email_without_full_name() {
    let app = TestApp::new();
    // Carol's profile has no full name; the email local part steps in.
    let carol = app.register_user("carol.j@example.com", None).await;
    let bob = app.register_user("bob@example.com", None).await;
    app.sign_in(&carol);
    let garage = app.environments.create_environment("Garage").await.unwrap();
    app.shares
        .create_share(garage.id, "bob@example.com")
        .await
        .unwrap();

    let bob_app = app.sibling();
    bob_app.sign_in(&bob);
    let page = bob_app
        .notifications
        .list_for_current_user(&PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.items[0].message, "carol.j invited you to \"Garage\"");
}

#[tokio::test]
async fn test_accessible_environments_dedupes_owned_and_shared() {
    let app = TestApp::new();
    let alice = app.register_user("alice@example.com", None).await;
    let bob = app.register_user("bob@example.com", None).await;
    app.sign_in(&alice);
    let garage = app.environments.create_environment("Garage").await.unwrap();
    app.environments.create_environment("Office").await.unwrap();
    app.shares
        .create_share(garage.id, "bob@example.com")
        .await
        .unwrap();

    let bob_app = app.sibling();
    bob_app.sign_in(&bob);
    let workshop = bob_app
        .environments
        .create_environment("Workshop")
        .await
        .unwrap();
    let invite = bob_app.shares.list_pending_for_current_user().await.unwrap()[0].clone();
    bob_app.shares.accept_share(invite.id).await.unwrap();

    let mut names: Vec<String> = bob_app
        .shares
        .list_accessible_environments()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["Garage", "Workshop"]);
    assert!(
        bob_app
            .shares
            .list_accessible_environments()
            .await
            .unwrap()
            .iter()
            .any(|e| e.id == workshop.id)
    );
}
