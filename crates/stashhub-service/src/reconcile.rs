//! Change-feed driven reconciliation.
//!
//! One task per active scope listens for row changes and answers every
//! event the same way: reload the whole scope from the remote store.
//! Reloads are idempotent and the last one wins, so dropped, reordered,
//! or coalesced events never leave the cache wrong for longer than one
//! reload.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use stashhub_core::events::StoreTable;
use stashhub_core::traits::feed::ChangeFeed;
use stashhub_core::types::EnvironmentId;
use stashhub_entity::share::Share;

use crate::inventory::InventoryService;
use crate::share::ShareService;

/// What an inventory reconciler keeps fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileScope {
    /// One environment's containers and items.
    Environment(EnvironmentId),
    /// Everything visible to the current user.
    All,
}

/// Called with the fresh pending list after each share reload.
pub type PendingCallback = Box<dyn Fn(Vec<Share>) + Send + Sync>;

/// Spawns reconciliation tasks.
pub struct Reconciler;

/// Handle to a running reconciliation task.
///
/// [`shutdown`](ReconcilerHandle::shutdown) stops the task and waits for
/// its subscriptions to be torn down; dropping the handle aborts the
/// task instead, so a forgotten handle never leaks a feed consumer.
#[derive(Debug)]
pub struct ReconcilerHandle {
    stop: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl ReconcilerHandle {
    fn new(stop: watch::Sender<bool>, task: JoinHandle<()>) -> Self {
        Self {
            stop,
            task: Some(task),
        }
    }

    /// Stop the task and wait for it to finish.
    pub async fn shutdown(mut self) {
        let _ = self.stop.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for ReconcilerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Reconciler {
    /// Keep an inventory scope in sync with the `containers` and `items`
    /// tables. Any event on either table triggers a full scoped reload.
    pub fn spawn_inventory(
        feed: &dyn ChangeFeed,
        inventory: Arc<InventoryService>,
        scope: ReconcileScope,
    ) -> ReconcilerHandle {
        let mut containers = feed.subscribe(StoreTable::Containers);
        let mut items = feed.subscribe(StoreTable::Items);
        let (stop, mut stopped) = watch::channel(false);

        let task = tokio::spawn(async move {
            loop {
                let event = tokio::select! {
                    _ = stopped.changed() => break,
                    event = containers.next() => event,
                    event = items.next() => event,
                };
                let Some(event) = event else {
                    debug!("change feed closed, stopping inventory reconciler");
                    break;
                };

                debug!(table = %event.table, kind = ?event.kind, "reconciling inventory");
                let reloaded = match scope {
                    ReconcileScope::Environment(id) => {
                        inventory.load_for_environment(id).await.map(|_| ())
                    }
                    ReconcileScope::All => inventory.load_all().await.map(|_| ()),
                };
                if let Err(e) = reloaded {
                    warn!(error = %e, "inventory reload failed, cache left as-is");
                }
            }
            containers.unsubscribe();
            items.unsubscribe();
        });

        ReconcilerHandle::new(stop, task)
    }

    /// Keep the current user's pending invites in sync with the
    /// `environment_shares` table. The optional callback receives each
    /// fresh pending list, for surfacing new invites as they arrive.
    pub fn spawn_shares(
        feed: &dyn ChangeFeed,
        shares: Arc<ShareService>,
        on_pending: Option<PendingCallback>,
    ) -> ReconcilerHandle {
        let mut subscription = feed.subscribe(StoreTable::EnvironmentShares);
        let (stop, mut stopped) = watch::channel(false);

        let task = tokio::spawn(async move {
            loop {
                let event = tokio::select! {
                    _ = stopped.changed() => break,
                    event = subscription.next() => event,
                };
                if event.is_none() {
                    debug!("change feed closed, stopping share reconciler");
                    break;
                }

                match shares.list_pending_for_current_user().await {
                    Ok(pending) => {
                        if let Some(callback) = &on_pending {
                            callback(pending);
                        }
                    }
                    Err(e) => warn!(error = %e, "pending invite reload failed"),
                }
            }
            subscription.unsubscribe();
        });

        ReconcilerHandle::new(stop, task)
    }
}
