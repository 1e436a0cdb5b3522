//! Change feed contract.

use tokio::sync::broadcast;
use tracing::debug;

use crate::events::{ChangeEvent, StoreTable};

/// Subscription source for change notifications.
///
/// One subscription is taken per table per active scope and must be torn
/// down (dropped or [`FeedSubscription::unsubscribe`]d) when the scope
/// ends, or notifications keep flowing to a dead consumer.
pub trait ChangeFeed: Send + Sync + 'static {
    /// Subscribe to change notifications for one table.
    fn subscribe(&self, table: StoreTable) -> FeedSubscription;
}

/// A live subscription to one table's change notifications.
///
/// No ordering guarantee is required between events: reconciliation always
/// performs a full reload, so reordering and coalescing of rapid bursts are
/// harmless (last reload wins). A lagged receiver therefore just skips to
/// the oldest retained event.
pub struct FeedSubscription {
    table: StoreTable,
    receiver: broadcast::Receiver<ChangeEvent>,
}

impl FeedSubscription {
    /// Wrap a broadcast receiver for the given table.
    pub fn new(table: StoreTable, receiver: broadcast::Receiver<ChangeEvent>) -> Self {
        Self { table, receiver }
    }

    /// The table this subscription is scoped to.
    pub fn table(&self) -> StoreTable {
        self.table
    }

    /// Wait for the next change notification.
    ///
    /// Returns `None` once the feed has shut down.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(table = %self.table, skipped, "change feed lagged, coalescing");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Tear the subscription down.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl std::fmt::Debug for FeedSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedSubscription")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}
