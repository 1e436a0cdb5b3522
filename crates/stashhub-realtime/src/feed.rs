//! Process-local change feed backed by tokio broadcast channels.

use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::debug;

use stashhub_core::events::{ChangeEvent, StoreTable};
use stashhub_core::traits::feed::{ChangeFeed, FeedSubscription};

const DEFAULT_BUFFER_SIZE: usize = 64;

/// One broadcast channel per table, created lazily on first use.
///
/// Events published while a table has no subscribers are dropped, which
/// matches the semantics reconcilers need: a subscriber always starts
/// with a fresh load, so history before the subscription is irrelevant.
#[derive(Debug)]
pub struct MemoryChangeFeed {
    channels: DashMap<StoreTable, broadcast::Sender<ChangeEvent>>,
    buffer_size: usize,
}

impl MemoryChangeFeed {
    /// Create a feed with the default per-table buffer.
    pub fn new() -> Self {
        Self::with_buffer_size(DEFAULT_BUFFER_SIZE)
    }

    /// Create a feed with an explicit per-table buffer size.
    ///
    /// When a subscriber falls more than `buffer_size` events behind it
    /// lags: the oldest events are discarded and the subscriber coalesces.
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self {
            channels: DashMap::new(),
            buffer_size: buffer_size.max(1),
        }
    }

    /// Publish a change event to every subscriber of its table.
    ///
    /// Returns the number of subscribers that received the event.
    pub fn publish(&self, event: ChangeEvent) -> usize {
        let Some(sender) = self.channels.get(&event.table) else {
            return 0;
        };
        match sender.send(event) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(event)) => {
                debug!(table = %event.table, "no live subscribers, event dropped");
                0
            }
        }
    }

    /// Number of live subscribers across all tables.
    pub fn subscriber_count(&self) -> usize {
        self.channels
            .iter()
            .map(|entry| entry.value().receiver_count())
            .sum()
    }
}

impl Default for MemoryChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeFeed for MemoryChangeFeed {
    fn subscribe(&self, table: StoreTable) -> FeedSubscription {
        let sender = self
            .channels
            .entry(table)
            .or_insert_with(|| broadcast::channel(self.buffer_size).0);
        FeedSubscription::new(table, sender.subscribe())
    }
}
