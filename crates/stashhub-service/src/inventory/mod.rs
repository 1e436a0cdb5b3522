//! Inventory management: containers, items, and the local mirror.

pub mod cache;
pub mod service;

pub use cache::{CachedContainer, InventoryCache};
pub use service::{InventoryService, NewItem, UpdateItem};
