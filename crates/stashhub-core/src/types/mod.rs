//! Shared type definitions: identifiers and pagination.

pub mod id;
pub mod pagination;

pub use id::{
    ActivityEntryId, ContainerId, EnvironmentId, ItemId, NotificationId, ShareId, UserId,
};
pub use pagination::{PageRequest, PageResponse};
