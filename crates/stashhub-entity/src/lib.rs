//! # stashhub-entity
//!
//! Domain entity models for StashHub: environments, containers, items,
//! shares, activity log entries, profiles, and notifications. Each model
//! has a `Create*` companion carrying the caller-supplied fields.

pub mod activity;
pub mod container;
pub mod environment;
pub mod item;
pub mod notification;
pub mod profile;
pub mod share;

pub use activity::{ActivityEntry, ActivityEvent, CreateActivityEntry};
pub use container::{Container, CreateContainer};
pub use environment::{CreateEnvironment, Environment};
pub use item::{CreateItem, Item};
pub use notification::{CreateNotification, Notification};
pub use profile::Profile;
pub use share::{CreateShare, Share, ShareStatus};
