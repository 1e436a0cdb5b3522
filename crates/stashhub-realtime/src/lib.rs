//! Change-feed plumbing for StashHub.
//!
//! The sync core only depends on the [`ChangeFeed`] trait from
//! `stashhub-core`; this crate provides the process-local implementation
//! that fans row-change events out to any number of subscribers.

pub mod feed;

pub use feed::MemoryChangeFeed;

pub use stashhub_core::traits::feed::{ChangeFeed, FeedSubscription};
