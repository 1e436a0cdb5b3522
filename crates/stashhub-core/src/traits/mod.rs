//! Collaborator contracts the core depends on.
//!
//! The synchronization core talks to three external collaborators: the
//! identity provider, the relational store (repository traits live beside
//! their entities in `stashhub-database`), and the change feed. Concrete
//! backends are injected at construction time.

pub mod feed;
pub mod identity;

pub use feed::{ChangeFeed, FeedSubscription};
pub use identity::{CurrentUser, IdentityProvider, SessionIdentity};
