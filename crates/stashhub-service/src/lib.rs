//! # stashhub-service
//!
//! Business logic for the StashHub sync core. Each service orchestrates
//! repositories, the shared inventory cache, and the session identity to
//! implement application-level use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod activity;
pub mod environment;
pub mod inventory;
pub mod notification;
pub mod reconcile;
pub mod search;
pub mod session;
pub mod share;

pub use activity::{ActivityLogger, ActorNameCache};
pub use environment::EnvironmentService;
pub use inventory::{CachedContainer, InventoryCache, InventoryService};
pub use notification::NotificationService;
pub use reconcile::{ReconcileScope, Reconciler, ReconcilerHandle};
pub use search::{SearchHit, SearchMode, SearchService};
pub use share::{InviteOutcome, ShareService};
