//! Change notifications pushed by the remote store.
//!
//! Events are delivered through the change feed and consumed by the
//! per-scope reconciliation loops in the service layer.

pub mod change;

pub use change::{ChangeEvent, ChangeKind, StoreTable};
