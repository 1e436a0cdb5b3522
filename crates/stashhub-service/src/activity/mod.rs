//! Append-only activity history for shared environments.

pub mod logger;
pub mod name_cache;

pub use logger::ActivityLogger;
pub use name_cache::ActorNameCache;
