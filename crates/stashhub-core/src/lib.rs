//! # stashhub-core
//!
//! Core crate for StashHub. Contains collaborator traits, configuration
//! schemas, typed identifiers, change-feed event types, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other StashHub crates.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
