//! # stashhub-database
//!
//! Relational store access for StashHub. Defines one repository trait per
//! remote table plus two backends: PostgreSQL (sqlx) and an in-memory
//! store for tests and offline use. Services depend only on the traits.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
