//! Environment sharing: invites, acceptance, and revocation.

pub mod service;

pub use service::{InviteOutcome, ShareService};
