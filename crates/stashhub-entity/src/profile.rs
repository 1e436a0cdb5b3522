//! User profile entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use stashhub_core::types::UserId;

/// A registered account's profile record.
///
/// Profiles are written by the registration flow (outside this core);
/// the core only reads them, to resolve invitees and display names.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    /// The account ID (same as the auth user ID).
    pub id: UserId,
    /// Registered email, used for share invite lookup (case-insensitive).
    pub email: String,
    /// Full display name, if the user provided one.
    pub full_name: Option<String>,
    /// Phone number, if the user provided one.
    pub phone: Option<String>,
}
