//! Session helpers shared across services.

use stashhub_core::AppError;
use stashhub_core::result::AppResult;
use stashhub_core::traits::identity::{CurrentUser, IdentityProvider};

/// Resolve the signed-in user, failing with `Authentication` when no
/// session is active. Mutating operations call this on every invocation
/// so a session change takes effect immediately.
pub async fn require_user(identity: &dyn IdentityProvider) -> AppResult<CurrentUser> {
    identity
        .current_user()
        .await?
        .ok_or_else(|| AppError::authentication("No active session"))
}

pub(crate) const UNKNOWN_USER: &str = "unknown user";

/// User-facing name from the session identity alone: the auth-provided
/// display name, then the email local part, then a fixed placeholder.
/// Callers with profile access try the profile full name before this.
pub(crate) fn fallback_display_name(user: &CurrentUser) -> String {
    if let Some(name) = user
        .display_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
    {
        return name.to_string();
    }
    match user.email.split('@').next().map(str::trim) {
        Some(local) if !local.is_empty() => local.to_string(),
        _ => UNKNOWN_USER.to_string(),
    }
}
