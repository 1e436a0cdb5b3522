//! Identity provider contract and the in-process session holder.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::result::AppResult;
use crate::types::UserId;

/// The authenticated account a session belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// The account ID.
    pub id: UserId,
    /// The registered email address.
    pub email: String,
    /// Display name supplied by the auth provider, if any.
    pub display_name: Option<String>,
}

impl CurrentUser {
    /// Create a user identity without an auth-provided display name.
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            display_name: None,
        }
    }
}

/// Provides the current session identity to every operation.
///
/// Mutating operations require an authenticated actor; they resolve it
/// through this trait on every call rather than caching it, so a session
/// change is picked up immediately.
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// The currently signed-in user, or `None` when no session is active.
    async fn current_user(&self) -> AppResult<Option<CurrentUser>>;

    /// Watch for session establishment and invalidation.
    ///
    /// The receiver yields the new session state whenever it changes;
    /// `None` means the session was signed out or expired.
    fn watch_session(&self) -> watch::Receiver<Option<CurrentUser>>;
}

/// In-process session holder.
///
/// The application shell drives this after its auth flow completes:
/// [`sign_in`](SessionIdentity::sign_in) on login,
/// [`sign_out`](SessionIdentity::sign_out) on logout or session expiry.
/// Consumers observe changes through [`IdentityProvider::watch_session`].
#[derive(Debug)]
pub struct SessionIdentity {
    state: watch::Sender<Option<CurrentUser>>,
}

impl SessionIdentity {
    /// Create a session holder with no active session.
    pub fn new() -> Self {
        let (state, _) = watch::channel(None);
        Self { state }
    }

    /// Establish a session for the given user.
    ///
    /// `send_replace` so the state changes even while nobody watches;
    /// plain `send` refuses to store a value without live receivers.
    pub fn sign_in(&self, user: CurrentUser) {
        self.state.send_replace(Some(user));
    }

    /// Invalidate the current session.
    pub fn sign_out(&self) {
        self.state.send_replace(None);
    }
}

impl Default for SessionIdentity {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for SessionIdentity {
    async fn current_user(&self) -> AppResult<Option<CurrentUser>> {
        Ok(self.state.borrow().clone())
    }

    fn watch_session(&self) -> watch::Receiver<Option<CurrentUser>> {
        self.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let identity = SessionIdentity::new();
        assert!(identity.current_user().await.unwrap().is_none());

        let user = CurrentUser::new(UserId::new(), "alice@example.com");
        identity.sign_in(user.clone());
        assert_eq!(identity.current_user().await.unwrap(), Some(user));

        identity.sign_out();
        assert!(identity.current_user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_session_state_sticks_without_watchers() {
        // No receiver is alive at sign-in time; the state must change anyway.
        let identity = SessionIdentity::new();
        let user = CurrentUser::new(UserId::new(), "carol@example.com");
        identity.sign_in(user.clone());
        assert_eq!(identity.current_user().await.unwrap(), Some(user));

        // A watcher taken afterwards sees the established session.
        let rx = identity.watch_session();
        assert!(rx.borrow().is_some());

        identity.sign_out();
        assert!(identity.current_user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_watch_observes_sign_out() {
        let identity = SessionIdentity::new();
        let mut rx = identity.watch_session();

        identity.sign_in(CurrentUser::new(UserId::new(), "bob@example.com"));
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_some());

        identity.sign_out();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }
}
