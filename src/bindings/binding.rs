use std::sync::Arc;

use super::signal::RoleSignal;
use crate::authz::{AuthorizationSession, Role};
use crate::errors::{AuthzError, AuthzResult};

/// Connects the identity signal to an [`AuthorizationSession`].
///
/// The binding is uninitialized until its first [`sync`](Self::sync) and
/// again whenever the signal carries a value other than the one last
/// applied, including after the identity store has gone away. Gates treat
/// that state as "not known yet" rather than "known to have nothing".
pub struct SessionBinding {
    session: Arc<AuthorizationSession>,
    signal: Box<dyn RoleSignal>,
    // `None` until the first sync; `Some(None)` once a logout was applied.
    applied: Option<Option<Role>>,
}

impl SessionBinding {
    pub fn new(session: Arc<AuthorizationSession>, signal: impl RoleSignal + 'static) -> Self {
        Self {
            session,
            signal: Box::new(signal),
            applied: None,
        }
    }

    pub fn session(&self) -> &Arc<AuthorizationSession> {
        &self.session
    }

    pub fn is_initialized(&self) -> bool {
        self.applied == Some(self.signal.peek())
    }

    /// Applies the latest signal value to the session.
    pub fn sync(&mut self) -> Option<Role> {
        let role = self.signal.observe();
        match role {
            Some(role) => {
                self.session.activate(role);
            }
            None => {
                self.session.clear();
            }
        }
        self.applied = Some(role);
        role
    }

    /// Waits for the next signal change and applies it.
    pub async fn changed(&mut self) -> AuthzResult<Option<Role>> {
        if !self.signal.changed().await {
            return Err(AuthzError::SignalClosed);
        }
        Ok(self.sync())
    }

    /// Keeps the session in step with the signal until the identity store
    /// goes away. For hosts that query the session directly.
    pub async fn drive(mut self) {
        self.sync();
        while self.changed().await.is_ok() {}
        tracing::debug!(session = %self.session.id(), "identity signal closed, binding stopped");
    }
}

impl std::fmt::Debug for SessionBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionBinding")
            .field("session", &self.session.id())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authz::{Authorizer, Policy};
    use crate::bindings::signal::identity_channel;

    #[test]
    fn test_initialization_tracks_signal() {
        let (publisher, rx) = identity_channel(None);
        let session = Arc::new(AuthorizationSession::new(Arc::new(Policy::builtin())));
        let mut binding = SessionBinding::new(session.clone(), rx);

        assert!(!binding.is_initialized());
        assert_eq!(binding.sync(), None);
        assert!(binding.is_initialized());

        publisher.login(Role::EDUCATOR);
        assert!(!binding.is_initialized());
        assert_eq!(session.active_role(), None);

        binding.sync();
        assert!(binding.is_initialized());
        assert!(session.is_educator());
    }

    #[tokio::test]
    async fn test_changed_applies_logout() {
        let (publisher, rx) = identity_channel(Some(Role::ADMIN));
        let session = Arc::new(AuthorizationSession::new(Arc::new(Policy::builtin())));
        let mut binding = SessionBinding::new(session.clone(), rx);
        binding.sync();
        assert!(session.is_admin());

        publisher.logout();
        assert_eq!(binding.changed().await.unwrap(), None);
        assert!(!session.is_authenticated());

        drop(publisher);
        assert!(matches!(binding.changed().await, Err(AuthzError::SignalClosed)));
    }

    #[test]
    fn test_logout_then_closed_store_is_not_initialized() {
        let (publisher, rx) = identity_channel(Some(Role::ADMIN));
        let session = Arc::new(AuthorizationSession::new(Arc::new(Policy::builtin())));
        let mut binding = SessionBinding::new(session.clone(), rx);
        binding.sync();
        assert!(binding.is_initialized());

        publisher.logout();
        drop(publisher);
        assert!(!binding.is_initialized());
        assert!(session.is_admin());

        assert_eq!(binding.sync(), None);
        assert!(binding.is_initialized());
        assert!(!session.is_authenticated());
    }
}
