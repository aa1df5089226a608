//! Inbound "current role" signal from the identity store.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::authz::Role;

/// Push-based source of the current role. `None` means nobody is logged in.
#[async_trait]
pub trait RoleSignal: Send + Sync {
    /// Latest role, marking it as seen.
    fn observe(&mut self) -> Option<Role>;

    /// Latest role without marking it as seen. Still readable after the
    /// store is gone.
    fn peek(&self) -> Option<Role>;

    /// Waits for the next change. Returns `false` once the store is gone.
    async fn changed(&mut self) -> bool;
}

#[async_trait]
impl RoleSignal for watch::Receiver<Option<Role>> {
    fn observe(&mut self) -> Option<Role> {
        *self.borrow_and_update()
    }

    fn peek(&self) -> Option<Role> {
        *self.borrow()
    }

    async fn changed(&mut self) -> bool {
        watch::Receiver::changed(self).await.is_ok()
    }
}

/// Write side of the identity channel, held by whatever owns login state.
#[derive(Debug)]
pub struct IdentityPublisher {
    tx: watch::Sender<Option<Role>>,
}

pub fn identity_channel(initial: Option<Role>) -> (IdentityPublisher, watch::Receiver<Option<Role>>) {
    let (tx, rx) = watch::channel(initial);
    (IdentityPublisher { tx }, rx)
}

impl IdentityPublisher {
    pub fn login(&self, role: Role) {
        self.set(Some(role));
    }

    pub fn logout(&self) {
        self.set(None);
    }

    /// Publishes `role`; subscribers are only woken when the value differs.
    pub fn set(&self, role: Option<Role>) {
        self.tx.send_if_modified(|current| {
            if *current == role {
                return false;
            }
            *current = role;
            true
        });
    }

    pub fn current(&self) -> Option<Role> {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Role>> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unchanged_value_does_not_notify() {
        let (publisher, mut rx) = identity_channel(None);
        publisher.logout();
        assert!(!rx.has_changed().unwrap());

        publisher.login(Role::PARENT);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.peek(), Some(Role::PARENT));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.observe(), Some(Role::PARENT));
        assert!(!rx.has_changed().unwrap());

        publisher.login(Role::PARENT);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_peek_survives_closed_store() {
        let (publisher, rx) = identity_channel(Some(Role::ADMIN));
        publisher.logout();
        drop(publisher);
        assert_eq!(rx.peek(), None);
    }

    #[tokio::test]
    async fn test_changed_reports_closed_store() {
        let (publisher, mut rx) = identity_channel(Some(Role::STUDENT));
        drop(publisher);
        assert!(!RoleSignal::changed(&mut rx).await);
    }
}
