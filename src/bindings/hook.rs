//! Observer binding for imperative call sites.

use std::collections::HashSet;
use std::sync::Arc;

use super::binding::SessionBinding;
use crate::authz::catalog::category_of;
use crate::authz::{AccessRequest, Authorizer, Policy, Role};
use crate::errors::AuthzResult;

/// Immutable view of the session taken at one instant.
///
/// While the binding is uninitialized the snapshot holds no role and no
/// capabilities, and [`is_initialized`](Self::is_initialized) says so.
#[derive(Debug, Clone)]
pub struct PermissionSnapshot {
    role: Option<Role>,
    capabilities: HashSet<String>,
    initialized: bool,
    policy: Arc<Policy>,
}

impl PermissionSnapshot {
    pub fn capture(binding: &SessionBinding) -> Self {
        let session = binding.session();
        let initialized = binding.is_initialized();
        let state = if initialized { session.state() } else { Default::default() };
        Self {
            role: state.role,
            capabilities: state.capabilities,
            initialized,
            policy: Arc::clone(session.policy()),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Held capabilities, sorted.
    pub fn capabilities(&self) -> Vec<&str> {
        let mut capabilities: Vec<&str> = self.capabilities.iter().map(String::as_str).collect();
        capabilities.sort_unstable();
        capabilities
    }

    pub fn capabilities_in_category(&self, category: &str) -> Vec<&str> {
        self.capabilities()
            .into_iter()
            .filter(|c| category_of(c) == category)
            .collect()
    }

    /// Distinct categories across the held capabilities, sorted.
    pub fn available_categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self.capabilities.iter().map(|c| category_of(c)).collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }

    pub fn evaluate(&self, request: &AccessRequest) -> bool {
        request.evaluate(self)
    }

    pub fn describe(&self, capability: &str) -> &str {
        self.policy.describe(capability)
    }
}

impl Authorizer for PermissionSnapshot {
    fn active_role(&self) -> Option<Role> {
        self.role
    }

    fn has(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }

    fn can_access(&self, feature: &str) -> bool {
        self.has_any(self.policy.capabilities_for_feature(feature))
    }
}

/// Hands out fresh snapshots as the identity signal changes.
#[derive(Debug)]
pub struct PermissionsHook {
    binding: SessionBinding,
}

impl PermissionsHook {
    pub fn new(binding: SessionBinding) -> Self {
        Self { binding }
    }

    pub fn binding(&self) -> &SessionBinding {
        &self.binding
    }

    /// Applies any pending signal value, then snapshots.
    pub fn current(&mut self) -> PermissionSnapshot {
        if !self.binding.is_initialized() {
            self.binding.sync();
        }
        PermissionSnapshot::capture(&self.binding)
    }

    /// Waits for the role to change and snapshots the result.
    pub async fn next(&mut self) -> AuthzResult<PermissionSnapshot> {
        self.binding.changed().await?;
        Ok(PermissionSnapshot::capture(&self.binding))
    }

    pub fn into_binding(self) -> SessionBinding {
        self.binding
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authz::{permissions, AuthorizationSession};
    use crate::bindings::signal::identity_channel;

    #[test]
    fn test_uninitialized_snapshot_is_empty() {
        let (_publisher, rx) = identity_channel(Some(Role::ADMIN));
        let session = Arc::new(AuthorizationSession::new(Arc::new(Policy::builtin())));
        session.activate(Role::ADMIN);
        let binding = SessionBinding::new(session, rx);

        let snapshot = PermissionSnapshot::capture(&binding);
        assert!(!snapshot.is_initialized());
        assert!(snapshot.capabilities().is_empty());
        assert!(!snapshot.has(permissions::SYSTEM_MANAGE_SETTINGS));
    }

    #[test]
    fn test_current_syncs_and_lists() {
        let (_publisher, rx) = identity_channel(Some(Role::SUPPORT_STAFF));
        let session = Arc::new(AuthorizationSession::new(Arc::new(Policy::builtin())));
        let mut hook = PermissionsHook::new(SessionBinding::new(session, rx));

        let snapshot = hook.current();
        assert!(snapshot.is_initialized());
        assert!(snapshot.is_support_staff());
        assert_eq!(snapshot.available_categories(), ["calendar", "communication", "finance", "users"]);
        assert_eq!(snapshot.capabilities_in_category("finance"), [permissions::FINANCE_VIEW_FEES]);
        assert!(snapshot.can_access("payments"));
        assert!(!snapshot.evaluate(&AccessRequest::for_feature("reports")));
        assert_eq!(snapshot.describe(permissions::FINANCE_VIEW_FEES), "View fee statements");
    }

    #[test]
    fn test_current_applies_logout_after_store_closed() {
        let (publisher, rx) = identity_channel(Some(Role::ADMIN));
        let session = Arc::new(AuthorizationSession::new(Arc::new(Policy::builtin())));
        let mut hook = PermissionsHook::new(SessionBinding::new(session, rx));
        assert!(hook.current().is_admin());

        publisher.logout();
        drop(publisher);
        let snapshot = hook.current();
        assert!(snapshot.is_initialized());
        assert_eq!(snapshot.role(), None);
        assert!(snapshot.capabilities().is_empty());
    }

    #[tokio::test]
    async fn test_next_follows_role_changes() {
        let (publisher, rx) = identity_channel(None);
        let session = Arc::new(AuthorizationSession::new(Arc::new(Policy::builtin())));
        let mut hook = PermissionsHook::new(SessionBinding::new(session, rx));
        assert_eq!(hook.current().role(), None);

        publisher.login(Role::EDUCATOR);
        let snapshot = hook.next().await.unwrap();
        assert!(snapshot.has(permissions::ACADEMIC_EDIT_GRADES));

        publisher.login(Role::PARENT);
        let snapshot = hook.next().await.unwrap();
        assert!(!snapshot.has(permissions::ACADEMIC_EDIT_GRADES));
        assert!(snapshot.has(permissions::ACADEMIC_VIEW_GRADES));
    }
}
