use std::collections::{BTreeSet, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use super::catalog::category_of;
use super::policy::Policy;
use super::roles::{Role, MANAGEMENT_ROLES, SUPPORT_STAFF_ROLES};
use crate::events::{self, EventBus, SessionTransition};

/// Read-only authorization queries.
///
/// Implemented by the live [`AuthorizationSession`] and by the snapshots the
/// hook binding hands out, so the same request evaluation runs against both.
pub trait Authorizer {
    fn active_role(&self) -> Option<Role>;

    fn has(&self, capability: &str) -> bool;

    /// True iff at least one capability is held. Empty input is `false`.
    fn has_any<I>(&self, capabilities: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        capabilities.into_iter().any(|c| self.has(c.as_ref()))
    }

    /// True iff every capability is held. Empty input is vacuously `true`.
    fn has_all<I>(&self, capabilities: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        capabilities.into_iter().all(|c| self.has(c.as_ref()))
    }

    fn can_access(&self, feature: &str) -> bool;

    fn is_role(&self, role: Role) -> bool {
        self.active_role() == Some(role)
    }

    fn is_any_role(&self, roles: &[Role]) -> bool {
        self.active_role().map_or(false, |active| roles.contains(&active))
    }

    fn is_admin(&self) -> bool {
        self.is_role(Role::ADMIN)
    }

    fn is_management(&self) -> bool {
        self.is_any_role(MANAGEMENT_ROLES)
    }

    fn is_educator(&self) -> bool {
        self.is_role(Role::EDUCATOR)
    }

    fn is_parent(&self) -> bool {
        self.is_role(Role::PARENT)
    }

    fn is_student(&self) -> bool {
        self.is_role(Role::STUDENT)
    }

    fn is_support_staff(&self) -> bool {
        self.is_any_role(SUPPORT_STAFF_ROLES)
    }
}

/// Consistent copy of the session's state at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub role: Option<Role>,
    pub capabilities: HashSet<String>,
}

/// Holder of the active role and the capabilities derived from it.
///
/// One writer (the identity signal, through `activate`/`clear`) and many
/// readers. The state sits behind a `RwLock` so every query observes a
/// consistent role/capability pair even when shared across threads.
#[derive(Debug)]
pub struct AuthorizationSession {
    id: Uuid,
    policy: Arc<Policy>,
    state: RwLock<SessionState>,
    event_bus: Option<EventBus>,
}

impl AuthorizationSession {
    /// Creates a session in the unauthenticated state.
    pub fn new(policy: Arc<Policy>) -> Self {
        Self {
            id: Uuid::new_v4(),
            policy,
            state: RwLock::new(SessionState::default()),
            event_bus: None,
        }
    }

    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn policy(&self) -> &Arc<Policy> {
        &self.policy
    }

    /// Makes `role` the active role and re-derives its capabilities.
    ///
    /// A no-op only when `role` is already active; switching roles always
    /// re-derives. Returns whether the state changed.
    pub fn activate(&self, role: Role) -> bool {
        let mut state = self.write();
        if state.role == Some(role) {
            return false;
        }

        if !role.is_known() {
            tracing::debug!(role = %role, "activating unrecognized role");
        }

        let previous = state.role;
        state.role = Some(role);
        state.capabilities = self.policy.capabilities_for_role(role).iter().cloned().collect();
        let count = state.capabilities.len();
        drop(state);

        tracing::info!(
            session = %self.id,
            role = %role,
            previous = ?previous.map(|r| r.to_string()),
            capabilities = count,
            "authorization session activated"
        );
        self.emit(events::SESSION_ACTIVATED, SessionTransition::activated(role, count));
        true
    }

    /// Returns to the unauthenticated state. Safe to call repeatedly.
    pub fn clear(&self) -> bool {
        let mut state = self.write();
        if state.role.is_none() && state.capabilities.is_empty() {
            return false;
        }
        *state = SessionState::default();
        drop(state);

        tracing::info!(session = %self.id, "authorization session cleared");
        self.emit(events::SESSION_CLEARED, SessionTransition::cleared());
        true
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().role.is_some()
    }

    pub fn state(&self) -> SessionState {
        self.read().clone()
    }

    pub fn capabilities(&self) -> BTreeSet<String> {
        self.read().capabilities.iter().cloned().collect()
    }

    pub fn capabilities_in_category(&self, category: &str) -> BTreeSet<String> {
        self.read()
            .capabilities
            .iter()
            .filter(|c| category_of(c) == category)
            .cloned()
            .collect()
    }

    pub fn available_categories(&self) -> BTreeSet<String> {
        self.read()
            .capabilities
            .iter()
            .map(|c| category_of(c).to_string())
            .collect()
    }

    /// Display text for a capability.
    pub fn describe(&self, capability: &str) -> &str {
        self.policy.describe(capability)
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, name: &str, transition: SessionTransition) {
        if let Some(bus) = &self.event_bus {
            events::publish(bus, name, self.id, transition);
        }
    }
}

impl Authorizer for AuthorizationSession {
    fn active_role(&self) -> Option<Role> {
        self.read().role
    }

    fn has(&self, capability: &str) -> bool {
        self.read().capabilities.contains(capability)
    }

    fn has_any<I>(&self, capabilities: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let state = self.read();
        capabilities.into_iter().any(|c| state.capabilities.contains(c.as_ref()))
    }

    fn has_all<I>(&self, capabilities: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let state = self.read();
        capabilities.into_iter().all(|c| state.capabilities.contains(c.as_ref()))
    }

    fn can_access(&self, feature: &str) -> bool {
        self.has_any(self.policy.capabilities_for_feature(feature))
    }
}
