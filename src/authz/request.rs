use super::catalog::validate_capability;
use super::roles::Role;
use super::session::Authorizer;
use crate::errors::AuthzResult;

/// What a gate, decorator or hook call asks for.
///
/// At most one criterion is expected. If several are set, the first in
/// this order decides: role set, feature, single capability, capability
/// list. A request with no criterion is denied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessRequest {
    roles: Option<Vec<Role>>,
    feature: Option<String>,
    permission: Option<String>,
    permissions: Option<Vec<String>>,
    require_all: bool,
    inverse: bool,
}

impl AccessRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self::new().with_roles(roles)
    }

    pub fn for_feature(feature: impl Into<String>) -> Self {
        Self::new().with_feature(feature)
    }

    pub fn for_permission(capability: impl Into<String>) -> Self {
        Self::new().with_permission(capability)
    }

    pub fn for_any<I, S>(capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new().with_permissions(capabilities, false)
    }

    pub fn for_all<I, S>(capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new().with_permissions(capabilities, true)
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles = Some(roles.into_iter().collect());
        self
    }

    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.feature = Some(feature.into());
        self
    }

    pub fn with_permission(mut self, capability: impl Into<String>) -> Self {
        self.permission = Some(capability.into());
        self
    }

    pub fn with_permissions<I, S>(mut self, capabilities: I, require_all: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = Some(capabilities.into_iter().map(Into::into).collect());
        self.require_all = require_all;
        self
    }

    /// Negates the final decision, for content shown only to users who
    /// lack access.
    pub fn inverted(mut self) -> Self {
        self.inverse = !self.inverse;
        self
    }

    pub fn is_inverse(&self) -> bool {
        self.inverse
    }

    /// Rejects malformed capability strings. Called when a binding is set up,
    /// so configuration mistakes surface before anything renders.
    pub fn validate(&self) -> AuthzResult<()> {
        if let Some(capability) = &self.permission {
            validate_capability(capability)?;
        }
        for capability in self.permissions.iter().flatten() {
            validate_capability(capability)?;
        }
        Ok(())
    }

    /// The decision before `inverse` is applied.
    pub fn decide(&self, authz: &impl Authorizer) -> bool {
        if let Some(roles) = &self.roles {
            return authz.is_any_role(roles);
        }
        if let Some(feature) = &self.feature {
            return authz.can_access(feature);
        }
        if let Some(capability) = &self.permission {
            return authz.has(capability);
        }
        if let Some(capabilities) = &self.permissions {
            return if self.require_all {
                authz.has_all(capabilities)
            } else {
                authz.has_any(capabilities)
            };
        }
        false
    }

    /// The decision bindings act on.
    pub fn evaluate(&self, authz: &impl Authorizer) -> bool {
        let granted = self.decide(authz);
        let decision = granted != self.inverse;
        tracing::debug!(
            role = ?authz.active_role().map(|r| r.to_string()),
            request = %self,
            granted,
            inverse = self.inverse,
            decision,
            "access request evaluated"
        );
        decision
    }
}

impl std::fmt::Display for AccessRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.inverse {
            f.write_str("not ")?;
        }
        if let Some(roles) = &self.roles {
            let names: Vec<String> = roles.iter().map(Role::to_string).collect();
            return write!(f, "roles[{}]", names.join(","));
        }
        if let Some(feature) = &self.feature {
            return write!(f, "feature:{feature}");
        }
        if let Some(capability) = &self.permission {
            return write!(f, "permission:{capability}");
        }
        if let Some(capabilities) = &self.permissions {
            let mode = if self.require_all { "all" } else { "any" };
            return write!(f, "{mode}[{}]", capabilities.join(","));
        }
        f.write_str("nothing")
    }
}
