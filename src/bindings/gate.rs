use super::binding::SessionBinding;
use crate::authz::AccessRequest;
use crate::errors::AuthzResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The session has not caught up with the identity signal yet.
    Pending,
    Granted,
    Denied,
}

impl Decision {
    pub fn is_granted(self) -> bool {
        self == Decision::Granted
    }
}

/// Declarative gate: renders its children only when the request passes.
///
/// Nothing is rendered, in either branch, while the binding is
/// uninitialized.
#[derive(Debug, Clone)]
pub struct Gate {
    request: AccessRequest,
}

impl Gate {
    pub fn new(request: AccessRequest) -> AuthzResult<Self> {
        request.validate()?;
        Ok(Self { request })
    }

    pub fn request(&self) -> &AccessRequest {
        &self.request
    }

    pub fn decide(&self, binding: &SessionBinding) -> Decision {
        if !binding.is_initialized() {
            return Decision::Pending;
        }
        if self.request.evaluate(&**binding.session()) {
            Decision::Granted
        } else {
            Decision::Denied
        }
    }

    /// Renders `children` when granted; `None` means render nothing.
    pub fn render<T>(&self, binding: &SessionBinding, children: impl FnOnce() -> T) -> Option<T> {
        match self.decide(binding) {
            Decision::Granted => Some(children()),
            Decision::Pending | Decision::Denied => None,
        }
    }

    pub fn render_or<T>(
        &self,
        binding: &SessionBinding,
        children: impl FnOnce() -> T,
        fallback: impl FnOnce() -> T,
    ) -> Option<T> {
        match self.decide(binding) {
            Decision::Pending => None,
            Decision::Granted => Some(children()),
            Decision::Denied => Some(fallback()),
        }
    }
}
