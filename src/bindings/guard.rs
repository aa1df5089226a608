//! Wrapping decorator: puts a component behind an access request.

use super::binding::SessionBinding;
use crate::authz::AccessRequest;
use crate::errors::AuthzResult;

pub const DEFAULT_ACCESS_DENIED_TEXT: &str = "Access denied";
pub const DEFAULT_LOADING_TEXT: &str = "Loading...";

/// A unit of UI that can be wrapped.
pub trait Component {
    type Output;

    fn render(&self) -> Self::Output;
}

impl<F, T> Component for F
where
    F: Fn() -> T,
{
    type Output = T;

    fn render(&self) -> T {
        self()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
    Loading(String),
    AccessDenied(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered<T> {
    View(T),
    Placeholder(Placeholder),
    Nothing,
}

/// What to show instead of the wrapped component.
pub enum Fallback<T> {
    /// The neutral loading or access-denied placeholder.
    Placeholder,
    Nothing,
    View(Box<dyn Fn() -> T + Send + Sync>),
}

impl<T> Default for Fallback<T> {
    fn default() -> Self {
        Fallback::Placeholder
    }
}

impl<T> Fallback<T> {
    pub fn view(render: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Fallback::View(Box::new(render))
    }
}

impl<T> std::fmt::Debug for Fallback<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Fallback::Placeholder => f.write_str("Placeholder"),
            Fallback::Nothing => f.write_str("Nothing"),
            Fallback::View(_) => f.write_str("View(..)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderText {
    pub access_denied: String,
    pub loading: String,
}

impl Default for PlaceholderText {
    fn default() -> Self {
        Self {
            access_denied: DEFAULT_ACCESS_DENIED_TEXT.to_string(),
            loading: DEFAULT_LOADING_TEXT.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct Guarded<C: Component> {
    inner: C,
    request: AccessRequest,
    denied: Fallback<C::Output>,
    loading: Fallback<C::Output>,
    text: PlaceholderText,
}

/// Wraps `component` behind `request`. Fails on malformed capabilities.
pub fn guard<C: Component>(component: C, request: AccessRequest) -> AuthzResult<Guarded<C>> {
    Guarded::new(component, request)
}

impl<C: Component> Guarded<C> {
    pub fn new(inner: C, request: AccessRequest) -> AuthzResult<Self> {
        request.validate()?;
        Ok(Self {
            inner,
            request,
            denied: Fallback::default(),
            loading: Fallback::default(),
            text: PlaceholderText::default(),
        })
    }

    pub fn with_fallback(mut self, fallback: Fallback<C::Output>) -> Self {
        self.denied = fallback;
        self
    }

    pub fn with_loading(mut self, loading: Fallback<C::Output>) -> Self {
        self.loading = loading;
        self
    }

    pub fn with_placeholder_text(mut self, text: PlaceholderText) -> Self {
        self.text = text;
        self
    }

    pub fn render(&self, binding: &SessionBinding) -> Rendered<C::Output> {
        if !binding.is_initialized() {
            return self.fall_back(&self.loading, Placeholder::Loading(self.text.loading.clone()));
        }
        if self.request.evaluate(&**binding.session()) {
            Rendered::View(self.inner.render())
        } else {
            self.fall_back(
                &self.denied,
                Placeholder::AccessDenied(self.text.access_denied.clone()),
            )
        }
    }

    fn fall_back(&self, fallback: &Fallback<C::Output>, placeholder: Placeholder) -> Rendered<C::Output> {
        match fallback {
            Fallback::Placeholder => Rendered::Placeholder(placeholder),
            Fallback::Nothing => Rendered::Nothing,
            Fallback::View(render) => Rendered::View(render()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::authz::{AuthorizationSession, Policy, Role};
    use crate::bindings::signal::identity_channel;

    fn bound(role: Option<Role>) -> SessionBinding {
        let (_publisher, rx) = identity_channel(role);
        let session = Arc::new(AuthorizationSession::new(Arc::new(Policy::builtin())));
        SessionBinding::new(session, rx)
    }

    #[test]
    fn test_loading_then_view() {
        let mut binding = bound(Some(Role::ADMIN));
        let settings = guard(|| "settings", AccessRequest::for_feature("system_settings")).unwrap();

        assert_eq!(
            settings.render(&binding),
            Rendered::Placeholder(Placeholder::Loading(DEFAULT_LOADING_TEXT.to_string()))
        );
        binding.sync();
        assert_eq!(settings.render(&binding), Rendered::View("settings"));
    }

    #[test]
    fn test_denied_fallbacks() {
        let mut binding = bound(Some(Role::STUDENT));
        binding.sync();
        let request = AccessRequest::for_feature("user_management");

        let default = guard(|| 1, request.clone()).unwrap();
        assert_eq!(
            default.render(&binding),
            Rendered::Placeholder(Placeholder::AccessDenied(DEFAULT_ACCESS_DENIED_TEXT.to_string()))
        );

        let silent = guard(|| 1, request.clone()).unwrap().with_fallback(Fallback::Nothing);
        assert_eq!(silent.render(&binding), Rendered::Nothing);

        let custom = guard(|| 1, request).unwrap().with_fallback(Fallback::view(|| 0));
        assert_eq!(custom.render(&binding), Rendered::View(0));
    }

    #[test]
    fn test_loading_fallbacks() {
        let binding = bound(Some(Role::EDUCATOR));
        let request = AccessRequest::for_feature("grades");

        let silent = guard(|| 1, request.clone()).unwrap().with_loading(Fallback::Nothing);
        assert_eq!(silent.render(&binding), Rendered::Nothing);

        let spinner = guard(|| 1, request)
            .unwrap()
            .with_fallback(Fallback::Nothing)
            .with_loading(Fallback::view(|| -1));
        assert_eq!(spinner.render(&binding), Rendered::View(-1));
    }

    #[test]
    fn test_inverse_shows_upsell() {
        let mut binding = bound(Some(Role::PARENT));
        binding.sync();
        let upsell = guard(
            || "ask the school office for report access",
            AccessRequest::for_permission(crate::authz::permissions::REPORTS_VIEW_SCHOOL_REPORTS).inverted(),
        )
        .unwrap();
        assert!(matches!(upsell.render(&binding), Rendered::View(_)));
    }

    #[test]
    fn test_custom_placeholder_text() {
        let binding = bound(None);
        let text = PlaceholderText {
            access_denied: "Nope".to_string(),
            loading: "Hold on".to_string(),
        };
        let wrapped = guard(|| (), AccessRequest::for_roles([Role::ADMIN]))
            .unwrap()
            .with_placeholder_text(text);
        assert_eq!(
            wrapped.render(&binding),
            Rendered::Placeholder(Placeholder::Loading("Hold on".to_string()))
        );
    }
}
