//! Bindings between the authorization session and a rendering layer.
//!
//! All three shapes (gate, decorator, hook) run the same
//! [`AccessRequest`](crate::authz::AccessRequest) evaluation and never
//! hold policy of their own.

mod binding;
mod gate;
mod guard;
mod hook;
mod signal;

pub use binding::SessionBinding;
pub use gate::{Decision, Gate};
pub use guard::{
    guard, Component, Fallback, Guarded, Placeholder, PlaceholderText, Rendered, DEFAULT_ACCESS_DENIED_TEXT,
    DEFAULT_LOADING_TEXT,
};
pub use hook::{PermissionSnapshot, PermissionsHook};
pub use signal::{identity_channel, IdentityPublisher, RoleSignal};
