pub mod audit;
pub mod authz;
pub mod bindings;
pub mod config;
pub mod errors;
pub mod events;

pub use authz::{AccessRequest, AuthorizationSession, Authorizer, Policy, Role};
pub use errors::{AuthzError, AuthzResult};
