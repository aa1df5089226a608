//! Authorization engine - capability catalog, role matrix and session
//!
//! This module implements the role-based capability model with support for:
//! - A closed catalog of `"<category>.<action>"` capabilities
//! - A static role -> capability matrix (administrator holds the catalog)
//! - Feature names that unlock on any one of their capabilities
//! - A session holding the active role and answering queries over it

pub mod catalog;
mod descriptions;
mod features;
mod matrix;
mod policy;
mod request;
mod roles;
mod session;

pub use catalog::{derive_category, validate_capability, Catalog};
pub use descriptions::{Descriptions, UNDESCRIBED};
pub use features::FeatureMap;
pub use matrix::RoleMatrix;
pub use policy::{GrantSpec, Policy, PolicyDocument, GRANT_ALL};
pub use request::AccessRequest;
pub use roles::{Role, MANAGEMENT_ROLES, SUPPORT_STAFF_ROLES};
pub use session::{AuthorizationSession, Authorizer, SessionState};

/// Capability constants, e.g. `permissions::ACADEMIC_VIEW_GRADES`.
pub use catalog as permissions;
