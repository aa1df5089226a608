use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AuthzError;

/// Organizational role reported by the identity store.
///
/// Roles are opaque integers. Ids outside the well-known set are valid
/// values; they simply resolve to an empty capability set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(pub i32);

impl Role {
    pub const PARENT: Role = Role(1);
    pub const EDUCATOR: Role = Role(2);
    pub const SENIOR_MANAGEMENT: Role = Role(3);
    pub const PRINCIPAL: Role = Role(4);
    pub const MANAGEMENT: Role = Role(5);
    pub const ADMIN: Role = Role(6);
    pub const STUDENT: Role = Role(7);
    pub const SENIOR_SUPPORT_STAFF: Role = Role(8);
    pub const SUPPORT_STAFF: Role = Role(9);

    /// Every role the built-in matrix knows about, in id order.
    pub const KNOWN: &'static [Role] = &[
        Role::PARENT,
        Role::EDUCATOR,
        Role::SENIOR_MANAGEMENT,
        Role::PRINCIPAL,
        Role::MANAGEMENT,
        Role::ADMIN,
        Role::STUDENT,
        Role::SENIOR_SUPPORT_STAFF,
        Role::SUPPORT_STAFF,
    ];

    pub fn id(self) -> i32 {
        self.0
    }

    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Role::PARENT => "parent",
            Role::EDUCATOR => "educator",
            Role::SENIOR_MANAGEMENT => "senior_management",
            Role::PRINCIPAL => "principal",
            Role::MANAGEMENT => "management",
            Role::ADMIN => "admin",
            Role::STUDENT => "student",
            Role::SENIOR_SUPPORT_STAFF => "senior_support_staff",
            Role::SUPPORT_STAFF => "support_staff",
            _ => return None,
        };
        Some(name)
    }

    pub fn is_known(self) -> bool {
        self.name().is_some()
    }
}

/// Roles treated as management. This is a fixed membership list, not
/// something inferred from the capabilities a role holds.
pub const MANAGEMENT_ROLES: &[Role] = &[
    Role::SENIOR_MANAGEMENT,
    Role::PRINCIPAL,
    Role::MANAGEMENT,
    Role::ADMIN,
];

pub const SUPPORT_STAFF_ROLES: &[Role] = &[Role::SENIOR_SUPPORT_STAFF, Role::SUPPORT_STAFF];

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "role#{}", self.0),
        }
    }
}

impl FromStr for Role {
    type Err = AuthzError;

    /// Accepts a role name (`"parent"`, `"senior-management"`) or a numeric id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(id) = trimmed.parse::<i32>() {
            return Ok(Role(id));
        }

        let normalized = trimmed.to_ascii_lowercase().replace('-', "_");
        Role::KNOWN
            .iter()
            .copied()
            .find(|role| role.name() == Some(normalized.as_str()))
            .ok_or_else(|| AuthzError::configuration(format!("unknown role name {trimmed:?}")))
    }
}
