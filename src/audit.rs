//! Per-role permission audit, for review screens and the CLI.

use serde::Serialize;

use crate::authz::catalog::category_of;
use crate::authz::{Policy, Role};

#[derive(Debug, Clone, Serialize)]
pub struct RoleAudit {
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,
    pub policy_fingerprint: String,
    pub capability_count: usize,
    pub categories: Vec<CategoryAudit>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryAudit {
    pub category: String,
    pub capabilities: Vec<CapabilityAudit>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CapabilityAudit {
    pub capability: String,
    pub description: String,
}

impl RoleAudit {
    pub fn for_role(policy: &Policy, role: Role) -> Self {
        let granted = policy.capabilities_for_role(role);
        let mut categories: Vec<CategoryAudit> = Vec::new();

        // BTreeSet order keeps each category's entries contiguous.
        for capability in granted {
            let category = category_of(capability);
            let entry = CapabilityAudit {
                capability: capability.clone(),
                description: policy.describe(capability).to_string(),
            };
            match categories.last_mut() {
                Some(last) if last.category == category => last.capabilities.push(entry),
                _ => categories.push(CategoryAudit {
                    category: category.to_string(),
                    capabilities: vec![entry],
                }),
            }
        }

        Self {
            role,
            role_name: role.name().map(str::to_string),
            policy_fingerprint: policy.fingerprint(),
            capability_count: granted.len(),
            categories,
        }
    }
}
