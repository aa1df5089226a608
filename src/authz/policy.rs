//! Complete authorization policy: catalog, role matrix, feature map and
//! descriptions, validated together.
//!
//! Policies are built once at startup. Every check in [`Policy::validate`]
//! is a configuration defect, so loading fails instead of deferring the
//! problem to query time.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::catalog::{validate_capability, Catalog};
use super::descriptions::Descriptions;
use super::features::FeatureMap;
use super::matrix::RoleMatrix;
use super::roles::Role;
use crate::errors::{AuthzError, AuthzResult};

/// Grant marker meaning "the whole catalog".
pub const GRANT_ALL: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    catalog: Catalog,
    matrix: RoleMatrix,
    features: FeatureMap,
    descriptions: Descriptions,
}

impl Policy {
    pub fn builtin() -> Self {
        let catalog = Catalog::builtin();
        let matrix = RoleMatrix::builtin(&catalog);
        Self {
            catalog,
            matrix,
            features: FeatureMap::builtin(),
            descriptions: Descriptions::builtin(),
        }
    }

    pub fn new(
        catalog: Catalog,
        matrix: RoleMatrix,
        features: FeatureMap,
        descriptions: Descriptions,
    ) -> AuthzResult<Self> {
        let policy = Self {
            catalog,
            matrix,
            features,
            descriptions,
        };
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> AuthzResult<()> {
        for (role, capabilities) in self.matrix.iter() {
            for capability in capabilities {
                self.require_known(capability, || format!("role {role}"))?;
            }
        }

        for (feature, capabilities) in self.features.iter() {
            if capabilities.is_empty() {
                return Err(AuthzError::EmptyFeature(feature.to_string()));
            }
            for capability in capabilities {
                self.require_known(capability, || format!("feature {feature:?}"))?;
            }
        }

        let admin = self.matrix.capabilities_for_role(Role::ADMIN);
        let missing: Vec<String> = self
            .catalog
            .iter()
            .filter(|c| !admin.contains(*c))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(AuthzError::IncompleteAdministrator { missing });
        }

        Ok(())
    }

    fn require_known(&self, capability: &str, referenced_by: impl FnOnce() -> String) -> AuthzResult<()> {
        validate_capability(capability)?;
        if !self.catalog.contains(capability) {
            return Err(AuthzError::unknown_capability(capability, referenced_by()));
        }
        Ok(())
    }

    pub fn from_json(text: &str) -> AuthzResult<Self> {
        let de = &mut serde_json::Deserializer::from_str(text);
        let document: PolicyDocument = serde_path_to_error::deserialize(de)?;
        Self::from_document(document)
    }

    pub fn load(path: impl AsRef<Path>) -> AuthzResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| AuthzError::io(path, err))?;
        let policy = Self::from_json(&text)?;
        tracing::info!(
            path = %path.display(),
            capabilities = policy.catalog.len(),
            fingerprint = %policy.fingerprint(),
            "loaded authorization policy"
        );
        Ok(policy)
    }

    pub fn from_document(document: PolicyDocument) -> AuthzResult<Self> {
        let catalog = match document.catalog {
            Some(entries) => Catalog::from_entries(entries)?,
            None => Catalog::builtin(),
        };

        let mut matrix = RoleMatrix::new();
        for (id, grant) in document.roles {
            let role = Role(id);
            matrix = match grant {
                GrantSpec::Everything(marker) if marker == GRANT_ALL => matrix.with_grant(role, catalog.iter()),
                GrantSpec::Everything(other) => {
                    return Err(AuthzError::configuration(format!(
                        "role {role}: expected a capability list or {GRANT_ALL:?}, got {other:?}"
                    )))
                }
                GrantSpec::Explicit(capabilities) => matrix.with_grant(role, capabilities),
            };
        }

        let features = document
            .features
            .into_iter()
            .fold(FeatureMap::new(), |map, (name, caps)| map.with_feature(name, caps));

        let mut descriptions = Descriptions::builtin();
        for (capability, text) in document.descriptions {
            descriptions.insert(capability, text);
        }

        Self::new(catalog, matrix, features, descriptions)
    }

    /// Renders the policy in the on-disk format. The administrator is
    /// written as the `"*"` marker.
    pub fn to_document(&self) -> PolicyDocument {
        let roles = self
            .matrix
            .iter()
            .map(|(role, capabilities)| {
                let grant = if role == Role::ADMIN {
                    GrantSpec::Everything(GRANT_ALL.to_string())
                } else {
                    GrantSpec::Explicit(capabilities.iter().cloned().collect())
                };
                (role.id(), grant)
            })
            .collect();

        PolicyDocument {
            catalog: Some(self.catalog.iter().map(str::to_string).collect()),
            roles,
            features: self
                .features
                .iter()
                .map(|(name, caps)| (name.to_string(), caps.iter().cloned().collect()))
                .collect(),
            descriptions: self
                .descriptions
                .iter()
                .filter(|(capability, _)| self.catalog.contains(capability))
                .map(|(capability, text)| (capability.to_string(), text.to_string()))
                .collect(),
        }
    }

    /// Hex SHA-256 over a canonical rendering of catalog, matrix and
    /// features. Descriptions are display-only and excluded.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for capability in self.catalog.iter() {
            hasher.update(format!("catalog:{capability}\n").as_bytes());
        }
        for (role, capabilities) in self.matrix.iter() {
            for capability in capabilities {
                hasher.update(format!("role:{}:{capability}\n", role.id()).as_bytes());
            }
        }
        for (feature, capabilities) in self.features.iter() {
            for capability in capabilities {
                hasher.update(format!("feature:{feature}:{capability}\n").as_bytes());
            }
        }
        hex::encode(hasher.finalize())
    }

    /// Catalog entries that fall back to the placeholder description.
    pub fn undocumented(&self) -> Vec<&str> {
        self.catalog
            .iter()
            .filter(|c| !self.descriptions.contains(c))
            .collect()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn matrix(&self) -> &RoleMatrix {
        &self.matrix
    }

    pub fn features(&self) -> &FeatureMap {
        &self.features
    }

    pub fn capabilities_for_role(&self, role: Role) -> &BTreeSet<String> {
        self.matrix.capabilities_for_role(role)
    }

    pub fn capabilities_for_feature(&self, feature: &str) -> &BTreeSet<String> {
        self.features.capabilities_for_feature(feature)
    }

    pub fn describe(&self, capability: &str) -> &str {
        self.descriptions.describe(capability)
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::builtin()
    }
}

/// On-disk policy format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyDocument {
    /// Omitted means the built-in catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<Vec<String>>,
    pub roles: BTreeMap<i32, GrantSpec>,
    #[serde(default)]
    pub features: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub descriptions: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GrantSpec {
    Everything(String),
    Explicit(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authz::catalog as cap;

    #[test]
    fn test_builtin_policy_is_valid() {
        Policy::builtin().validate().unwrap();
        assert!(Policy::builtin().undocumented().is_empty());
    }

    #[test]
    fn test_dangling_feature_reference_is_rejected() {
        let catalog = Catalog::builtin();
        let matrix = RoleMatrix::builtin(&catalog);
        let features = FeatureMap::builtin().with_feature("broken", ["academic.teleport"]);
        let err = Policy::new(catalog, matrix, features, Descriptions::builtin()).unwrap_err();
        assert!(matches!(err, AuthzError::UnknownCapability { ref capability, .. } if capability == "academic.teleport"));
    }

    #[test]
    fn test_incomplete_admin_is_rejected() {
        let catalog = Catalog::builtin();
        let matrix = RoleMatrix::new().with_grant(Role::ADMIN, [cap::SYSTEM_MANAGE_SETTINGS]);
        let err = Policy::new(catalog, matrix, FeatureMap::new(), Descriptions::builtin()).unwrap_err();
        match err {
            AuthzError::IncompleteAdministrator { missing } => assert_eq!(missing.len(), cap::ALL.len() - 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_document_round_trip_keeps_fingerprint() {
        let policy = Policy::builtin();
        let json = serde_json::to_string(&policy.to_document()).unwrap();
        let reloaded = Policy::from_json(&json).unwrap();
        assert_eq!(reloaded.fingerprint(), policy.fingerprint());
        assert_eq!(reloaded, policy);
    }

    #[test]
    fn test_fingerprint_changes_with_grants() {
        let catalog = Catalog::builtin();
        let matrix = RoleMatrix::builtin(&catalog).with_grant(Role::PARENT, [cap::ACADEMIC_EDIT_GRADES]);
        let changed = Policy::new(catalog, matrix, FeatureMap::builtin(), Descriptions::builtin()).unwrap();
        assert_ne!(changed.fingerprint(), Policy::builtin().fingerprint());
    }
}
