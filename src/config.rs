use std::path::PathBuf;

use crate::authz::Policy;
use crate::bindings::PlaceholderText;
use crate::errors::AuthzResult;

/// Runtime configuration read from the environment (and `.env`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthzConfig {
    /// JSON policy replacing the built-in one.
    pub policy_path: Option<PathBuf>,
    pub placeholders: PlaceholderText,
}

impl AuthzConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = PlaceholderText::default();

        Self {
            policy_path: non_empty("AUTHZ_POLICY_PATH").map(PathBuf::from),
            placeholders: PlaceholderText {
                access_denied: non_empty("AUTHZ_DENIED_TEXT").unwrap_or(defaults.access_denied),
                loading: non_empty("AUTHZ_LOADING_TEXT").unwrap_or(defaults.loading),
            },
        }
    }

    /// The configured policy file, or the built-in policy. Invalid files
    /// are an error; callers should abort startup on it.
    pub fn load_policy(&self) -> AuthzResult<Policy> {
        match &self.policy_path {
            Some(path) => Policy::load(path),
            None => Ok(Policy::builtin()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let config = AuthzConfig::from_lookup(|_| None);
        assert_eq!(config, AuthzConfig::default());
        assert_eq!(config.load_policy().unwrap(), Policy::builtin());
    }

    #[test]
    fn test_reads_overrides_and_ignores_blank() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("AUTHZ_POLICY_PATH", "/etc/campus/policy.json"),
            ("AUTHZ_DENIED_TEXT", "Ask your school administrator"),
            ("AUTHZ_LOADING_TEXT", "  "),
        ]);
        let config = AuthzConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.policy_path, Some(PathBuf::from("/etc/campus/policy.json")));
        assert_eq!(config.placeholders.access_denied, "Ask your school administrator");
        assert_eq!(config.placeholders.loading, crate::bindings::DEFAULT_LOADING_TEXT);
    }
}
