use std::path::PathBuf;

pub type AuthzResult<T> = Result<T, AuthzError>;

/// Errors raised while building or loading authorization policy.
///
/// A denied check is not an error: queries answer `false` and the
/// binding layer decides what to render.
#[derive(thiserror::Error, Debug)]
pub enum AuthzError {
    #[error("malformed capability: {0:?} (expected \"<category>.<action>\")")]
    MalformedCapability(String),
    #[error("unknown capability {capability:?} referenced by {referenced_by}")]
    UnknownCapability {
        capability: String,
        referenced_by: String,
    },
    #[error("feature {0:?} grants no capabilities")]
    EmptyFeature(String),
    #[error("administrator role is missing {} catalog capabilities", .missing.len())]
    IncompleteAdministrator { missing: Vec<String> },
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("policy parse error: {0}")]
    Parse(#[from] serde_path_to_error::Error<serde_json::Error>),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("identity signal closed")]
    SignalClosed,
}

impl AuthzError {
    pub fn malformed(capability: impl Into<String>) -> Self {
        Self::MalformedCapability(capability.into())
    }

    pub fn unknown_capability(capability: impl Into<String>, referenced_by: impl Into<String>) -> Self {
        Self::UnknownCapability {
            capability: capability.into(),
            referenced_by: referenced_by.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Short machine-readable tag, used by the CLI's JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthzError::MalformedCapability(_) => "malformed_capability",
            AuthzError::UnknownCapability { .. } => "unknown_capability",
            AuthzError::EmptyFeature(_) => "empty_feature",
            AuthzError::IncompleteAdministrator { .. } => "incomplete_administrator",
            AuthzError::Configuration(_) => "configuration",
            AuthzError::Parse(_) => "parse",
            AuthzError::Io { .. } => "io",
            AuthzError::SignalClosed => "signal_closed",
        }
    }
}
