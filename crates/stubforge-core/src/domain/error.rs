// ============================================================================
// domain/error.rs - VALIDATION-STAGE ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// Every variant is raised before any filesystem or process side effect, so a
/// domain error always means "nothing was touched".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    // ========================================================================
    // Registry lookups
    // ========================================================================
    #[error("invalid artifact type '{type_key}': {reason}")]
    UnknownArtifactType { type_key: String, reason: String },

    // ========================================================================
    // Input
    // ========================================================================
    #[error("missing required input: {field}")]
    MissingRequiredInput { field: &'static str },

    // ========================================================================
    // Repository source resolution
    // ========================================================================
    #[error("invalid 'repo' address: {repo}")]
    InvalidRepoAddress { repo: String },

    #[error("invalid 'type' name: {name}, allow: {allowed}")]
    InvalidTypeName { name: String, allowed: String },

    #[error("missing 'repo' or 'type' setting")]
    MissingSource,

    // ========================================================================
    // Path aliases
    // ========================================================================
    #[error("unknown path alias '{alias}' in '{path}'")]
    UnknownAlias { alias: String, path: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnknownArtifactType { type_key, .. } => vec![
                format!("'{type_key}' is not a known artifact type"),
                "Try: stubforge list to see the available types".into(),
            ],
            Self::MissingRequiredInput { field } => vec![
                format!("Provide a value for '{field}'"),
                "Pass it as a positional argument to skip the prompt".into(),
            ],
            Self::InvalidRepoAddress { .. } => vec![
                "Use a full URL (https://..., http://..., git@...)".into(),
                "Or the short form 'user/repo' for a GitHub repository".into(),
            ],
            Self::InvalidTypeName { allowed, .. } => vec![
                format!("Allowed application types: {allowed}"),
                "Or pass --repo to use a custom template repository".into(),
            ],
            Self::MissingSource => vec![
                "Pass --type (http, ws, tcp, rpc) or --repo <url>".into(),
            ],
            Self::UnknownAlias { alias, .. } => vec![
                format!("Register '{alias}' under [aliases] in the config file"),
                "Or use a plain relative or absolute path".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownArtifactType { .. } => ErrorCategory::NotFound,
            Self::UnknownAlias { .. } => ErrorCategory::Configuration,
            Self::MissingRequiredInput { .. }
            | Self::InvalidRepoAddress { .. }
            | Self::InvalidTypeName { .. }
            | Self::MissingSource => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_type_message_includes_reason() {
        let err = DomainError::UnknownArtifactType {
            type_key: "wsMiddleware".into(),
            reason: "reserved, not implemented yet".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid artifact type 'wsMiddleware': reserved, not implemented yet"
        );
    }

    #[test]
    fn source_errors_are_validation() {
        assert_eq!(DomainError::MissingSource.category(), ErrorCategory::Validation);
        assert!(!DomainError::MissingSource.suggestions().is_empty());
    }
}
