//! Application layer errors.
//!
//! These errors represent failures in orchestration, I/O and process
//! execution. Input and data-rule failures are `DomainError`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while rendering, writing or running external commands.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    #[error("template file not found: {}", path.display())]
    TemplateNotFound { path: PathBuf },

    #[error("template syntax error in {}: {reason}", path.display())]
    TemplateSyntaxError { path: PathBuf, reason: String },

    #[error("include file not found: {}", path.display())]
    IncludePathNotFound { path: PathBuf },

    /// Rendering failed after the template parsed.
    #[error("template rendering failed: {reason}")]
    RenderingFailed { reason: String },

    #[error("failed to write {}: {reason}", path.display())]
    WriteError { path: PathBuf, reason: String },

    #[error("the target path already exists: {}", path.display())]
    TargetExists { path: PathBuf },

    #[error("exec command fail: {output}")]
    ShellCommandFailed { command: String, output: String },

    #[error("refusing to delete unsafe path: '{path}'")]
    UnsafeDeletePath { path: String },

    #[error("cannot {operation} while session is {state}")]
    InvalidState {
        operation: &'static str,
        state: String,
    },

    #[error("filesystem error at {}: {reason}", path.display())]
    Filesystem { path: PathBuf, reason: String },
}

impl ApplicationError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateNotFound { path } => vec![
                format!("Expected a template at: {}", path.display()),
                "Pass --tpl-dir or --tpl-file to point at your templates".into(),
                "Or set generator.template_dir in the config file".into(),
            ],
            Self::TemplateSyntaxError { .. } => vec![
                "The template could not be parsed; check unbalanced {{ }} braces".into(),
            ],
            Self::IncludePathNotFound { path } => vec![
                format!("Included file is missing: {}", path.display()),
                "Relative include paths resolve from the including template's directory".into(),
            ],
            Self::WriteError { path, .. } | Self::Filesystem { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::TargetExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Choose a different name or remove the existing directory".into(),
            ],
            Self::ShellCommandFailed { command, .. } => vec![
                format!("Command failed: {command}"),
                "Check network access and that git is installed".into(),
                "Pass --refresh to re-fetch a stale cached skeleton".into(),
            ],
            Self::UnsafeDeletePath { .. } => {
                vec!["Only paths of six or more characters can be removed".into()]
            }
            _ => vec!["Check the error details above".into()],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateNotFound { .. } | Self::IncludePathNotFound { .. } => {
                ErrorCategory::NotFound
            }
            Self::TargetExists { .. } | Self::UnsafeDeletePath { .. } => ErrorCategory::Validation,
            Self::TemplateSyntaxError { .. }
            | Self::RenderingFailed { .. }
            | Self::WriteError { .. }
            | Self::ShellCommandFailed { .. }
            | Self::InvalidState { .. }
            | Self::Filesystem { .. } => ErrorCategory::Internal,
        }
    }
}
