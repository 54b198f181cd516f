//! Unified error handling for stubforge core.
//!
//! Wraps domain and application errors behind one type with user-actionable
//! suggestions. Every error is `Clone` so the creators can keep the first
//! failure and hand it back on later calls.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for stubforge core operations.
#[derive(Debug, Error, Clone)]
pub enum StubforgeError {
    /// Validation-stage failures; nothing was touched.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Orchestration, I/O and process failures.
    #[error(transparent)]
    Application(#[from] ApplicationError),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl StubforgeError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {message}"),
                "Try: stubforge config path to locate the config file".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in stubforge".into(),
                "Please report this issue at: https://github.com/cosecruz/stubforge/issues".into(),
            ],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Configuration => ErrorCategory::Configuration,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Validation-stage errors are raised before any side effect.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Domain(_))
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type StubforgeResult<T> = Result<T, StubforgeError>;

/// Extension trait for adding context to foreign errors.
pub trait Context<T> {
    fn context(self, msg: impl Into<String>) -> StubforgeResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> StubforgeResult<T> {
        self.map_err(|e| StubforgeError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}
