//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from the outside world.
//! The `stubforge-adapters` crate provides the filesystem, process, alias and
//! rendering implementations; the CLI provides [`Interact`].

use std::path::{Path, PathBuf};

use crate::domain::RenderContext;
use crate::error::StubforgeResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `stubforge_adapters::filesystem::LocalFilesystem` (production)
/// - `stubforge_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories. No-op if present.
    fn create_dir_all(&self, path: &Path) -> StubforgeResult<()>;

    fn write_file(&self, path: &Path, content: &str) -> StubforgeResult<()>;

    fn read_to_string(&self, path: &Path) -> StubforgeResult<String>;

    /// Set Unix permission bits. Ignored where unsupported.
    fn set_mode(&self, path: &Path, mode: u32) -> StubforgeResult<()>;

    fn exists(&self, path: &Path) -> bool;
}

/// Exit status and combined stdout/stderr of one shell command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    pub code: i32,
    pub output: String,
}

impl CommandOutput {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            code: 0,
            output: output.into(),
        }
    }

    pub fn failure(code: i32, output: impl Into<String>) -> Self {
        Self {
            code,
            output: output.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Port for running shell command lines.
///
/// A non-zero exit is reported through [`CommandOutput::code`], not as `Err`;
/// `Err` means the command could not be started at all.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    fn run(&self, command: &str) -> StubforgeResult<CommandOutput>;
}

/// Port for `@alias/path` resolution.
///
/// Plain paths come back unchanged; unknown aliases are an error.
#[cfg_attr(test, mockall::automock)]
pub trait AliasResolver: Send + Sync {
    fn resolve(&self, path: &str) -> StubforgeResult<PathBuf>;
}

/// Port for template rendering.
///
/// Implemented by `stubforge_adapters::renderer::HandlebarsRenderer`.
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    /// Render the template at `template`.
    ///
    /// Fails with `TemplateNotFound`, `TemplateSyntaxError` or
    /// `IncludePathNotFound`.
    fn render(&self, template: &Path, context: &RenderContext) -> StubforgeResult<String>;

    /// Render and write, creating missing parent directories.
    ///
    /// A failed write is `WriteError`; the caller decides how to report it.
    fn render_to_file(
        &self,
        template: &Path,
        context: &RenderContext,
        destination: &Path,
    ) -> StubforgeResult<()>;

    /// Write verbatim content with the same directory guarantee.
    fn write_raw(&self, destination: &Path, content: &str) -> StubforgeResult<()>;
}

/// Port for user interaction during a command.
///
/// Implemented by the CLI (terminal prompts) and by test doubles.
#[cfg_attr(test, mockall::automock)]
pub trait Interact {
    /// Ask for free text. Returns an empty string when the user gives nothing.
    fn ask(&self, prompt: &str) -> StubforgeResult<String>;

    fn confirm(&self, question: &str, default: bool) -> StubforgeResult<bool>;

    /// Show rendered content before it is written.
    fn preview(&self, content: &str);
}
