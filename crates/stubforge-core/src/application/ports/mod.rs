//! Application ports (traits) for external dependencies.
//!
//! Ports define what the application needs from the outside world. Adapters
//! in `stubforge-adapters` and the CLI implement them.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: called by the services
//!   - `Filesystem`: file operations
//!   - `CommandRunner`: shell command execution
//!   - `AliasResolver`: `@alias` path expansion
//!   - `TemplateRenderer`: template rendering and writing
//!   - `Interact`: prompts and confirmations

pub mod output;

pub use output::{AliasResolver, CommandOutput, CommandRunner, Filesystem, Interact, TemplateRenderer};

#[cfg(test)]
pub use output::{
    MockAliasResolver, MockCommandRunner, MockFilesystem, MockInteract, MockTemplateRenderer,
};
