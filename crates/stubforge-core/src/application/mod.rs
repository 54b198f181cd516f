//! Application layer for stubforge.
//!
//! This layer contains:
//! - **Services**: use case orchestration (`GenerationSession`,
//!   `ProjectCreator`, `ComponentCreator`)
//! - **Ports**: traits for the filesystem, shell, aliases, rendering and prompts
//! - **Errors**: orchestration and I/O error types
//!
//! Business rules live in `crate::domain`; this layer sequences them and
//! performs side effects through the ports.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    ComponentCreator, GenerationOptions, GenerationOutcome, GenerationSession, GeneratorPorts,
    GeneratorSettings, ProjectCreator, ProjectSettings, SessionState,
};

pub use ports::{
    AliasResolver, CommandOutput, CommandRunner, Filesystem, Interact, TemplateRenderer,
};

pub use error::ApplicationError;
