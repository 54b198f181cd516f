//! stubforge core - hexagonal architecture implementation
//!
//! Domain and application layers for the stubforge scaffolding tool.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          stubforge-cli (CLI)            │
//! │   (clap surface, prompts, config)       │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  GenerationSession, ProjectCreator,     │
//! │  ComponentCreator                       │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │  Filesystem, CommandRunner, Interact,   │
//! │  AliasResolver, TemplateRenderer        │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     stubforge-adapters (Infrastructure) │
//! │  LocalFilesystem, ShellRunner,          │
//! │  HandlebarsRenderer, AliasMap           │
//! └─────────────────────────────────────────┘
//!
//! Domain layer (pure): artifact registry, contexts, repository sources,
//! component manifest.
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stubforge_core::prelude::*;
//! # fn demo(ports: GeneratorPorts, interact: &dyn Interact) -> StubforgeResult<()> {
//! let settings = GeneratorSettings::new("templates/classes", ".");
//! let mut session = GenerationSession::begin(
//!     "httpController",
//!     GenerationOptions::named("user"),
//!     settings,
//!     ports,
//! )?;
//! let outcome = session.run(interact)?;
//! println!("{}", outcome.path().display());
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod domain;
pub mod error;

pub mod prelude {
    pub use crate::application::{
        AliasResolver, CommandOutput, CommandRunner, ComponentCreator, Filesystem,
        GenerationOptions, GenerationOutcome, GenerationSession, GeneratorPorts,
        GeneratorSettings, Interact, ProjectCreator, ProjectSettings, TemplateRenderer,
    };
    pub use crate::domain::{
        ArtifactKind, ArtifactOverrides, ArtifactSpec, ComponentRequest, GenerationContext,
        ProjectRequest, RenderContext, RepositorySource,
    };
    pub use crate::error::{StubforgeError, StubforgeResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
