//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to generate one class,
//! create an application from a skeleton repository, or lay out a component.

pub mod component_creator;
pub mod generation_session;
pub mod project_creator;

pub use component_creator::{ComponentCreator, Notifier};
pub use generation_session::{
    AfterCollectHook, GenerationOptions, GenerationOutcome, GenerationSession, GeneratorPorts,
    GeneratorSettings, SessionState,
};
pub use project_creator::{ExecNotifier, ProjectCreator, ProjectSettings, quote};
