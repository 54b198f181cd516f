//! Core domain layer for stubforge.
//!
//! Pure data and rules: the artifact registry, generation contexts, repository
//! source classification and the component manifest. No filesystem, process or
//! terminal access happens here; those live behind the application ports.

pub mod artifact;
pub mod component;
pub mod context;
pub mod error;
pub mod project;
pub mod repository;
pub mod template;

pub use artifact::{
    ARTIFACT_REGISTRY, ArtifactDef, ArtifactKind, ArtifactOverrides, ArtifactSpec, Specialization,
    lookup,
};
pub use component::{
    ComponentCreationState, ComponentRequest, FileManifestEntry, component_manifest,
};
pub use context::{GenerationContext, RenderContext, capitalize, class_name};
pub use error::{DomainError, ErrorCategory};
pub use project::{ProjectCreationState, ProjectRequest};
pub use repository::{GITHUB_URL, PRESET_REPOSITORIES, RepositorySource, SourceKind};
pub use template::{TemplateLocation, normalize_ext};
