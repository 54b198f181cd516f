//! Infrastructure adapters for stubforge.
//!
//! This crate implements the ports defined in
//! `stubforge_core::application::ports`. All disk, process and template
//! engine access lives here.

pub mod alias;
pub mod filesystem;
pub mod renderer;
pub mod shell;

// Re-export commonly used adapters
pub use alias::AliasMap;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use renderer::HandlebarsRenderer;
pub use shell::ShellRunner;
