//! Infrastructure adapters for Kiln.
//!
//! This crate implements the ports defined in `kiln-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod module_creator;
pub mod parameters;
pub mod vcs;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use module_creator::{BuiltinModuleCreator, CommandModuleCreator};
pub use parameters::JsonParameterFile;
pub use vcs::GitCli;
