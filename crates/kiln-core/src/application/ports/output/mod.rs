//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `kiln-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::domain::RawParameters;
use crate::error::KilnResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `kiln_adapters::filesystem::LocalFilesystem` (production)
/// - `kiln_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Design Notes
///
/// - Absence is reported through `exists`, never through an error, so
///   callers decide which removals are tolerant
/// - Copies preserve content and permission bits, not timestamps
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> KilnResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> KilnResult<()>;

    /// Read a whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> KilnResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Direct children of a directory, sorted by name.
    fn list_dir(&self, path: &Path) -> KilnResult<Vec<PathBuf>>;

    /// Copy a single file.
    fn copy_file(&self, from: &Path, to: &Path) -> KilnResult<()>;

    /// Copy a directory and everything below it.
    fn copy_dir_all(&self, from: &Path, to: &Path) -> KilnResult<()>;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> KilnResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> KilnResult<()>;

    /// Move a file or directory within the same filesystem. `to` must not exist.
    fn rename(&self, from: &Path, to: &Path) -> KilnResult<()>;
}

/// Port for the host framework's own "create application skeleton" facility.
///
/// Implemented by:
/// - `kiln_adapters::module_creator::BuiltinModuleCreator` (writes the skeleton itself)
/// - `kiln_adapters::module_creator::CommandModuleCreator` (runs e.g. `manage.py startapp`)
///
/// On success `dir/name` must exist.
#[cfg_attr(test, mockall::automock)]
pub trait BaseModuleCreator: Send + Sync {
    fn create(&self, dir: &Path, name: &str) -> KilnResult<()>;
}

/// Port for initialising version control in a freshly materialized project.
///
/// Implemented by:
/// - `kiln_adapters::vcs::GitCli`
#[cfg_attr(test, mockall::automock)]
pub trait VersionControl: Send + Sync {
    /// Initialise a repository at `root` and commit everything in it.
    fn init_repository(&self, root: &Path, message: &str) -> KilnResult<()>;
}

/// Port for upstream parameter producers.
///
/// Implemented by:
/// - `kiln_adapters::parameters::JsonParameterFile`
pub trait ParameterSource {
    fn load(&self) -> KilnResult<RawParameters>;
}
