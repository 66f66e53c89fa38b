//! Local filesystem adapter using std::fs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use kiln_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{KilnError, KilnResult},
};
use tracing::trace;
use walkdir::WalkDir;

/// Production filesystem implementation using `std::fs`.
///
/// Symbolic links are never followed: they are copied and removed as links.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> KilnResult<()> {
        fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> KilnResult<()> {
        fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn read_to_string(&self, path: &Path) -> KilnResult<String> {
        fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    fn is_dir(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok_and(|m| m.is_dir())
    }

    fn list_dir(&self, path: &Path) -> KilnResult<Vec<PathBuf>> {
        let entries = fs::read_dir(path).map_err(|e| map_io_error(path, e, "list directory"))?;

        let mut children = entries
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<Vec<_>>>()
            .map_err(|e| map_io_error(path, e, "list directory"))?;
        children.sort();
        Ok(children)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> KilnResult<()> {
        let metadata =
            fs::symlink_metadata(from).map_err(|e| map_io_error(from, e, "read metadata"))?;

        if metadata.file_type().is_symlink() {
            return copy_symlink(from, to);
        }

        // `fs::copy` carries the permission bits along with the content.
        fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| map_io_error(to, e, "copy file"))
    }

    fn copy_dir_all(&self, from: &Path, to: &Path) -> KilnResult<()> {
        for entry in WalkDir::new(from).follow_links(false) {
            let entry = entry.map_err(|e| map_io_error(from, e.into(), "walk directory"))?;
            let relative = entry
                .path()
                .strip_prefix(from)
                .map_err(|e| ApplicationError::FilesystemError {
                    path: entry.path().to_path_buf(),
                    reason: e.to_string(),
                })?;
            let target = to.join(relative);
            let file_type = entry.file_type();

            if file_type.is_dir() {
                fs::create_dir_all(&target)
                    .map_err(|e| map_io_error(&target, e, "create directory"))?;
            } else if file_type.is_symlink() {
                copy_symlink(entry.path(), &target)?;
            } else {
                fs::copy(entry.path(), &target).map_err(|e| map_io_error(&target, e, "copy file"))?;
            }
            trace!(path = %target.display(), "copied");
        }
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> KilnResult<()> {
        fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
    }

    fn remove_dir_all(&self, path: &Path) -> KilnResult<()> {
        fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }

    fn rename(&self, from: &Path, to: &Path) -> KilnResult<()> {
        // `fs::rename` silently replaces an empty directory or a file on Unix.
        if self.exists(to) {
            return Err(ApplicationError::FilesystemError {
                path: to.to_path_buf(),
                reason: "Rename target already exists".into(),
            }
            .into());
        }
        fs::rename(from, to).map_err(|e| map_io_error(from, e, "rename"))
    }
}

#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path) -> KilnResult<()> {
    let target = fs::read_link(from).map_err(|e| map_io_error(from, e, "read link"))?;
    std::os::unix::fs::symlink(&target, to).map_err(|e| map_io_error(to, e, "create link"))
}

#[cfg(not(unix))]
fn copy_symlink(from: &Path, to: &Path) -> KilnResult<()> {
    // No portable link creation; fall back to copying what the link points at.
    fs::copy(from, to)
        .map(|_| ())
        .map_err(|e| map_io_error(to, e, "copy file"))
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> KilnError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
