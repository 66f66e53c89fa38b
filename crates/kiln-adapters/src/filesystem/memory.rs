//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use kiln_core::{
    application::{ApplicationError, ports::Filesystem},
    error::KilnResult,
};

/// In-memory filesystem for testing.
///
/// Clones share the same state, so a test can keep a handle while the
/// service owns another.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    executables: BTreeSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.directories.contains(path)
    }

    fn require_parent(&self, path: &Path) -> KilnResult<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !self.is_dir(parent) => {
                Err(not_found(path, "Parent directory does not exist"))
            }
            _ => Ok(()),
        }
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// Mark a file executable (testing helper).
    pub fn set_executable(&self, path: &Path) -> KilnResult<()> {
        let mut inner = self.write()?;
        if !inner.is_file(path) {
            return Err(not_found(path, "No such file"));
        }
        inner.executables.insert(path.to_path_buf());
        Ok(())
    }

    /// Check if a file is marked executable.
    pub fn is_executable(&self, path: &Path) -> bool {
        self.read()
            .map(|inner| inner.executables.contains(path))
            .unwrap_or(false)
    }

    /// All files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// All directories, sorted.
    pub fn list_directories(&self) -> Vec<PathBuf> {
        self.read()
            .map(|inner| inner.directories.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn read(&self) -> KilnResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner
            .read()
            .map_err(|_| ApplicationError::LockPoisoned.into())
    }

    fn write(&self) -> KilnResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner
            .write()
            .map_err(|_| ApplicationError::LockPoisoned.into())
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> KilnResult<()> {
        let mut inner = self.write()?;

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            if inner.is_file(&current) {
                return Err(ApplicationError::FilesystemError {
                    path: current,
                    reason: "Not a directory".into(),
                }
                .into());
            }
            inner.directories.insert(current.clone());
        }

        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> KilnResult<()> {
        let mut inner = self.write()?;
        inner.require_parent(path)?;
        if inner.is_dir(path) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "Is a directory".into(),
            }
            .into());
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> KilnResult<String> {
        let inner = self.read()?;
        inner
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| not_found(path, "No such file"))
    }

    fn exists(&self, path: &Path) -> bool {
        self.read()
            .map(|inner| inner.is_file(path) || inner.is_dir(path))
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.read().map(|inner| inner.is_dir(path)).unwrap_or(false)
    }

    fn list_dir(&self, path: &Path) -> KilnResult<Vec<PathBuf>> {
        let inner = self.read()?;
        if !inner.is_dir(path) {
            return Err(not_found(path, "No such directory"));
        }

        let children: BTreeSet<PathBuf> = inner
            .files
            .keys()
            .chain(inner.directories.iter())
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect();
        Ok(children.into_iter().collect())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> KilnResult<()> {
        let mut inner = self.write()?;
        let content = inner
            .files
            .get(from)
            .cloned()
            .ok_or_else(|| not_found(from, "No such file"))?;
        inner.require_parent(to)?;

        inner.files.insert(to.to_path_buf(), content);
        if inner.executables.contains(from) {
            inner.executables.insert(to.to_path_buf());
        } else {
            inner.executables.remove(to);
        }
        Ok(())
    }

    fn copy_dir_all(&self, from: &Path, to: &Path) -> KilnResult<()> {
        let mut inner = self.write()?;
        if !inner.is_dir(from) {
            return Err(not_found(from, "No such directory"));
        }

        let relocate = |p: &Path| p.strip_prefix(from).ok().map(|rel| to.join(rel));

        let directories: Vec<PathBuf> = inner
            .directories
            .iter()
            .filter_map(|d| relocate(d.as_path()))
            .collect();
        let files: Vec<(PathBuf, String, bool)> = inner
            .files
            .iter()
            .filter_map(|(p, c)| {
                relocate(p.as_path()).map(|t| (t, c.clone(), inner.executables.contains(p)))
            })
            .collect();

        inner.directories.extend(directories);
        for (path, content, executable) in files {
            if executable {
                inner.executables.insert(path.clone());
            }
            inner.files.insert(path, content);
        }
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> KilnResult<()> {
        let mut inner = self.write()?;
        if inner.files.remove(path).is_none() {
            return Err(not_found(path, "No such file"));
        }
        inner.executables.remove(path);
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> KilnResult<()> {
        let mut inner = self.write()?;
        if !inner.is_dir(path) {
            return Err(not_found(path, "No such directory"));
        }

        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        inner.executables.retain(|p| !p.starts_with(path));

        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> KilnResult<()> {
        let mut inner = self.write()?;
        if !inner.is_file(from) && !inner.is_dir(from) {
            return Err(not_found(from, "No such file or directory"));
        }
        if inner.is_file(to) || inner.is_dir(to) {
            return Err(ApplicationError::FilesystemError {
                path: to.to_path_buf(),
                reason: "Rename target already exists".into(),
            }
            .into());
        }
        inner.require_parent(to)?;

        let relocate = |p: &Path| p.strip_prefix(from).ok().map(|rel| to.join(rel));
        let relocate_or_keep = |p: PathBuf| relocate(p.as_path()).unwrap_or(p);

        let inner = &mut *inner;
        inner.directories = std::mem::take(&mut inner.directories)
            .into_iter()
            .map(relocate_or_keep)
            .collect();
        inner.files = std::mem::take(&mut inner.files)
            .into_iter()
            .map(|(p, c)| (relocate_or_keep(p), c))
            .collect();
        inner.executables = std::mem::take(&mut inner.executables)
            .into_iter()
            .map(relocate_or_keep)
            .collect();

        Ok(())
    }
}

fn not_found(path: &Path, reason: &str) -> kiln_core::error::KilnError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_requires_parent_directory() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("/p/a.txt"), "x").is_err());

        fs.create_dir_all(Path::new("/p")).unwrap();
        fs.write_file(Path::new("/p/a.txt"), "x").unwrap();
        assert_eq!(fs.read_file(Path::new("/p/a.txt")).as_deref(), Some("x"));
    }

    #[test]
    fn clones_share_state() {
        let fs = MemoryFilesystem::new();
        let handle = fs.clone();
        fs.create_dir_all(Path::new("/p")).unwrap();
        assert!(handle.is_dir(Path::new("/p")));
    }

    #[test]
    fn list_dir_returns_direct_children_only() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("/p/b/nested")).unwrap();
        fs.write_file(Path::new("/p/a.txt"), "").unwrap();
        fs.write_file(Path::new("/p/b/nested/deep.txt"), "").unwrap();

        assert_eq!(
            fs.list_dir(Path::new("/p")).unwrap(),
            vec![PathBuf::from("/p/a.txt"), PathBuf::from("/p/b")]
        );
    }

    #[test]
    fn copy_dir_all_keeps_executables() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("/p/src/bin")).unwrap();
        fs.write_file(Path::new("/p/src/bin/run.sh"), "#!/bin/sh\n").unwrap();
        fs.set_executable(Path::new("/p/src/bin/run.sh")).unwrap();

        fs.copy_dir_all(Path::new("/p/src"), Path::new("/p/out")).unwrap();

        assert!(fs.is_dir(Path::new("/p/out/bin")));
        assert!(fs.is_executable(Path::new("/p/out/bin/run.sh")));
    }

    #[test]
    fn rename_moves_everything_below_the_source() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("/p/src/bin")).unwrap();
        fs.write_file(Path::new("/p/src/bin/run.sh"), "#!/bin/sh\n").unwrap();
        fs.set_executable(Path::new("/p/src/bin/run.sh")).unwrap();
        fs.write_file(Path::new("/p/srcfile"), "").unwrap();

        fs.rename(Path::new("/p/src"), Path::new("/p/.src.removing"))
            .unwrap();

        assert!(!fs.exists(Path::new("/p/src")));
        assert!(fs.is_dir(Path::new("/p/.src.removing/bin")));
        assert!(fs.is_executable(Path::new("/p/.src.removing/bin/run.sh")));
        // Sibling sharing a name prefix is untouched.
        assert!(fs.exists(Path::new("/p/srcfile")));
        assert!(
            fs.rename(Path::new("/p/srcfile"), Path::new("/p/.src.removing"))
                .is_err()
        );
    }

    #[test]
    fn remove_dir_all_removes_subtree_only() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("/p/keep")).unwrap();
        fs.create_dir_all(Path::new("/p/gone/inner")).unwrap();
        fs.write_file(Path::new("/p/gone/inner/f"), "").unwrap();

        fs.remove_dir_all(Path::new("/p/gone")).unwrap();

        assert!(!fs.exists(Path::new("/p/gone/inner/f")));
        assert!(!fs.exists(Path::new("/p/gone")));
        assert!(fs.exists(Path::new("/p/keep")));
    }
}
