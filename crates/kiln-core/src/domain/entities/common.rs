use super::DomainError;
use serde::Serialize;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A filesystem path guaranteed to be relative and free of `..` segments.
///
/// Invariant: Never absolute, never escapes its base. Enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// Create a new relative path.
    ///
    /// # Panics
    /// Panics if path is absolute or escapes its base (use `try_new` for
    /// fallible construction). Intended for the static layout tables.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        assert!(
            is_contained(&path),
            "RelativePath must stay inside its base: {:?}",
            path
        );
        Self(path)
    }

    /// Fallible constructor.
    pub fn try_new(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        if is_contained(&path) {
            Ok(Self(path))
        } else {
            Err(DomainError::AbsolutePathNotAllowed {
                path: path.display().to_string(),
            })
        }
    }

    /// Join a segment, maintaining relative invariant.
    pub fn join(&self, segment: impl AsRef<Path>) -> Result<Self, DomainError> {
        Self::try_new(self.0.join(segment.as_ref()))
    }

    /// Resolve against an absolute or working-directory base.
    pub fn under(&self, base: &Path) -> PathBuf {
        base.join(&self.0)
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

fn is_contained(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_absolute_and_parent_segments() {
        assert!(RelativePath::try_new("/etc/passwd").is_err());
        assert!(RelativePath::try_new("../outside").is_err());
        assert!(RelativePath::try_new("domain/../../x").is_err());
    }

    #[test]
    fn join_keeps_invariant() {
        let base = RelativePath::new("domain");
        assert_eq!(
            base.join("entities").unwrap().as_path(),
            Path::new("domain/entities")
        );
        assert!(base.join("..").is_err());
    }

    #[test]
    fn under_resolves_against_base() {
        let p = RelativePath::new("application/dto");
        assert_eq!(
            p.under(Path::new("/srv/orders_service")),
            PathBuf::from("/srv/orders_service/application/dto")
        );
    }
}
