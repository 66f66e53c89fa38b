//! Fixed DDD module layout.
//!
//! ```text
//! <source_root>/<service>_service/
//! ├── domain/{entities,services,repositories}
//! ├── application/{services,dto}
//! ├── infrastructure/
//! │   ├── <module>/                 ← base module, created by a BaseModuleCreator
//! │   └── {repositories,external_services,persistence}
//! └── presentation/{api,serializers}
//! ```
//!
//! Every directory carries an empty [`MODULE_MARKER`].

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::{entities::common::RelativePath, error::DomainError};

/// Empty file that turns a directory into an importable package.
pub const MODULE_MARKER: &str = "__init__.py";

/// Directory holding the base module and the infrastructure augmentation.
pub const INFRASTRUCTURE_DIR: &str = "infrastructure";

/// Layer directories relative to the service directory, parents first.
pub const LAYER_DIRECTORIES: &[&str] = &[
    "domain",
    "domain/entities",
    "domain/services",
    "domain/repositories",
    "application",
    "application/services",
    "application/dto",
    INFRASTRUCTURE_DIR,
    "presentation",
    "presentation/api",
    "presentation/serializers",
];

/// Added next to the base module after it has been created.
pub const INFRASTRUCTURE_SUBDIRS: &[&str] = &["repositories", "external_services", "persistence"];

/// `(directory, file pattern)`; `{m}` is replaced with the module name.
const STUB_PATTERNS: &[(&str, &str)] = &[
    ("domain/entities", "{m}.py"),
    ("domain/repositories", "{m}_repository.py"),
    ("domain/services", "{m}_service.py"),
    ("application/dto", "{m}_dto.py"),
    ("application/services", "{m}_application_service.py"),
    ("presentation/serializers", "{m}_serializer.py"),
    ("presentation/api", "{m}_views.py"),
    ("presentation/api", "{m}_urls.py"),
];

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// A module name that is a valid, non-keyword Python identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ModuleName(String);

impl ModuleName {
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        let invalid = |reason: &str| DomainError::InvalidModuleName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let mut chars = name.chars();
        let Some(first) = chars.next() else {
            return Err(invalid("name cannot be empty"));
        };
        if !(unicode_ident::is_xid_start(first) || first == '_') {
            return Err(invalid("must start with a letter or underscore"));
        }
        if let Some(bad) = chars.find(|c| !unicode_ident::is_xid_continue(*c)) {
            return Err(invalid(&format!("character '{bad}' is not allowed")));
        }
        if PYTHON_KEYWORDS.contains(&name) {
            return Err(invalid("reserved Python keyword"));
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Concrete layout for one module, anchored at its service directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldLayout {
    module: ModuleName,
    service: ModuleName,
    service_dir: PathBuf,
}

impl ScaffoldLayout {
    /// Validate names and anchor the layout under `source_root`.
    ///
    /// `service` defaults to the module name.
    pub fn new(
        source_root: &Path,
        module: &str,
        service: Option<&str>,
    ) -> Result<Self, DomainError> {
        let module = ModuleName::parse(module)?;
        let service = match service {
            Some(s) => ModuleName::parse(s)?,
            None => module.clone(),
        };
        let service_dir = source_root.join(format!("{service}_service"));

        Ok(Self {
            module,
            service,
            service_dir,
        })
    }

    pub fn module(&self) -> &ModuleName {
        &self.module
    }

    pub fn service(&self) -> &ModuleName {
        &self.service
    }

    pub fn service_dir(&self) -> &Path {
        &self.service_dir
    }

    /// Service directory followed by every layer directory, parents first.
    pub fn layer_directories(&self) -> Vec<PathBuf> {
        std::iter::once(self.service_dir.clone())
            .chain(
                LAYER_DIRECTORIES
                    .iter()
                    .map(|d| RelativePath::new(*d).under(&self.service_dir)),
            )
            .collect()
    }

    pub fn infrastructure_dir(&self) -> PathBuf {
        self.service_dir.join(INFRASTRUCTURE_DIR)
    }

    /// Directory the base module creator is expected to produce.
    pub fn base_module_dir(&self) -> PathBuf {
        self.infrastructure_dir().join(self.module.as_str())
    }

    pub fn infrastructure_subdirs(&self) -> Vec<PathBuf> {
        let infra = self.infrastructure_dir();
        INFRASTRUCTURE_SUBDIRS.iter().map(|d| infra.join(d)).collect()
    }

    /// The empty per-layer source files, in creation order.
    pub fn stub_files(&self) -> Vec<PathBuf> {
        STUB_PATTERNS
            .iter()
            .map(|(dir, pattern)| {
                let file = pattern.replace("{m}", self.module.as_str());
                RelativePath::new(*dir).under(&self.service_dir).join(file)
            })
            .collect()
    }

    /// Manual follow-up steps; settings are never edited automatically.
    pub fn checklist(&self) -> Vec<String> {
        let dir = self.service_dir.display();
        vec![
            format!("Add '{}' to INSTALLED_APPS in settings.py", self.module),
            format!("Run migrations: python manage.py makemigrations {}", self.module),
            "Apply migrations: python manage.py migrate".into(),
            format!("Update your domain logic in {dir}/domain/"),
            format!("Update your application services in {dir}/application/"),
        ]
    }
}
