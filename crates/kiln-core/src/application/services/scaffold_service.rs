//! Scaffold Service - DDD module generator.
//!
//! This service coordinates the module generation workflow:
//! 1. Validate module and service names
//! 2. Create the layered directory hierarchy
//! 3. Delegate the base module to a `BaseModuleCreator`
//! 4. Augment the infrastructure layer
//! 5. Write empty per-layer stubs
//! 6. Report the manual follow-up checklist
//!
//! There is no rollback: a failure leaves whatever was created in place.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{BaseModuleCreator, Filesystem},
    },
    domain::{DomainValidator as validator, MODULE_MARKER, ScaffoldLayout},
    error::{KilnError, KilnResult},
};

/// Default directory under the project root holding service packages.
pub const DEFAULT_SOURCE_DIR: &str = "src";

/// Outcome of a successful generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaffoldReport {
    pub module: String,
    pub service: String,
    pub service_dir: PathBuf,
    pub base_module_dir: PathBuf,
    pub directories: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
    pub checklist: Vec<String>,
}

/// DDD scaffold generator.
pub struct ScaffoldService {
    filesystem: Box<dyn Filesystem>,
    creator: Box<dyn BaseModuleCreator>,
}

impl ScaffoldService {
    pub fn new(filesystem: Box<dyn Filesystem>, creator: Box<dyn BaseModuleCreator>) -> Self {
        Self {
            filesystem,
            creator,
        }
    }

    /// Generate `<source_root>/<service>_service` for `module`.
    ///
    /// `service` defaults to the module name.
    #[instrument(
        skip_all,
        fields(
            source_root = %source_root.display(),
            module = %module,
            service = service.unwrap_or(module)
        )
    )]
    pub fn create(
        &self,
        source_root: &Path,
        module: &str,
        service: Option<&str>,
    ) -> KilnResult<ScaffoldReport> {
        // 1. Validate
        let layout =
            validator::validate_scaffold(source_root, module, service).map_err(KilnError::Domain)?;

        if self.filesystem.exists(layout.service_dir()) {
            return Err(ApplicationError::AlreadyExists {
                path: layout.service_dir().to_path_buf(),
            }
            .into());
        }

        let mut report = ScaffoldReport {
            module: layout.module().to_string(),
            service: layout.service().to_string(),
            service_dir: layout.service_dir().to_path_buf(),
            base_module_dir: layout.base_module_dir(),
            directories: Vec::new(),
            files: Vec::new(),
            checklist: Vec::new(),
        };

        // 2. Layers
        for dir in layout.layer_directories() {
            self.create_package(&dir, &mut report)?;
        }
        info!(directories = report.directories.len(), "Layer directories created");

        // 3. Base module
        self.create_base_module(&layout)?;
        info!(path = %layout.base_module_dir().display(), "Base module created");

        // 4. Infrastructure
        for dir in layout.infrastructure_subdirs() {
            self.create_package(&dir, &mut report)?;
        }

        // 5. Stubs
        for file in layout.stub_files() {
            self.filesystem.write_file(&file, "")?;
            debug!(path = %file.display(), "Stub written");
            report.files.push(file);
        }

        // 6. Report
        report.checklist = layout.checklist();
        info!(files = report.files.len(), "Scaffold completed successfully");
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Directory plus its marker; an existing marker is left untouched.
    fn create_package(&self, dir: &Path, report: &mut ScaffoldReport) -> KilnResult<()> {
        self.filesystem.create_dir_all(dir)?;
        report.directories.push(dir.to_path_buf());

        let marker = dir.join(MODULE_MARKER);
        if !self.filesystem.exists(&marker) {
            self.filesystem.write_file(&marker, "")?;
            report.files.push(marker);
        }
        Ok(())
    }

    fn create_base_module(&self, layout: &ScaffoldLayout) -> KilnResult<()> {
        let module = layout.module().as_str();

        self.creator
            .create(&layout.infrastructure_dir(), module)
            .map_err(|e| match e {
                KilnError::Application(ApplicationError::BaseModuleFailed { .. }) => e,
                other => ApplicationError::BaseModuleFailed {
                    module: module.to_string(),
                    reason: other.to_string(),
                }
                .into(),
            })?;

        let expected = layout.base_module_dir();
        if !self.filesystem.is_dir(&expected) {
            return Err(ApplicationError::BaseModuleMissing { path: expected }.into());
        }
        Ok(())
    }
}
