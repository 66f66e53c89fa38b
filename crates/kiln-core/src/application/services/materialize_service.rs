//! Materialize Service - turns a staged template tree into the final project.
//!
//! Workflow, in order:
//! 1. Resolve the variant and render configuration (pure, before any mutation)
//! 2. Replace same-named root entries with the keep subtree's entries
//! 3. Remove the selection marker
//! 4. Remove every variant subtree (discard first, keep last)
//! 5. Remove every placeholder marker
//! 6. Write `.env` and `docker-compose.yml`
//!
//! The keep subtree is renamed to a tombstone before it is deleted, so a
//! half-deleted keep subtree is never copied over the root by a later run.
//! Steps 3-5 tolerate absence, leftover tombstones included, so an
//! interrupted run can be repeated.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, VersionControl},
    },
    domain::{
        COMPOSE_FILE, DatabaseConfigurer, DatabaseKind, ENV_FILE, EnvPayload, ParameterRecord,
        Resolution, SELECTION_MARKER, Variant, VariantManifest,
    },
    error::KilnResult,
};

/// Commit message used when version control is initialised.
pub const INITIAL_COMMIT_MESSAGE: &str = "Initial commit";

/// Everything needed to materialize, computed without touching the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterializePlan {
    pub project_slug: String,
    pub database: DatabaseKind,
    pub resolution: Resolution,
    pub env: EnvPayload,
    pub compose: String,
    pub next_steps: Vec<String>,
}

/// What a materialization run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaterializeReport {
    pub root: PathBuf,
    pub variant: Option<Variant>,
    pub project_slug: String,
    /// Root entries copied from the keep subtree.
    pub copied: Vec<PathBuf>,
    /// Pre-existing root entries that were replaced by a copy.
    pub replaced: Vec<PathBuf>,
    /// Staging artifacts removed (marker, subtrees, placeholders).
    pub removed: Vec<PathBuf>,
    /// Configuration files written.
    pub written: Vec<PathBuf>,
    /// The keep subtree was already gone; copy was skipped.
    pub already_materialized: bool,
    pub repository_initialized: bool,
    pub next_steps: Vec<String>,
}

/// Tree materialization service.
pub struct MaterializeService {
    filesystem: Box<dyn Filesystem>,
    vcs: Option<Box<dyn VersionControl>>,
}

impl MaterializeService {
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self {
            filesystem,
            vcs: None,
        }
    }

    /// Initialise version control after every successful run.
    pub fn with_version_control(mut self, vcs: Box<dyn VersionControl>) -> Self {
        self.vcs = Some(vcs);
        self
    }

    /// Resolve and render everything up front.
    pub fn plan(record: &ParameterRecord) -> MaterializePlan {
        let slug = record.project_slug();
        MaterializePlan {
            project_slug: slug.to_string(),
            database: record.database(),
            resolution: VariantManifest::resolve(record.variant()),
            env: DatabaseConfigurer::render(record.database(), slug),
            compose: DatabaseConfigurer::render_compose(record.database(), slug),
            next_steps: VariantManifest::next_steps(record.variant(), record.database(), slug),
        }
    }

    /// Variant identifier recorded by the upstream collector, if any.
    ///
    /// Only the first non-blank line counts. Reading never mutates the tree.
    pub fn read_selection_marker(&self, root: &Path) -> KilnResult<Option<String>> {
        let marker = root.join(SELECTION_MARKER);
        if !self.filesystem.exists(&marker) {
            return Ok(None);
        }
        let content = self.filesystem.read_to_string(&marker)?;
        Ok(content
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(str::to_string))
    }

    /// Plan, apply and optionally initialise version control.
    #[instrument(
        skip_all,
        fields(
            root = %root.display(),
            variant = %record.variant(),
            database = %record.database()
        )
    )]
    pub fn materialize(&self, root: &Path, record: &ParameterRecord) -> KilnResult<MaterializeReport> {
        let plan = Self::plan(record);
        let mut report = self.apply(root, &plan)?;

        if let Some(vcs) = &self.vcs {
            vcs.init_repository(root, INITIAL_COMMIT_MESSAGE)?;
            report.repository_initialized = true;
            info!("Repository initialised");
        }

        info!("Materialization completed successfully");
        Ok(report)
    }

    /// Apply a plan to `root`.
    pub fn apply(&self, root: &Path, plan: &MaterializePlan) -> KilnResult<MaterializeReport> {
        let mut report = MaterializeReport {
            root: root.to_path_buf(),
            variant: Some(plan.resolution.variant),
            project_slug: plan.project_slug.clone(),
            next_steps: plan.next_steps.clone(),
            ..MaterializeReport::default()
        };

        // 1. Copy keep subtree over the root
        self.copy_keep_subtree(root, &plan.resolution, &mut report)?;

        // 2. Selection marker
        self.remove_if_present(&root.join(SELECTION_MARKER), &mut report)?;

        // 3. Staging subtrees
        for tombstone in VariantManifest::all_tombstones() {
            self.remove_if_present(&root.join(tombstone), &mut report)?;
        }
        for subtree in plan.resolution.removal_order() {
            let path = root.join(subtree);
            if subtree == plan.resolution.keep {
                let tombstone = root.join(plan.resolution.keep_tombstone());
                self.retire_keep_subtree(&path, &tombstone, &mut report)?;
            } else {
                self.remove_if_present(&path, &mut report)?;
            }
        }

        // 4. Placeholder markers
        for placeholder in VariantManifest::all_placeholders() {
            self.remove_if_present(&root.join(placeholder), &mut report)?;
        }

        // 5. Configuration, always fully regenerated
        let env_path = root.join(ENV_FILE);
        self.filesystem.write_file(&env_path, &plan.env.render())?;
        report.written.push(env_path);

        let compose_path = root.join(COMPOSE_FILE);
        self.filesystem.write_file(&compose_path, &plan.compose)?;
        report.written.push(compose_path);

        info!(
            copied = report.copied.len(),
            removed = report.removed.len(),
            "Tree materialized"
        );
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn copy_keep_subtree(
        &self,
        root: &Path,
        resolution: &Resolution,
        report: &mut MaterializeReport,
    ) -> KilnResult<()> {
        let keep_dir = root.join(resolution.keep);

        if !self.filesystem.is_dir(&keep_dir) {
            let staged = resolution
                .discard
                .iter()
                .any(|d| self.filesystem.exists(&root.join(d)));
            if staged {
                return Err(ApplicationError::SourceSubtreeMissing { path: keep_dir }.into());
            }
            warn!(
                path = %keep_dir.display(),
                "Keep subtree absent and nothing staged; treating root as already materialized"
            );
            report.already_materialized = true;
            return Ok(());
        }

        for source in self.filesystem.list_dir(&keep_dir)? {
            let Some(name) = source.file_name() else {
                continue;
            };
            let dest = root.join(name);

            if dest == keep_dir {
                warn!(path = %source.display(), "Skipping entry that shadows its own subtree");
                continue;
            }

            if self.filesystem.exists(&dest) {
                debug!(path = %dest.display(), "Replacing existing entry");
                self.remove_entry(&dest)?;
                report.replaced.push(dest.clone());
            }

            if self.filesystem.is_dir(&source) {
                self.filesystem.copy_dir_all(&source, &dest)?;
            } else {
                self.filesystem.copy_file(&source, &dest)?;
            }
            debug!(from = %source.display(), to = %dest.display(), "Copied");
            report.copied.push(dest);
        }

        Ok(())
    }

    fn retire_keep_subtree(
        &self,
        keep_dir: &Path,
        tombstone: &Path,
        report: &mut MaterializeReport,
    ) -> KilnResult<()> {
        if !self.filesystem.exists(keep_dir) {
            return Ok(());
        }
        self.filesystem.rename(keep_dir, tombstone)?;
        debug!(from = %keep_dir.display(), to = %tombstone.display(), "Keep subtree retired");
        self.remove_entry(tombstone)?;
        report.removed.push(keep_dir.to_path_buf());
        Ok(())
    }

    fn remove_if_present(&self, path: &Path, report: &mut MaterializeReport) -> KilnResult<()> {
        if !self.filesystem.exists(path) {
            return Ok(());
        }
        self.remove_entry(path)?;
        debug!(path = %path.display(), "Removed");
        report.removed.push(path.to_path_buf());
        Ok(())
    }

    fn remove_entry(&self, path: &Path) -> KilnResult<()> {
        if self.filesystem.is_dir(path) {
            self.filesystem.remove_dir_all(path)
        } else {
            self.filesystem.remove_file(path)
        }
    }
}
