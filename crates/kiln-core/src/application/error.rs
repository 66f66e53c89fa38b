//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The staged subtree for the chosen variant is not where it should be.
    #[error("Source subtree missing: {path}")]
    SourceSubtreeMissing { path: PathBuf },

    /// Scaffold target already exists; generation is not re-entrant.
    #[error("Already exists: {path}")]
    AlreadyExists { path: PathBuf },

    /// The delegated base module step reported failure.
    #[error("Base module creation failed for '{module}': {reason}")]
    BaseModuleFailed { module: String, reason: String },

    /// The delegated base module step succeeded but produced nothing.
    #[error("Base module directory not found after creation: {path}")]
    BaseModuleMissing { path: PathBuf },

    /// A parameter file could not be read or parsed.
    #[error("Invalid parameter file {path}: {reason}")]
    InvalidParameters { path: PathBuf, reason: String },

    /// An external program exited unsuccessfully or could not be started.
    #[error("External command `{command}` failed: {reason}")]
    ExternalCommand { command: String, reason: String },

    /// Adapter state lock poisoned.
    #[error("Adapter state lock poisoned")]
    LockPoisoned,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::SourceSubtreeMissing { path } => vec![
                format!("Expected staged sources at {}", path.display()),
                "Run materialize from the generated project root".into(),
                "Check that the selected framework matches the staged template".into(),
            ],
            Self::AlreadyExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Choose a different module or --service-name".into(),
                "Nothing was modified".into(),
            ],
            Self::BaseModuleFailed { .. } | Self::BaseModuleMissing { .. } => vec![
                "The base module step did not complete".into(),
                "Directories created so far were left in place for inspection".into(),
                "Remove the service directory before retrying".into(),
            ],
            Self::ExternalCommand { command, .. } => vec![
                format!("Ensure `{command}` is installed and in your PATH"),
                "Check the command output above for details".into(),
            ],
            Self::InvalidParameters { path, .. } => vec![
                format!("Check the JSON in {}", path.display()),
                "Expected an object with string values".into(),
            ],
            Self::LockPoisoned => vec!["This appears to be a bug".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SourceSubtreeMissing { .. } => ErrorCategory::NotFound,
            Self::AlreadyExists { .. } => ErrorCategory::Validation,
            Self::InvalidParameters { .. } => ErrorCategory::Configuration,
            Self::FilesystemError { .. }
            | Self::BaseModuleFailed { .. }
            | Self::BaseModuleMissing { .. }
            | Self::ExternalCommand { .. }
            | Self::LockPoisoned => ErrorCategory::Internal,
        }
    }
}
