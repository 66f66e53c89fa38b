//! Application layer for Kiln.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (MaterializeService, ScaffoldService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    DEFAULT_SOURCE_DIR, INITIAL_COMMIT_MESSAGE, MaterializePlan, MaterializeReport,
    MaterializeService, ScaffoldReport, ScaffoldService,
};

// Re-export port traits (for adapter implementation)
pub use ports::{BaseModuleCreator, Filesystem, ParameterSource, VersionControl};

pub use error::ApplicationError;
