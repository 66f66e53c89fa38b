//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "materialize a tree" or "generate a module".

pub mod materialize_service;
pub mod scaffold_service;

pub use materialize_service::{
    INITIAL_COMMIT_MESSAGE, MaterializePlan, MaterializeReport, MaterializeService,
};
pub use scaffold_service::{DEFAULT_SOURCE_DIR, ScaffoldReport, ScaffoldService};
