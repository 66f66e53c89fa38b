//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `kiln-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `BaseModuleCreator`: Host framework app skeleton creation
//!   - `VersionControl`: Repository initialisation
//!   - `ParameterSource`: Upstream parameter records
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{BaseModuleCreator, Filesystem, ParameterSource, VersionControl};

#[cfg(test)]
pub use output::{MockBaseModuleCreator, MockFilesystem, MockVersionControl};
