//! Kiln Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for Kiln, which
//! turns a staged multi-variant project tree into a single-variant project
//! and generates layered DDD modules inside it.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            kiln-cli (CLI)               │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (MaterializeService, ScaffoldService)  │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, BaseModuleCreator, VCS)    │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     kiln-adapters (Infrastructure)      │
//! │  (LocalFilesystem, GitCli, creators)    │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │ (ParameterRecord, VariantManifest,      │
//! │  DatabaseConfigurer, ScaffoldLayout)    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use kiln_core::prelude::*;
//!
//! # fn run(filesystem: Box<dyn Filesystem>) -> KilnResult<()> {
//! let record = ParameterRecord::from_raw(RawParameters {
//!     project_name: Some("Demo".into()),
//!     framework: Some("fastapi".into()),
//!     database: Some("postgresql".into()),
//!     ..RawParameters::default()
//! })?;
//!
//! let report = MaterializeService::new(filesystem).materialize(Path::new("demo"), &record)?;
//! for step in &report.next_steps {
//!     println!("{step}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        MaterializePlan, MaterializeReport, MaterializeService, ScaffoldReport, ScaffoldService,
        ports::{BaseModuleCreator, Filesystem, ParameterSource, VersionControl},
    };
    pub use crate::domain::{
        DatabaseConfigurer, DatabaseKind, EnvPayload, ParameterRecord, RawParameters, Resolution,
        ScaffoldLayout, Variant, VariantManifest,
    };
    pub use crate::error::{KilnError, KilnResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
