// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Kiln.
//!
//! This module contains pure business logic with ZERO I/O.
//! Copying, deleting and writing happen in the application layer via ports
//! (traits) implemented in `kiln-adapters`.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or process calls
//! - **Closed registries**: variants and database kinds are known at build time
//! - **Immutable entities**: `ParameterRecord` and `ScaffoldLayout` never change after construction
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod value_objects;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use entities::{
    database::{DatabaseConfigurer, EnvPayload, SECRET_KEY_PLACEHOLDER},
    layout::{
        INFRASTRUCTURE_SUBDIRS, LAYER_DIRECTORIES, MODULE_MARKER, ModuleName, ScaffoldLayout,
    },
    manifest::{
        COMPOSE_FILE, ENV_FILE, Resolution, SELECTION_MARKER, VARIANT_REGISTRY, VariantDef,
        VariantManifest,
    },
    parameters::{ParameterRecord, RawParameters, slugify},
};

pub use error::{DomainError, ErrorCategory};

pub use value_objects::{DatabaseKind, Variant};

pub use entities::common::RelativePath;
pub use validation::DomainValidator;
