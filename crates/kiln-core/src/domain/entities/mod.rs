pub mod common;
pub mod database;
pub mod layout;
pub mod manifest;
pub mod parameters;

pub use crate::domain::DomainError;
pub use database::{DatabaseConfigurer, EnvPayload};
pub use layout::{ModuleName, ScaffoldLayout};
pub use manifest::{Resolution, VariantManifest};
pub use parameters::{ParameterRecord, RawParameters};
