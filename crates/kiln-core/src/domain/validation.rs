use std::path::Path;

use crate::domain::{
    entities::{ParameterRecord, RawParameters, ScaffoldLayout},
    error::DomainError,
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across services.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_parameters(raw: RawParameters) -> Result<ParameterRecord, DomainError> {
        ParameterRecord::from_raw(raw)
    }

    pub fn validate_scaffold(
        source_root: &Path,
        module: &str,
        service: Option<&str>,
    ) -> Result<ScaffoldLayout, DomainError> {
        ScaffoldLayout::new(source_root, module, service)
    }
}
