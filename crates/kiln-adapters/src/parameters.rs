//! JSON parameter records written by an upstream collector.
//!
//! Accepts the cookiecutter-style keys (`framework`, `db_type`, ...). Every
//! other key is kept verbatim in `extra`, non-string values stringified.

use std::fs;
use std::path::{Path, PathBuf};

use kiln_core::{
    application::{ApplicationError, ports::ParameterSource},
    domain::RawParameters,
    error::KilnResult,
};
use serde_json::{Map, Value};
use tracing::debug;

/// A parameter record stored as a flat JSON object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonParameterFile {
    path: PathBuf,
}

impl JsonParameterFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse an already-read document.
    pub fn parse(path: &Path, content: &str) -> KilnResult<RawParameters> {
        let invalid = |reason: String| ApplicationError::InvalidParameters {
            path: path.to_path_buf(),
            reason,
        };

        let value: Value = serde_json::from_str(content).map_err(|e| invalid(e.to_string()))?;
        let Value::Object(object) = value else {
            return Err(invalid("top-level value must be an object".into()).into());
        };

        Ok(from_object(object))
    }
}

impl ParameterSource for JsonParameterFile {
    fn load(&self) -> KilnResult<RawParameters> {
        let content =
            fs::read_to_string(&self.path).map_err(|e| ApplicationError::InvalidParameters {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        let raw = Self::parse(&self.path, &content)?;
        debug!(path = %self.path.display(), extra = raw.extra.len(), "Parameters loaded");
        Ok(raw)
    }
}

fn from_object(object: Map<String, Value>) -> RawParameters {
    let mut raw = RawParameters::default();

    for (key, value) in object {
        let text = match value {
            Value::Null => continue,
            Value::String(s) => s,
            other => other.to_string(),
        };
        let slot = match key.as_str() {
            "project_name" => &mut raw.project_name,
            "project_slug" => &mut raw.project_slug,
            "framework" | "variant" => &mut raw.framework,
            "db_type" | "database" => &mut raw.database,
            "author_name" | "author" => &mut raw.author_name,
            "email" => &mut raw.email,
            "description" => &mut raw.description,
            _ => {
                raw.extra.insert(key, text);
                continue;
            }
        };
        *slot = Some(text);
    }

    raw
}
