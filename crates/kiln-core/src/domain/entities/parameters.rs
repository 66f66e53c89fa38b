//! Resolved project parameters.
//!
//! The upstream prompt collector hands over loosely-typed strings
//! ([`RawParameters`]); [`ParameterRecord`] is the validated, immutable form
//! the materializer consumes. Parsing is where unknown variants and database
//! kinds are rejected, so nothing downstream can see an unchecked identifier.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{
    error::DomainError,
    value_objects::{DatabaseKind, Variant},
};

/// Parameters as supplied by a producer, before validation.
///
/// Every field is optional so that several sources (flags, parameter file,
/// selection marker, config defaults) can be layered with [`RawParameters::or`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParameters {
    pub project_name: Option<String>,
    pub project_slug: Option<String>,
    pub framework: Option<String>,
    pub database: Option<String>,
    pub author_name: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub extra: BTreeMap<String, String>,
}

impl RawParameters {
    /// Fill every missing field from `fallback`. `self` wins on conflicts.
    pub fn or(self, fallback: RawParameters) -> RawParameters {
        let mut extra = fallback.extra;
        extra.extend(self.extra);

        RawParameters {
            project_name: self.project_name.or(fallback.project_name),
            project_slug: self.project_slug.or(fallback.project_slug),
            framework: self.framework.or(fallback.framework),
            database: self.database.or(fallback.database),
            author_name: self.author_name.or(fallback.author_name),
            email: self.email.or(fallback.email),
            description: self.description.or(fallback.description),
            extra,
        }
    }
}

/// Validated, immutable project parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterRecord {
    project_name: String,
    project_slug: String,
    variant: Variant,
    database: DatabaseKind,
    author_name: Option<String>,
    email: Option<String>,
    description: Option<String>,
    extra: BTreeMap<String, String>,
}

impl ParameterRecord {
    /// Validate raw parameters.
    ///
    /// Order matters for error reporting: identifiers are checked before the
    /// project name so that a bad `--framework` is reported even when other
    /// fields are also missing.
    pub fn from_raw(raw: RawParameters) -> Result<Self, DomainError> {
        let variant: Variant = raw
            .framework
            .as_deref()
            .ok_or(DomainError::MissingRequiredField { field: "framework" })?
            .parse()?;

        let database: DatabaseKind = raw
            .database
            .as_deref()
            .ok_or(DomainError::MissingRequiredField { field: "database" })?
            .parse()?;

        let project_name = raw
            .project_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or(DomainError::MissingRequiredField {
                field: "project_name",
            })?;

        let project_slug = match raw.project_slug {
            Some(slug) => slug.trim().to_string(),
            None => slugify(&project_name),
        };
        validate_slug(&project_slug)?;

        Ok(Self {
            project_name,
            project_slug,
            variant,
            database,
            author_name: raw.author_name,
            email: raw.email,
            description: raw.description,
            extra: raw.extra,
        })
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn project_slug(&self) -> &str {
        &self.project_slug
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn database(&self) -> DatabaseKind {
        self.database
    }

    pub fn author_name(&self) -> Option<&str> {
        self.author_name.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }
}

/// Derive a project slug from a display name.
///
/// Lowercases, turns whitespace and underscore runs into a single `-`, drops
/// anything outside `[a-z0-9-]` and trims leading/trailing hyphens.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for ch in name.chars() {
        if ch.is_whitespace() || ch == '_' || ch == '-' {
            pending_dash = !slug.is_empty();
            continue;
        }
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash {
                slug.push('-');
                pending_dash = false;
            }
            slug.push(ch);
        }
    }

    slug
}

/// Explicit slugs must use the same `[a-z0-9-]` alphabet [`slugify`] emits.
///
/// The slug lands unquoted in `.env` and the compose file, so quotes, `#`,
/// `=` and path separators can never reach them.
fn validate_slug(slug: &str) -> Result<(), DomainError> {
    let invalid = |reason: String| DomainError::InvalidProjectSlug {
        slug: slug.to_string(),
        reason,
    };

    if slug.is_empty() {
        return Err(invalid("slug cannot be empty".into()));
    }
    match slug
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
    {
        Some(bad) => Err(invalid(format!(
            "character '{bad}' is not allowed; use lowercase letters, digits and '-'"
        ))),
        None => Ok(()),
    }
}
