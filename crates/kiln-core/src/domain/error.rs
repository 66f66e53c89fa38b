// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (reports and tests compare them)
/// - Categorizable (for CLI display and exit codes)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Configuration Errors (never defaulted)
    // ========================================================================
    #[error("unknown framework variant '{id}' (expected one of: {})", known.join(", "))]
    UnknownVariant {
        id: String,
        known: Vec<&'static str>,
    },

    #[error("unknown database kind '{kind}' (expected one of: {})", known.join(", "))]
    UnknownDatabase {
        kind: String,
        known: Vec<&'static str>,
    },

    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("'{name}' is not a valid module name: {reason}")]
    InvalidModuleName { name: String, reason: String },

    #[error("invalid project slug '{slug}': {reason}")]
    InvalidProjectSlug { slug: String, reason: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnknownVariant { id, known } => {
                let mut out = vec![format!("'{id}' is not a known framework")];
                out.push("Available frameworks:".into());
                out.extend(known.iter().map(|k| format!("  • {k}")));
                out.push("Example: kiln materialize --framework fastapi --database sqlite".into());
                out
            }
            Self::UnknownDatabase { kind, known } => {
                let mut out = vec![format!("'{kind}' is not a supported database")];
                out.push("Supported databases:".into());
                out.extend(known.iter().map(|k| format!("  • {k}")));
                out
            }
            Self::InvalidModuleName { .. } => vec![
                "Module names must be valid Python identifiers".into(),
                "Use letters, digits and underscores; do not start with a digit".into(),
                "Examples: orders, user_profile, billing2".into(),
            ],
            Self::InvalidProjectSlug { .. } => vec![
                "Pass an explicit --slug".into(),
                "Slugs may contain lowercase letters, digits and hyphens".into(),
            ],
            Self::MissingRequiredField { field } => vec![
                format!("Provide a value for '{field}'"),
                "Use a command-line flag, a --params file or the config defaults".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownVariant { .. } | Self::UnknownDatabase { .. } => {
                ErrorCategory::Configuration
            }
            Self::InvalidModuleName { .. }
            | Self::InvalidProjectSlug { .. }
            | Self::AbsolutePathNotAllowed { .. }
            | Self::MissingRequiredField { .. } => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
}
