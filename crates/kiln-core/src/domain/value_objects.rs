//! Domain value objects: Variant and DatabaseKind.
//!
//! # Design
//!
//! These are pure value types: `Copy`, equality-by-value, no identity.
//! They hold NO layout knowledge. Subtree names, marker files and next steps
//! live in the variant registry in `entities/manifest.rs`; connection
//! templates live in `entities/database.rs`. This file's only job is to
//! define the closed sets, their string representations and their parsers.
//!
//! # Adding New Variants
//!
//! 1. Add the enum variant here
//! 2. Add the `as_str` arm, the `ALL` entry and the `FromStr` arm here
//! 3. Add a `VariantDef` entry in `manifest.rs`

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Variant ──────────────────────────────────────────────────────────────────

/// The mutually exclusive web framework choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    FastApi,
    Drf,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Self::FastApi, Self::Drf];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FastApi => "fastapi",
            Self::Drf => "drf",
        }
    }

    /// Identifiers of every registered variant, in registry order.
    pub fn known() -> Vec<&'static str> {
        Self::ALL.iter().map(Variant::as_str).collect()
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fastapi" => Ok(Self::FastApi),
            "drf" => Ok(Self::Drf),
            _ => Err(DomainError::UnknownVariant {
                id: s.to_string(),
                known: Self::known(),
            }),
        }
    }
}

// ── DatabaseKind ─────────────────────────────────────────────────────────────

/// The persistence backend the generated project is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseKind {
    Sqlite,
    Postgresql,
    Mysql,
}

impl DatabaseKind {
    pub const ALL: [DatabaseKind; 3] = [Self::Sqlite, Self::Postgresql, Self::Mysql];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Postgresql => "postgresql",
            Self::Mysql => "mysql",
        }
    }

    /// Whether the database runs as a separate network service.
    ///
    /// Network databases get a compose service and a `docker compose up`
    /// step; sqlite is a local file.
    pub const fn is_networked(self) -> bool {
        !matches!(self, Self::Sqlite)
    }

    pub fn known() -> Vec<&'static str> {
        Self::ALL.iter().map(DatabaseKind::as_str).collect()
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatabaseKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "postgresql" => Ok(Self::Postgresql),
            "mysql" => Ok(Self::Mysql),
            _ => Err(DomainError::UnknownDatabase {
                kind: s.to_string(),
                known: Self::known(),
            }),
        }
    }
}
