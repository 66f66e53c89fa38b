//! Variant registry and resolution.
//!
//! Each variant is described exactly once by a [`VariantDef`] in
//! [`VARIANT_REGISTRY`]. Subtree names, placeholder markers and next-step
//! hints all derive from that table; nothing else in the crate matches on
//! [`Variant`] to find a path.

use serde::Serialize;

use crate::domain::{
    error::DomainError,
    value_objects::{DatabaseKind, Variant},
};

/// Transient file written by the upstream collector, naming the chosen variant.
pub const SELECTION_MARKER: &str = "framework_selection.txt";

/// Environment configuration file written at the project root.
pub const ENV_FILE: &str = ".env";

/// Compose file written at the project root.
pub const COMPOSE_FILE: &str = "docker-compose.yml";

/// Static description of one variant's staging artifacts.
#[derive(Debug, Clone, Copy)]
pub struct VariantDef {
    pub variant: Variant,
    /// Staging subtree holding this variant's sources.
    pub subtree: &'static str,
    /// Zero-byte sentinel present in the staged tree.
    pub placeholder: &'static str,
    pub display_name: &'static str,
    /// Post-generation hints; `{slug}` is replaced with the project slug.
    pub next_steps: &'static [&'static str],
}

pub static VARIANT_REGISTRY: &[VariantDef] = &[
    VariantDef {
        variant: Variant::FastApi,
        subtree: "fastapi_template",
        placeholder: "PLACEHOLDER_FASTAPI",
        display_name: "FastAPI",
        next_steps: &[
            "cd {slug}",
            "uv sync",
            "uv run fastapi dev src/{slug}/main.py",
        ],
    },
    VariantDef {
        variant: Variant::Drf,
        subtree: "drf_template",
        placeholder: "PLACEHOLDER_DRF",
        display_name: "Django REST Framework",
        next_steps: &[
            "cd {slug}",
            "uv sync",
            "uv run python src/{slug}/manage.py migrate",
            "uv run python src/{slug}/manage.py runserver",
        ],
    },
];

/// Which staging subtree to keep and which to throw away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub variant: Variant,
    pub keep: &'static str,
    pub discard: Vec<&'static str>,
}

impl Resolution {
    /// Every variant subtree, discard subtrees first and the keep subtree last.
    ///
    /// Deleting in this order means that whenever the keep subtree is gone,
    /// every discard subtree is already gone too.
    pub fn removal_order(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.discard
            .iter()
            .copied()
            .chain(std::iter::once(self.keep))
    }

    /// Name the keep subtree is moved to before it is deleted.
    pub fn keep_tombstone(&self) -> String {
        VariantManifest::tombstone(self.keep)
    }
}

/// Read-only view over the closed variant registry.
pub struct VariantManifest;

impl VariantManifest {
    /// Look up a variant's definition.
    pub fn def(variant: Variant) -> &'static VariantDef {
        VARIANT_REGISTRY
            .iter()
            .find(|d| d.variant == variant)
            .unwrap_or_else(|| unreachable!("variant {variant} missing from VARIANT_REGISTRY"))
    }

    /// Resolve a typed variant. Infallible: the registry is closed.
    pub fn resolve(variant: Variant) -> Resolution {
        let keep = Self::def(variant).subtree;
        let discard = VARIANT_REGISTRY
            .iter()
            .filter(|d| d.variant != variant)
            .map(|d| d.subtree)
            .collect();

        Resolution {
            variant,
            keep,
            discard,
        }
    }

    /// Resolve an identifier as written by a producer.
    pub fn resolve_id(id: &str) -> Result<Resolution, DomainError> {
        Ok(Self::resolve(id.parse()?))
    }

    /// Every registered staging subtree name.
    pub fn all_subtrees() -> impl Iterator<Item = &'static str> {
        VARIANT_REGISTRY.iter().map(|d| d.subtree)
    }

    /// Name a subtree carries while it is being deleted.
    ///
    /// A half-deleted tree never sits under the subtree's own name, so it is
    /// never mistaken for a complete copy source.
    pub fn tombstone(subtree: &str) -> String {
        format!(".{subtree}.removing")
    }

    /// Every registered tombstone name.
    pub fn all_tombstones() -> impl Iterator<Item = String> {
        Self::all_subtrees().map(Self::tombstone)
    }

    /// Every registered placeholder marker name.
    pub fn all_placeholders() -> impl Iterator<Item = &'static str> {
        VARIANT_REGISTRY.iter().map(|d| d.placeholder)
    }

    /// Next-step hints for a freshly materialized project.
    pub fn next_steps(variant: Variant, database: DatabaseKind, slug: &str) -> Vec<String> {
        let mut steps: Vec<String> = Self::def(variant)
            .next_steps
            .iter()
            .map(|s| s.replace("{slug}", slug))
            .collect();

        if database.is_networked() {
            // Start the database before migrating or serving.
            steps.insert(1, "docker compose up -d db".into());
        }

        steps
    }
}
