//! Catalog assembly shared by every template store.
//!
//! # Layout
//!
//! ```text
//! <root>/
//! ├── stencil.toml                       ← optional manifest
//! ├── templates-common/<category>/*.tpl  ← shared
//! └── templates-<tag>/<category>/*.tpl   ← ecosystem-specific for <tag>
//! ```
//!
//! # `stencil.toml` format
//!
//! ```toml
//! required = ["service/env"]
//!
//! [directories]
//! go = ["cmd", "internal/config"]
//!
//! [registration.go]
//! entry_point = "cmd/main.go"
//! marker      = "// USE THIS COMMENT TO AUTO-GENERATE NEW MODULES"
//! snippet     = "{{module_name}}.Register(router)"
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::{debug, warn};

use stencil_core::{
    domain::{
        Category, EcosystemTag, ModuleRegistration, RawTemplate, Scope, TemplateIdentity,
        TemplateRef, TemplateRegistry,
    },
    error::{StencilError, StencilResult},
};

/// Name of the manifest file at a template root.
pub const MANIFEST_FILE: &str = "stencil.toml";

/// Directory prefix of every template layer.
const LAYER_PREFIX: &str = "templates-";

/// Layer holding shared templates.
const SHARED_LAYER: &str = "common";

/// Template file extension.
const TEMPLATE_EXT: &str = ".tpl";

// ── Manifest ──────────────────────────────────────────────────────────────────

/// Deserialised `stencil.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogManifest {
    /// Identities flagged as required, e.g. `"service/env"`.
    pub required: Vec<String>,
    /// Baseline directories per ecosystem tag.
    pub directories: BTreeMap<String, Vec<String>>,
    /// Module registration per ecosystem tag.
    pub registration: BTreeMap<String, ModuleRegistration>,
}

impl CatalogManifest {
    /// Parse manifest text. `source` names the file in error messages.
    pub fn parse(text: &str, source: &str) -> StencilResult<Self> {
        toml::from_str(text).map_err(|e| StencilError::Configuration {
            message: format!("failed to parse '{source}': {e}"),
        })
    }
}

// ── Layout ────────────────────────────────────────────────────────────────────

/// Where a template file sits in the layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateLocation {
    pub scope: Scope,
    pub ecosystem: Option<EcosystemTag>,
    pub category: Category,
    pub name: String,
}

impl TemplateLocation {
    /// Classify a root-relative path such as `templates-go/service/main.go.tpl`.
    ///
    /// Returns `None` for anything that is not a template in the layout
    /// (the manifest, READMEs, files nested too deep).
    pub fn parse(relative: &str) -> Option<Self> {
        let mut parts = relative.split('/');
        let (layer, category, name) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() || !name.ends_with(TEMPLATE_EXT) {
            return None;
        }

        let layer = layer.strip_prefix(LAYER_PREFIX)?;
        let category: Category = category.parse().ok()?;

        let (scope, ecosystem) = if layer == SHARED_LAYER {
            (Scope::Shared, None)
        } else {
            (Scope::EcosystemSpecific, Some(layer.parse().ok()?))
        };

        Some(Self {
            scope,
            ecosystem,
            category,
            name: name.to_string(),
        })
    }
}

// ── Assembly ──────────────────────────────────────────────────────────────────

/// Build a registry from `(relative path, body)` pairs plus a manifest.
///
/// Paths outside the layout are ignored. Templates that cannot be placed
/// are skipped with a warning.
pub fn assemble<'a, I>(templates: I, manifest: &CatalogManifest) -> StencilResult<TemplateRegistry>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut builder = TemplateRegistry::builder();

    for (path, body) in templates {
        let Some(location) = TemplateLocation::parse(path) else {
            debug!(path, "not a template, ignoring");
            continue;
        };

        let placed = builder.discover(RawTemplate {
            template_ref: TemplateRef::new(path),
            name: location.name,
            category: location.category,
            scope: location.scope,
            ecosystem: location.ecosystem,
            body: body.to_string(),
        })?;
        if !placed {
            warn!(template = path, "skipping template: no usable destination");
        }
    }

    for (tag, dirs) in &manifest.directories {
        builder = builder.directories(parse_tag(tag)?, dirs.iter().cloned());
    }
    for (tag, registration) in &manifest.registration {
        builder = builder.registration(parse_tag(tag)?, registration.clone());
    }

    let registry = builder
        .require(manifest.required.iter().map(TemplateIdentity::from_raw))
        .build();

    debug!(
        templates = registry.len(),
        skipped = registry.skipped().len(),
        "catalog assembled"
    );
    Ok(registry)
}

fn parse_tag(tag: &str) -> StencilResult<EcosystemTag> {
    tag.parse::<EcosystemTag>().map_err(|e| StencilError::Configuration {
        message: format!("{MANIFEST_FILE}: {e}"),
    })
}
