//! Templates compiled into the binary.
//!
//! The bodies live under `crates/stencil-adapters/templates/` in the same
//! layout a [`DirectoryStore`](super::DirectoryStore) reads; copying that
//! directory is a valid starting point for a custom template root.

use tracing::instrument;

use stencil_core::{
    application::{ApplicationError, ports::TemplateStore},
    domain::{TemplateRef, TemplateRegistry},
    error::{Context, StencilResult},
};

use super::catalog::{self, CatalogManifest, MANIFEST_FILE};

macro_rules! embed {
    ($($path:literal),* $(,)?) => {
        &[$(($path, include_str!(concat!("../../templates/", $path)))),*]
    };
}

/// `(relative path, body)` for every builtin template, in catalog order.
pub static BUILTIN_TEMPLATES: &[(&str, &str)] = embed![
    "templates-common/service/env.tpl",
    "templates-common/service/dockerignore.tpl",
    "templates-go/service/env.tpl",
    "templates-go/service/go.mod.tpl",
    "templates-go/service/main.go.tpl",
    "templates-go/service/config.go.tpl",
    "templates-go/module/model.go.tpl",
    "templates-go/module/repository.go.tpl",
    "templates-go/module/service.go.tpl",
    "templates-go/module/use-cases.go.tpl",
    "templates-py/service/main.py.tpl",
    "templates-py/service/config.py.tpl",
    "templates-py/service/database.py.tpl",
    "templates-py/service/Dockerfile.tpl",
    "templates-py/service/docker-compose.yml.tpl",
    "templates-py/service/requirements.txt.tpl",
    "templates-py/module/model.py.tpl",
    "templates-py/module/repository.py.tpl",
    "templates-py/module/service.py.tpl",
    "templates-py/module/use-cases.py.tpl",
];

/// Builtin catalog manifest.
pub static BUILTIN_MANIFEST: &str = include_str!("../../templates/stencil.toml");

/// Read-only store over [`BUILTIN_TEMPLATES`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinStore;

impl BuiltinStore {
    pub fn new() -> Self {
        Self
    }

    /// The parsed builtin manifest. A failure here is a packaging bug.
    pub fn manifest() -> StencilResult<CatalogManifest> {
        CatalogManifest::parse(BUILTIN_MANIFEST, MANIFEST_FILE)
            .context("builtin catalog manifest is invalid")
    }
}

impl TemplateStore for BuiltinStore {
    #[instrument(skip_all, fields(store = "builtin"))]
    fn registry(&self) -> StencilResult<TemplateRegistry> {
        catalog::assemble(BUILTIN_TEMPLATES.iter().copied(), &Self::manifest()?)
    }

    fn read(&self, template_ref: &TemplateRef) -> StencilResult<String> {
        BUILTIN_TEMPLATES
            .iter()
            .find(|(path, _)| *path == template_ref.as_str())
            .map(|(_, body)| body.to_string())
            .ok_or_else(|| {
                ApplicationError::TemplateNotFound {
                    template_ref: template_ref.to_string(),
                }
                .into()
            })
    }
}
