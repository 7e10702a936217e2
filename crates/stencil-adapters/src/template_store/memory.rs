//! In-memory template store.

use std::sync::{Arc, RwLock};

use stencil_core::{
    application::{ApplicationError, ports::TemplateStore},
    domain::{TemplateRef, TemplateRegistry},
    error::StencilResult,
};

use super::{
    builtin::{BUILTIN_TEMPLATES, BuiltinStore},
    catalog::{self, CatalogManifest},
};

/// Thread-safe, mutable template store.
///
/// Paths follow the on-disk layout (`templates-<layer>/<category>/<name>.tpl`).
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    /// Insertion order is catalog order.
    templates: Vec<(String, String)>,
    manifest: CatalogManifest,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the builtin catalog.
    pub fn with_builtin() -> StencilResult<Self> {
        let store = Self::new();
        for (path, body) in BUILTIN_TEMPLATES {
            store.insert(*path, *body)?;
        }
        store.set_manifest(BuiltinStore::manifest()?)?;
        Ok(store)
    }

    /// Add a template, or replace the body of an existing path in place.
    pub fn insert(&self, path: impl Into<String>, body: impl Into<String>) -> StencilResult<()> {
        let (path, body) = (path.into(), body.into());
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        match inner.templates.iter_mut().find(|(p, _)| *p == path) {
            Some(slot) => slot.1 = body,
            None => inner.templates.push((path, body)),
        }
        Ok(())
    }

    pub fn set_manifest(&self, manifest: CatalogManifest) -> StencilResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.manifest = manifest;
        Ok(())
    }

    /// Get the number of stored templates.
    pub fn len(&self) -> usize {
        self.inner.read().map(|i| i.templates.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all templates and the manifest.
    pub fn clear(&self) -> StencilResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.templates.clear();
        inner.manifest = CatalogManifest::default();
        Ok(())
    }
}

impl TemplateStore for InMemoryStore {
    fn registry(&self) -> StencilResult<TemplateRegistry> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        catalog::assemble(
            inner
                .templates
                .iter()
                .map(|(path, body)| (path.as_str(), body.as_str())),
            &inner.manifest,
        )
    }

    fn read(&self, template_ref: &TemplateRef) -> StencilResult<String> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner
            .templates
            .iter()
            .find(|(path, _)| path == template_ref.as_str())
            .map(|(_, body)| body.clone())
            .ok_or_else(|| {
                ApplicationError::TemplateNotFound {
                    template_ref: template_ref.to_string(),
                }
                .into()
            })
    }
}
