//! The template catalog.
//!
//! A [`TemplateRegistry`] is built once (from the builtin catalog or a
//! template directory) and is read-only afterwards, so it can be shared
//! between threads and resolutions without locking.
//!
//! Entries arrive in one of two ways:
//!
//! - fully described, via [`RegistryBuilder::entry`];
//! - as a [`RawTemplate`] (name, scope and body), via
//!   [`RegistryBuilder::discover`], which runs the metadata extractor and
//!   records unplaceable templates in [`TemplateRegistry::skipped`].

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{
    Category, DirectorySet, DomainError, EcosystemTag, ModuleRegistration, Scope, TemplateEntry,
    TemplateIdentity, TemplateRef, metadata,
};

/// A template body found in storage, before placement.
#[derive(Debug, Clone)]
pub struct RawTemplate {
    pub template_ref: TemplateRef,
    /// File name, e.g. `model.go.tpl`.
    pub name: String,
    pub category: Category,
    pub scope: Scope,
    /// Ignored for shared templates.
    pub ecosystem: Option<EcosystemTag>,
    pub body: String,
}

/// Static catalog of template entries plus per-ecosystem conventions.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    entries: Vec<TemplateEntry>,
    directories: BTreeMap<EcosystemTag, Vec<String>>,
    registrations: BTreeMap<EcosystemTag, ModuleRegistration>,
    skipped: Vec<TemplateRef>,
}

impl TemplateRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// All entries of a category, in declaration order, for every ecosystem.
    pub fn entries_for<'a>(
        &'a self,
        category: &'a Category,
    ) -> impl Iterator<Item = &'a TemplateEntry> + 'a {
        self.entries.iter().filter(move |e| &e.category == category)
    }

    /// Directories always created for `tag`, whatever resolves.
    ///
    /// Unknown tags have no baseline.
    pub fn baseline_directories(&self, tag: &EcosystemTag) -> DirectorySet {
        self.directories
            .get(tag)
            .map(|dirs| dirs.iter().collect())
            .unwrap_or_default()
    }

    pub fn registration_for(&self, tag: &EcosystemTag) -> Option<&ModuleRegistration> {
        self.registrations.get(tag)
    }

    pub fn entries(&self) -> &[TemplateEntry] {
        &self.entries
    }

    /// Templates dropped during discovery because they could not be placed.
    pub fn skipped(&self) -> &[TemplateRef] {
        &self.skipped
    }

    /// Every tag the catalog mentions, in sorted order.
    pub fn ecosystems(&self) -> BTreeSet<&EcosystemTag> {
        self.entries
            .iter()
            .flat_map(|e| e.ecosystems.iter())
            .chain(self.directories.keys())
            .chain(self.registrations.keys())
            .collect()
    }

    /// Every category the catalog has entries for.
    pub fn categories(&self) -> BTreeSet<&Category> {
        self.entries.iter().map(|e| &e.category).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder for [`TemplateRegistry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    registry: TemplateRegistry,
    required: BTreeSet<TemplateIdentity>,
}

impl RegistryBuilder {
    pub fn entry(mut self, entry: TemplateEntry) -> Self {
        self.registry.entries.push(entry);
        self
    }

    /// Place a raw template through the metadata extractor.
    ///
    /// Unplaceable templates are not an error; they are remembered in
    /// [`TemplateRegistry::skipped`]. Returns `Ok(false)` in that case. A
    /// template is unplaceable when no destination can be found for it, or
    /// when its destination is empty, absolute or escapes the root.
    pub fn discover(&mut self, raw: RawTemplate) -> Result<bool, DomainError> {
        let Some(meta) = metadata::extract(&raw.body, &raw.name, &raw.category) else {
            self.registry.skipped.push(raw.template_ref);
            return Ok(false);
        };

        let identity = TemplateIdentity::new(&raw.category, &raw.name);
        let mut builder = TemplateEntry::builder()
            .identity(identity)
            .template_ref(raw.template_ref.as_str())
            .category(raw.category)
            .metadata(meta);

        builder = match (raw.scope, raw.ecosystem) {
            (Scope::EcosystemSpecific, Some(tag)) => builder.ecosystem(tag),
            (Scope::EcosystemSpecific, None) => {
                return Err(DomainError::InvalidTemplate(format!(
                    "'{}' is ecosystem-specific but has no ecosystem",
                    raw.template_ref
                )));
            }
            (Scope::Shared, _) => builder.shared(),
        };

        match builder.build() {
            Ok(entry) => {
                self.registry.entries.push(entry);
                Ok(true)
            }
            // An absolute or escaping destination makes the template unplaceable.
            Err(_) => {
                self.registry.skipped.push(raw.template_ref);
                Ok(false)
            }
        }
    }

    /// Set the baseline directories for an ecosystem, replacing any earlier
    /// declaration.
    pub fn directories<I, S>(mut self, tag: EcosystemTag, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registry
            .directories
            .insert(tag, dirs.into_iter().map(Into::into).collect());
        self
    }

    pub fn registration(mut self, tag: EcosystemTag, registration: ModuleRegistration) -> Self {
        self.registry.registrations.insert(tag, registration);
        self
    }

    /// Mark identities as required. Applied to every matching entry at build
    /// time, whichever way it was added.
    pub fn require<I>(mut self, identities: I) -> Self
    where
        I: IntoIterator<Item = TemplateIdentity>,
    {
        self.required.extend(identities);
        self
    }

    pub fn build(mut self) -> TemplateRegistry {
        if !self.required.is_empty() {
            for entry in &mut self.registry.entries {
                if self.required.contains(&entry.identity) {
                    entry.required = true;
                }
            }
        }
        self.registry
    }
}
