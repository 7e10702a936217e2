//! Override resolution.
//!
//! Merges the shared layer and one ecosystem layer into a deduplicated
//! template set. The merge runs in two explicit passes so that precedence is
//! a property of the algorithm, never of catalog declaration order:
//!
//! 1. **Shared pass**: every shared entry of the category is inserted. A
//!    second shared entry with an identity already seen replaces the first
//!    in place (last write wins within the layer).
//! 2. **Ecosystem pass**: every ecosystem-specific entry tagged for the
//!    requested ecosystem replaces the entry with the same identity, keeping
//!    its position, or is appended when the identity is new.
//!
//! Ecosystem-specific entries for other tags never take part.

use std::collections::HashMap;

use crate::domain::{Category, EcosystemTag, TemplateEntry, TemplateIdentity, TemplateRegistry};

/// Resolves `(category, ecosystem)` requests against a registry.
#[derive(Debug, Clone, Copy)]
pub struct OverrideResolver<'r> {
    registry: &'r TemplateRegistry,
}

impl<'r> OverrideResolver<'r> {
    pub fn new(registry: &'r TemplateRegistry) -> Self {
        Self { registry }
    }

    /// Resolve the template set for one request.
    ///
    /// Unknown categories and tags resolve to whatever the shared layer
    /// holds, which for an unknown category is nothing.
    pub fn resolve(&self, category: &Category, tag: &EcosystemTag) -> Vec<TemplateEntry> {
        let mut merged = Merge::default();

        for entry in self.registry.entries_for(category).filter(|e| e.is_shared()) {
            merged.upsert(entry);
        }

        for entry in self
            .registry
            .entries_for(category)
            .filter(|e| !e.is_shared() && e.applies_to(tag))
        {
            merged.upsert(entry);
        }

        merged.into_entries()
    }
}

/// Ordered map from identity to entry.
#[derive(Default)]
struct Merge<'r> {
    order: Vec<&'r TemplateEntry>,
    index: HashMap<&'r TemplateIdentity, usize>,
}

impl<'r> Merge<'r> {
    fn upsert(&mut self, entry: &'r TemplateEntry) {
        match self.index.get(&entry.identity) {
            Some(&slot) => self.order[slot] = entry,
            None => {
                self.index.insert(&entry.identity, self.order.len());
                self.order.push(entry);
            }
        }
    }

    fn into_entries(self) -> Vec<TemplateEntry> {
        self.order.into_iter().cloned().collect()
    }
}
