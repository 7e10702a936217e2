//! Template Service - catalog queries.
//!
//! Read-only views of the catalog for listing and inspection. Separated from
//! ScaffoldService for single responsibility.

use serde::Serialize;

use crate::{
    application::ports::TemplateStore,
    domain::{Category, EcosystemTag, OverrideResolver, TemplateEntry},
    error::StencilResult,
};

/// Information about a catalog entry for display purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateInfo {
    pub identity: String,
    pub category: String,
    pub scope: String,
    /// Empty for shared templates.
    pub ecosystems: Vec<String>,
    pub destination: String,
    pub template_ref: String,
    pub required: bool,
}

impl From<&TemplateEntry> for TemplateInfo {
    fn from(entry: &TemplateEntry) -> Self {
        Self {
            identity: entry.identity.to_string(),
            category: entry.category.to_string(),
            scope: entry.scope.to_string(),
            ecosystems: entry.ecosystems.iter().map(ToString::to_string).collect(),
            destination: entry.destination.clone(),
            template_ref: entry.template_ref.to_string(),
            required: entry.required,
        }
    }
}

/// Optional filters for [`TemplateService::list`].
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    pub category: Option<Category>,
    /// When set, show the *resolved* view for this ecosystem: overridden
    /// shared entries are hidden.
    pub ecosystem: Option<EcosystemTag>,
}

/// Summary of the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
    pub categories: Vec<String>,
    pub ecosystems: Vec<String>,
    pub templates: usize,
    pub skipped: Vec<String>,
}

/// Service for catalog queries.
pub struct TemplateService {
    store: Box<dyn TemplateStore>,
}

impl TemplateService {
    /// Create a new template service.
    pub fn new(store: Box<dyn TemplateStore>) -> Self {
        Self { store }
    }

    /// List catalog entries.
    pub fn list(&self, filter: &CatalogFilter) -> StencilResult<Vec<TemplateInfo>> {
        let registry = self.store.registry()?;

        let infos = match (&filter.category, &filter.ecosystem) {
            (Some(category), Some(tag)) => OverrideResolver::new(&registry)
                .resolve(category, tag)
                .iter()
                .map(TemplateInfo::from)
                .collect(),
            (None, Some(tag)) => {
                let resolver = OverrideResolver::new(&registry);
                registry
                    .categories()
                    .into_iter()
                    .flat_map(|category| resolver.resolve(category, tag))
                    .map(|entry| TemplateInfo::from(&entry))
                    .collect()
            }
            (Some(category), None) => registry
                .entries_for(category)
                .map(TemplateInfo::from)
                .collect(),
            (None, None) => registry.entries().iter().map(TemplateInfo::from).collect(),
        };

        Ok(infos)
    }

    /// Categories, ecosystems and skipped templates of the catalog.
    pub fn summary(&self) -> StencilResult<CatalogSummary> {
        let registry = self.store.registry()?;
        Ok(CatalogSummary {
            categories: registry
                .categories()
                .into_iter()
                .map(ToString::to_string)
                .collect(),
            ecosystems: registry
                .ecosystems()
                .into_iter()
                .map(ToString::to_string)
                .collect(),
            templates: registry.len(),
            skipped: registry.skipped().iter().map(ToString::to_string).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockTemplateStore;
    use crate::domain::{TemplateIdentity, TemplateRegistry};

    fn entry(id: &str, dest: &str, tag: Option<&str>) -> TemplateEntry {
        let category: Category = id.split('/').next().unwrap_or("service").parse().unwrap();
        let mut builder = TemplateEntry::builder()
            .identity(TemplateIdentity::from_raw(id))
            .template_ref(format!("{}/{id}.tpl", tag.unwrap_or("common")))
            .destination(dest)
            .category(category);
        if let Some(tag) = tag {
            builder = builder.ecosystem(EcosystemTag::new(tag));
        }
        builder.build().unwrap()
    }

    fn service() -> TemplateService {
        let mut store = MockTemplateStore::new();
        store.expect_registry().returning(|| {
            Ok(TemplateRegistry::builder()
                .entry(entry("service/env", ".env", None))
                .entry(entry("service/env", ".env.go", Some("go")))
                .entry(entry("service/main.py", "main.py", Some("py")))
                .entry(entry("module/model.go", "{{MODULE_PATH}}/m.go", Some("go")))
                .build())
        });
        TemplateService::new(Box::new(store))
    }

    #[test]
    fn list_without_filters_shows_whole_catalog() {
        assert_eq!(service().list(&CatalogFilter::default()).unwrap().len(), 4);
    }

    #[test]
    fn list_for_ecosystem_shows_resolved_view() {
        let infos = service()
            .list(&CatalogFilter {
                category: Some(Category::Service),
                ecosystem: Some(EcosystemTag::new("go")),
            })
            .unwrap();

        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].destination, ".env.go");
        assert_eq!(infos[0].ecosystems, vec!["go".to_string()]);
    }

    #[test]
    fn list_for_ecosystem_spans_categories() {
        let infos = service()
            .list(&CatalogFilter {
                category: None,
                ecosystem: Some(EcosystemTag::new("go")),
            })
            .unwrap();
        let ids: Vec<_> = infos.iter().map(|i| i.identity.as_str()).collect();
        assert_eq!(ids, vec!["service/env", "module/model.go"]);
    }

    #[test]
    fn summary_lists_ecosystems() {
        let summary = service().summary().unwrap();
        assert_eq!(summary.ecosystems, vec!["go", "py"]);
        assert_eq!(summary.categories, vec!["service", "module"]);
        assert_eq!(summary.templates, 4);
    }
}
