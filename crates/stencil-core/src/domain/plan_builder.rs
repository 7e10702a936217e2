//! Plan building: resolved entries + variables → [`ResolutionPlan`].

use std::path::Path;

use crate::domain::{
    Category, EcosystemTag, OverrideResolver, PlannedFile, ResolutionPlan,
    TemplateEntry, TemplateRegistry, Variables,
};

/// Turns resolved template entries into a materialization plan.
///
/// Pure: no I/O, no ambient state. The same inputs always yield an equal
/// plan.
#[derive(Debug, Clone, Copy)]
pub struct PlanBuilder<'r> {
    registry: &'r TemplateRegistry,
}

impl<'r> PlanBuilder<'r> {
    pub fn new(registry: &'r TemplateRegistry) -> Self {
        Self { registry }
    }

    /// Resolve and build in one step.
    pub fn plan(
        &self,
        category: &Category,
        tag: &EcosystemTag,
        variables: &Variables,
    ) -> ResolutionPlan {
        let resolved = OverrideResolver::new(self.registry).resolve(category, tag);
        self.build(category, &resolved, tag, variables)
    }

    /// Build a plan from an already resolved entry list.
    ///
    /// Directories are the ecosystem baseline, then for each entry the
    /// parent of its destination and its declared dependencies. Files keep
    /// the order of `resolved`.
    pub fn build(
        &self,
        category: &Category,
        resolved: &[TemplateEntry],
        tag: &EcosystemTag,
        variables: &Variables,
    ) -> ResolutionPlan {
        let mut directories = self.registry.baseline_directories(tag);
        let mut files = Vec::with_capacity(resolved.len());

        for entry in resolved {
            let destination = variables.substitute(&entry.destination);

            if let Some(parent) = Path::new(&destination).parent() {
                directories.insert(parent.to_string_lossy());
            }
            directories.extend(
                entry
                    .dependencies
                    .iter()
                    .map(|dep| variables.substitute(dep)),
            );

            files.push(PlannedFile {
                destination_path: destination,
                template_ref: entry.template_ref.clone(),
                identity: entry.identity.clone(),
            });
        }

        ResolutionPlan::new(category.clone(), tag.clone(), directories, files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TemplateIdentity, metadata};

    fn go() -> EcosystemTag {
        EcosystemTag::new("go")
    }

    fn module_entry(name: &str, tag: &str) -> TemplateEntry {
        let meta = metadata::extract("", name, &Category::Module).unwrap();
        TemplateEntry::builder()
            .identity(TemplateIdentity::new(&Category::Module, name))
            .template_ref(format!("{tag}/module/{name}"))
            .category(Category::Module)
            .ecosystem(EcosystemTag::new(tag))
            .metadata(meta)
            .build()
            .unwrap()
    }

    #[test]
    fn inferred_module_destination_is_substituted() {
        let registry = TemplateRegistry::builder()
            .entry(module_entry("model.alpha.tpl", "alpha"))
            .build();
        let vars = Variables::new()
            .with("MODULE_PATH", "internal/user")
            .with("MODULE_NAME", "user");

        let plan = PlanBuilder::new(&registry).plan(
            &Category::Module,
            &EcosystemTag::new("alpha"),
            &vars,
        );

        assert_eq!(plan.files().len(), 1);
        assert_eq!(plan.files()[0].destination_path, "internal/user/user.model.alpha");
        assert!(plan.directories().contains("internal/user"));
    }

    #[test]
    fn directories_combine_baseline_parents_and_dependencies() {
        let entry = TemplateEntry::builder()
            .identity(TemplateIdentity::from_raw("service/config.go"))
            .template_ref("go/service/config.go.tpl")
            .destination("internal/config/config.go")
            .category(Category::Service)
            .ecosystem(go())
            .dependency("migrations")
            .build()
            .unwrap();
        let root_file = TemplateEntry::builder()
            .identity(TemplateIdentity::from_raw("service/env"))
            .template_ref("common/service/env.tpl")
            .destination(".env")
            .category(Category::Service)
            .build()
            .unwrap();
        let registry = TemplateRegistry::builder()
            .entry(root_file)
            .entry(entry)
            .directories(go(), ["cmd", "internal/config", "diagrams"])
            .build();

        let plan = PlanBuilder::new(&registry).plan(&Category::Service, &go(), &Variables::new());
        let dirs: Vec<_> = plan.directories().iter().collect();

        assert_eq!(dirs, vec!["cmd", "internal/config", "diagrams", "migrations"]);
        let files: Vec<_> = plan
            .files()
            .iter()
            .map(|f| f.destination_path.as_str())
            .collect();
        assert_eq!(files, vec![".env", "internal/config/config.go"]);
    }

    #[test]
    fn unknown_placeholders_survive_into_plan() {
        let entry = TemplateEntry::builder()
            .identity(TemplateIdentity::from_raw("module/x"))
            .template_ref("x")
            .destination("{{MODULE_PATH}}/{{UNKNOWN}}.go")
            .category(Category::Module)
            .build()
            .unwrap();
        let registry = TemplateRegistry::builder().entry(entry).build();
        let vars = Variables::new().with("MODULE_PATH", "pkg");

        let plan = PlanBuilder::new(&registry).plan(&Category::Module, &go(), &vars);

        assert_eq!(plan.files()[0].destination_path, "pkg/{{UNKNOWN}}.go");
        assert_eq!(plan.unresolved_destinations().count(), 1);
    }

    #[test]
    fn unknown_category_gives_baseline_only() {
        let registry = TemplateRegistry::builder()
            .directories(go(), ["cmd"])
            .build();
        let plan = PlanBuilder::new(&registry).plan(
            &Category::Other("worker".into()),
            &go(),
            &Variables::new(),
        );
        assert!(plan.files().is_empty());
        assert_eq!(plan.directories().len(), 1);
    }

    #[test]
    fn building_twice_yields_equal_plans() {
        let registry = TemplateRegistry::builder()
            .entry(module_entry("service.go.tpl", "go"))
            .build();
        let vars = Variables::for_module("user", None);
        let builder = PlanBuilder::new(&registry);

        assert_eq!(
            builder.plan(&Category::Module, &go(), &vars),
            builder.plan(&Category::Module, &go(), &vars)
        );
    }
}
