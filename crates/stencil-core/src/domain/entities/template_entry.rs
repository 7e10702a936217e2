//! Template catalog entries.
//!
//! A [`TemplateEntry`] describes one generatable artifact: where its body
//! lives, where it lands in the generated project, and which ecosystems it
//! applies to. Entries are plain data; the override rules that pick between
//! them live in [`crate::domain::resolver`].
//!
//! ## Identity
//!
//! | Field          | Role                                                |
//! |----------------|-----------------------------------------------------|
//! | `identity`     | Override key, `<category>/<base name>`              |
//! | `template_ref` | Opaque pointer to the body, never parsed by core    |
//! | `destination`  | Path pattern, may contain `{{VAR}}` placeholders    |
//!
//! Two entries with the same identity are *the same artifact* for different
//! ecosystems. A `go`-specific `service/env` replaces the shared
//! `service/env` when resolving for `go`, and only then.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{
    Category, DomainError, EcosystemTag, Scope, metadata::TemplateMetadata,
};

// ── Identity and reference ────────────────────────────────────────────────────

/// Stable key used to match a shared template against its override.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateIdentity(String);

impl TemplateIdentity {
    /// Build the conventional identity: category plus base name.
    ///
    /// A trailing `.tpl` is stripped so `env.tpl` and `env` collide, which is
    /// what override matching wants.
    pub fn new(category: &Category, base_name: &str) -> Self {
        let base = base_name.strip_suffix(".tpl").unwrap_or(base_name);
        Self(format!("{}/{}", category.as_str(), base))
    }

    /// Wrap an identity string as-is.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque reference to a template body (path or content id).
///
/// Only the `TemplateStore` that produced it knows how to dereference it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateRef(String);

impl TemplateRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── TemplateEntry ─────────────────────────────────────────────────────────────

/// One generatable artifact in the catalog.
///
/// ## Rules
///
/// - `ecosystems` is ignored for `Scope::Shared` entries: shared means every
///   ecosystem, including ones the catalog has never heard of.
/// - `Scope::EcosystemSpecific` entries must list at least one tag.
/// - `variables` and `required` are informational. Nothing in the resolver
///   reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateEntry {
    pub identity: TemplateIdentity,
    pub template_ref: TemplateRef,
    pub destination: String,
    pub category: Category,
    pub scope: Scope,
    pub ecosystems: BTreeSet<EcosystemTag>,
    pub variables: BTreeMap<String, String>,
    pub dependencies: Vec<String>,
    pub required: bool,
}

impl TemplateEntry {
    pub fn builder() -> TemplateEntryBuilder {
        TemplateEntryBuilder::default()
    }

    pub const fn is_shared(&self) -> bool {
        matches!(self.scope, Scope::Shared)
    }

    /// Whether this entry takes part in a resolution for `tag`.
    pub fn applies_to(&self, tag: &EcosystemTag) -> bool {
        match self.scope {
            Scope::Shared => true,
            Scope::EcosystemSpecific => self.ecosystems.contains(tag),
        }
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Builder for [`TemplateEntry`].
///
/// Scope defaults to shared; calling [`ecosystem`](Self::ecosystem) switches
/// it to ecosystem-specific.
#[derive(Debug, Default)]
pub struct TemplateEntryBuilder {
    identity: Option<TemplateIdentity>,
    template_ref: Option<TemplateRef>,
    destination: Option<String>,
    category: Option<Category>,
    scope: Scope,
    ecosystems: BTreeSet<EcosystemTag>,
    variables: BTreeMap<String, String>,
    dependencies: Vec<String>,
    required: bool,
}

impl TemplateEntryBuilder {
    pub fn identity(mut self, identity: TemplateIdentity) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn template_ref(mut self, template_ref: impl Into<String>) -> Self {
        self.template_ref = Some(TemplateRef::new(template_ref));
        self
    }

    pub fn destination(mut self, pattern: impl Into<String>) -> Self {
        self.destination = Some(pattern.into());
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn shared(mut self) -> Self {
        self.scope = Scope::Shared;
        self.ecosystems.clear();
        self
    }

    pub fn ecosystem(mut self, tag: EcosystemTag) -> Self {
        self.scope = Scope::EcosystemSpecific;
        self.ecosystems.insert(tag);
        self
    }

    pub fn variable(mut self, name: impl Into<String>, alias: impl Into<String>) -> Self {
        self.variables.insert(name.into(), alias.into());
        self
    }

    pub fn dependency(mut self, dir: impl Into<String>) -> Self {
        self.dependencies.push(dir.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Apply extracted metadata. Directives already set on the builder are
    /// overwritten.
    pub fn metadata(mut self, metadata: TemplateMetadata) -> Self {
        self.destination = Some(metadata.destination);
        self.variables.extend(metadata.variables);
        self.dependencies.extend(metadata.dependencies);
        self
    }

    pub fn build(self) -> Result<TemplateEntry, DomainError> {
        let category = self
            .category
            .ok_or(DomainError::MissingRequiredField { field: "category" })?;
        let template_ref = self
            .template_ref
            .ok_or(DomainError::MissingRequiredField { field: "template_ref" })?;
        let destination = self
            .destination
            .ok_or(DomainError::MissingRequiredField { field: "destination" })?;
        let identity = self
            .identity
            .ok_or(DomainError::MissingRequiredField { field: "identity" })?;

        if destination.trim().is_empty() {
            return Err(DomainError::InvalidTemplate(format!(
                "'{identity}' has an empty destination"
            )));
        }
        if Path::new(&destination).has_root() {
            return Err(DomainError::AbsolutePathNotAllowed { path: destination });
        }
        if self.scope == Scope::EcosystemSpecific && self.ecosystems.is_empty() {
            return Err(DomainError::InvalidTemplate(format!(
                "'{identity}' is ecosystem-specific but lists no ecosystems"
            )));
        }

        Ok(TemplateEntry {
            identity,
            template_ref,
            destination,
            category,
            scope: self.scope,
            ecosystems: self.ecosystems,
            variables: self.variables,
            dependencies: self.dependencies,
            required: self.required,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn go() -> EcosystemTag {
        EcosystemTag::new("go")
    }

    #[test]
    fn identity_strips_tpl_suffix() {
        let a = TemplateIdentity::new(&Category::Service, "env.tpl");
        let b = TemplateIdentity::new(&Category::Service, "env");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "service/env");
    }

    #[test]
    fn builder_defaults_to_shared() {
        let entry = TemplateEntry::builder()
            .identity(TemplateIdentity::from_raw("service/env"))
            .template_ref("shared/env.tpl")
            .destination(".env")
            .category(Category::Service)
            .build()
            .unwrap();

        assert!(entry.is_shared());
        assert!(entry.applies_to(&go()));
        assert!(entry.applies_to(&EcosystemTag::new("never-seen")));
    }

    #[test]
    fn ecosystem_entry_applies_only_to_listed_tags() {
        let entry = TemplateEntry::builder()
            .identity(TemplateIdentity::from_raw("service/main.go"))
            .template_ref("go/main.go.tpl")
            .destination("cmd/main.go")
            .category(Category::Service)
            .ecosystem(go())
            .build()
            .unwrap();

        assert!(entry.applies_to(&go()));
        assert!(!entry.applies_to(&EcosystemTag::new("py")));
    }

    #[test]
    fn builder_reports_missing_fields() {
        let err = TemplateEntry::builder()
            .identity(TemplateIdentity::from_raw("x"))
            .category(Category::Module)
            .destination("x")
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::MissingRequiredField {
                field: "template_ref"
            }
        );
    }

    #[test]
    fn builder_rejects_absolute_destination() {
        let result = TemplateEntry::builder()
            .identity(TemplateIdentity::from_raw("service/x"))
            .template_ref("x.tpl")
            .destination("/etc/x")
            .category(Category::Service)
            .build();
        assert!(matches!(
            result,
            Err(DomainError::AbsolutePathNotAllowed { .. })
        ));
    }

    #[test]
    fn metadata_fills_destination_and_dependencies() {
        let metadata = TemplateMetadata {
            destination: "{{MODULE_PATH}}/x.go".into(),
            variables: BTreeMap::from([("MODULE_PATH".into(), "module_path".into())]),
            dependencies: vec!["internal".into()],
            inferred: false,
        };
        let entry = TemplateEntry::builder()
            .identity(TemplateIdentity::from_raw("module/x"))
            .template_ref("x.tpl")
            .category(Category::Module)
            .metadata(metadata)
            .build()
            .unwrap();

        assert_eq!(entry.destination, "{{MODULE_PATH}}/x.go");
        assert_eq!(entry.dependencies, vec!["internal".to_string()]);
        assert_eq!(
            entry.variables.get("MODULE_PATH").map(String::as_str),
            Some("module_path")
        );
    }
}
