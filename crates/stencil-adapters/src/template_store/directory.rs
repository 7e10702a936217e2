//! Template store backed by a directory on disk.
//!
//! Discovers `templates-*/<category>/*.tpl` under a root with `walkdir` and
//! reads the optional `stencil.toml` manifest. The catalog is rebuilt on
//! every [`TemplateStore::registry`] call, so edits show up without a
//! restart.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use stencil_core::{
    application::{ApplicationError, ports::TemplateStore},
    domain::{RelativePath, TemplateRef, TemplateRegistry},
    error::StencilResult,
};

use super::catalog::{self, CatalogManifest, MANIFEST_FILE};

/// Reads templates from a content root.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Point a store at `root`. The directory is checked on first use.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn manifest(&self) -> StencilResult<CatalogManifest> {
        let path = self.root.join(MANIFEST_FILE);
        if !path.is_file() {
            debug!(path = %path.display(), "no manifest, using defaults");
            return Ok(CatalogManifest::default());
        }

        let text = fs::read_to_string(&path).map_err(|e| unavailable(&path, e))?;
        CatalogManifest::parse(&text, &path.display().to_string())
    }

    /// Every file under a `templates-*` layer as `(relative path, body)`,
    /// sorted by path.
    fn discover(&self) -> StencilResult<Vec<(String, String)>> {
        let mut found = Vec::new();

        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(3)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| ApplicationError::StoreUnavailable {
                reason: format!("directory walk error: {e}"),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let relative = normalize_path(relative);

            match fs::read_to_string(entry.path()) {
                Ok(body) => found.push((relative, body)),
                // One unreadable file must not hide the rest of the catalog.
                Err(e) => warn!(path = %entry.path().display(), error = %e, "skipping unreadable template"),
            }
        }

        Ok(found)
    }
}

impl TemplateStore for DirectoryStore {
    #[instrument(skip_all, fields(root = %self.root.display()))]
    fn registry(&self) -> StencilResult<TemplateRegistry> {
        if !self.root.is_dir() {
            return Err(ApplicationError::StoreUnavailable {
                reason: format!("templates directory not found: {}", self.root.display()),
            }
            .into());
        }

        let manifest = self.manifest()?;
        let files = self.discover()?;
        let registry = catalog::assemble(
            files.iter().map(|(path, body)| (path.as_str(), body.as_str())),
            &manifest,
        )?;

        info!(templates = registry.len(), "templates loaded");
        Ok(registry)
    }

    fn read(&self, template_ref: &TemplateRef) -> StencilResult<String> {
        let path = RelativePath::try_new(template_ref.as_str())?.under(&self.root);

        fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ApplicationError::TemplateNotFound {
                    template_ref: template_ref.to_string(),
                }
                .into()
            } else {
                unavailable(&path, e)
            }
        })
    }
}

/// Forward slashes on every platform so paths match the layout rules.
fn normalize_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn unavailable(path: &Path, e: std::io::Error) -> stencil_core::error::StencilError {
    ApplicationError::StoreUnavailable {
        reason: format!("failed to read '{}': {e}", path.display()),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use std::{fs::File, io::Write};

    use stencil_core::{
        domain::{Category, EcosystemTag, PlanBuilder, Variables},
        error::ErrorCategory,
    };
    use tempfile::TempDir;

    use super::*;

    // ── helpers ───────────────────────────────────────────────────────────

    fn make_root(files: &[(&str, &str)]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for (rel_path, content) in files {
            let full = temp.path().join(rel_path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            File::create(full)
                .unwrap()
                .write_all(content.as_bytes())
                .unwrap();
        }
        temp
    }

    // ── registry ──────────────────────────────────────────────────────────

    #[test]
    fn missing_root_is_store_unavailable() {
        let store = DirectoryStore::new("/absolutely/does/not/exist");
        let err = store.registry().unwrap_err();
        assert!(err.to_string().contains("not found"), "{err}");
    }

    #[test]
    fn discovers_layers_and_applies_override() {
        let temp = make_root(&[
            ("templates-common/service/env.tpl", "A=1\n"),
            ("templates-go/service/env.tpl", "# Template-Destination: .env\nA=2\n"),
            ("templates-go/service/main.go.tpl", "package main\n"),
            ("README.md", "not a template"),
        ]);
        let store = DirectoryStore::new(temp.path());
        let registry = store.registry().unwrap();
        assert_eq!(registry.len(), 3);

        let plan = PlanBuilder::new(&registry).plan(
            &Category::Service,
            &EcosystemTag::new("go"),
            &Variables::for_service("orders"),
        );
        let refs: Vec<_> = plan.files().iter().map(|f| f.template_ref.as_str()).collect();
        assert_eq!(
            refs,
            vec!["templates-go/service/env.tpl", "templates-go/service/main.go.tpl"]
        );
    }

    #[test]
    fn unplaceable_templates_are_skipped_not_fatal() {
        let temp = make_root(&[
            ("templates-common/service/env.tpl", "A=1\n"),
            ("templates-common/service/mystery.tpl", "???\n"),
        ]);
        let registry = DirectoryStore::new(temp.path()).registry().unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.skipped()[0].as_str(),
            "templates-common/service/mystery.tpl"
        );
    }

    #[test]
    fn template_with_absolute_destination_is_skipped() {
        let temp = make_root(&[
            ("templates-common/service/env.tpl", "A=1\n"),
            (
                "templates-common/service/weird.tpl",
                "# Template-Destination: /etc/weird\nx\n",
            ),
        ]);
        let registry = DirectoryStore::new(temp.path()).registry().unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.entries()[0].identity.as_str(), "service/env");
        assert_eq!(
            registry.skipped()[0].as_str(),
            "templates-common/service/weird.tpl"
        );
    }

    #[test]
    fn manifest_supplies_conventions() {
        let temp = make_root(&[
            ("templates-go/service/main.go.tpl", "package main\n"),
            (
                "stencil.toml",
                "required = [\"service/main.go\"]\n\n[directories]\ngo = [\"cmd\", \"diagrams\"]\n",
            ),
        ]);
        let registry = DirectoryStore::new(temp.path()).registry().unwrap();
        assert!(registry.entries()[0].required);
        assert_eq!(
            registry.baseline_directories(&EcosystemTag::new("go")).len(),
            2
        );
    }

    #[test]
    fn malformed_manifest_is_a_configuration_error() {
        let temp = make_root(&[("stencil.toml", "[directories\n")]);
        let err = DirectoryStore::new(temp.path()).registry().unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    // ── read ──────────────────────────────────────────────────────────────

    #[test]
    fn read_returns_body() {
        let temp = make_root(&[("templates-go/service/main.go.tpl", "package main\n")]);
        let store = DirectoryStore::new(temp.path());
        let body = store
            .read(&TemplateRef::new("templates-go/service/main.go.tpl"))
            .unwrap();
        assert_eq!(body, "package main\n");
    }

    #[test]
    fn read_missing_is_not_found() {
        let temp = make_root(&[]);
        let store = DirectoryStore::new(temp.path());
        let err = store
            .read(&TemplateRef::new("templates-go/service/gone.tpl"))
            .unwrap_err();
        assert!(matches!(
            err,
            stencil_core::error::StencilError::Application(ApplicationError::TemplateNotFound { .. })
        ));
    }

    #[test]
    fn read_refuses_to_escape_root() {
        let temp = make_root(&[]);
        let store = DirectoryStore::new(temp.path());
        assert!(store.read(&TemplateRef::new("../secret.tpl")).is_err());
    }
}
