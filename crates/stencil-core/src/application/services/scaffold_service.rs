//! Scaffold Service - main application orchestrator.
//!
//! This service coordinates the whole generation workflow:
//! 1. Load the catalog from the template store
//! 2. Resolve and plan for `(category, ecosystem, variables)`
//! 3. Materialize the plan under an explicit root
//! 4. For modules, register the module in the service entry point
//!
//! It implements the driving port (incoming) and uses driven ports (outgoing).

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateRenderer, TemplateStore},
        services::materialize_service::{
            MaterializeOptions, MaterializeReport, Materializer, RegistrationOutcome,
        },
    },
    domain::{Category, EcosystemTag, PlanBuilder, ResolutionPlan, Variables},
    error::StencilResult,
};

/// Files whose presence identifies a service's ecosystem, first match wins.
pub const ECOSYSTEM_MARKERS: &[(&str, &str)] = &[
    ("go.mod", "go"),
    ("pyproject.toml", "py"),
    ("requirements.txt", "py"),
];

/// Request to generate a new service skeleton.
#[derive(Debug, Clone)]
pub struct ServiceRequest {
    pub name: String,
    /// Directory the service directory is created in.
    pub parent: PathBuf,
    pub ecosystem: EcosystemTag,
    /// Extra variables, layered over the standard ones.
    pub variables: Variables,
    /// Write into an existing directory and replace existing files.
    pub force: bool,
}

/// Request to generate a module inside an existing service.
#[derive(Debug, Clone)]
pub struct ModuleRequest {
    pub name: String,
    pub service_root: PathBuf,
    pub ecosystem: EcosystemTag,
    /// Overrides `MODULE_PATH` (default `internal/<name>`).
    pub module_path: Option<String>,
    /// Overrides the ecosystem's registration entry point.
    pub entry_point: Option<String>,
    pub register: bool,
    pub variables: Variables,
    pub force: bool,
}

/// Outcome of a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaffoldReport {
    pub plan: ResolutionPlan,
    pub materialized: MaterializeReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration: Option<RegistrationOutcome>,
}

/// Main scaffolding service.
pub struct ScaffoldService {
    store: Box<dyn TemplateStore>,
    renderer: Box<dyn TemplateRenderer>,
    filesystem: Box<dyn Filesystem>,
}

impl ScaffoldService {
    /// Create a new scaffold service with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use stencil_core::application::ScaffoldService;
    ///
    /// let service = ScaffoldService::new(
    ///     Box::new(BuiltinStore::new()),
    ///     Box::new(PlaceholderRenderer::new()),
    ///     Box::new(LocalFilesystem::new()),
    /// );
    /// ```
    pub fn new(
        store: Box<dyn TemplateStore>,
        renderer: Box<dyn TemplateRenderer>,
        filesystem: Box<dyn Filesystem>,
    ) -> Self {
        Self {
            store,
            renderer,
            filesystem,
        }
    }

    /// Resolve and plan without touching the filesystem.
    #[instrument(skip_all, fields(category = %category, ecosystem = %ecosystem))]
    pub fn preview(
        &self,
        category: &Category,
        ecosystem: &EcosystemTag,
        variables: &Variables,
    ) -> StencilResult<ResolutionPlan> {
        let registry = self.store.registry()?;
        for skipped in registry.skipped() {
            warn!(template = %skipped, "template skipped: no usable destination");
        }

        let plan = PlanBuilder::new(&registry).plan(category, ecosystem, variables);
        info!(
            files = plan.files().len(),
            directories = plan.directories().len(),
            "plan built"
        );
        Ok(plan)
    }

    /// Plan a service exactly as [`create_service`](Self::create_service)
    /// would, without writing anything. An existing root is not checked.
    pub fn plan_service(&self, request: &ServiceRequest) -> StencilResult<ResolutionPlan> {
        validate_name(&request.name)?;
        self.non_empty_plan(
            &Category::Service,
            &request.ecosystem,
            &service_variables(request),
        )
    }

    /// Plan a module exactly as [`create_module`](Self::create_module)
    /// would, without writing anything.
    pub fn plan_module(&self, request: &ModuleRequest) -> StencilResult<ResolutionPlan> {
        validate_name(&request.name)?;
        self.require_service_root(&request.service_root)?;
        self.non_empty_plan(
            &Category::Module,
            &request.ecosystem,
            &module_variables(request),
        )
    }

    /// Generate a service under `parent/name`.
    #[instrument(skip_all, fields(service = %request.name, ecosystem = %request.ecosystem))]
    pub fn create_service(&self, request: &ServiceRequest) -> StencilResult<ScaffoldReport> {
        validate_name(&request.name)?;
        let root = request.parent.join(&request.name);

        let pre_existing = self.filesystem.exists(&root);
        if pre_existing && !request.force {
            return Err(ApplicationError::ProjectExists { path: root }.into());
        }

        let variables = service_variables(request);
        let plan = self.non_empty_plan(&Category::Service, &request.ecosystem, &variables)?;

        self.filesystem.create_dir_all(&root)?;
        let options = MaterializeOptions {
            overwrite: request.force,
        };
        let materialized = match self
            .materializer()
            .apply(&plan, &root, &variables, options)
        {
            Ok(report) => report,
            Err(e) => {
                if !pre_existing {
                    self.remove_root(&root);
                }
                return Err(e);
            }
        };

        info!(root = %root.display(), "service created");
        Ok(ScaffoldReport {
            plan,
            materialized,
            registration: None,
        })
    }

    /// Generate a module inside an existing service.
    #[instrument(skip_all, fields(module = %request.name, ecosystem = %request.ecosystem))]
    pub fn create_module(&self, request: &ModuleRequest) -> StencilResult<ScaffoldReport> {
        validate_name(&request.name)?;
        self.require_service_root(&request.service_root)?;

        let variables = module_variables(request);
        let plan = self.non_empty_plan(&Category::Module, &request.ecosystem, &variables)?;

        let options = MaterializeOptions {
            overwrite: request.force,
        };
        let materializer = self.materializer();
        let materialized = materializer.apply(&plan, &request.service_root, &variables, options)?;

        let registration = if request.register {
            self.register(&materializer, request, &variables)?
        } else {
            None
        };

        info!(root = %request.service_root.display(), "module created");
        Ok(ScaffoldReport {
            plan,
            materialized,
            registration,
        })
    }

    /// Guess a service's ecosystem from marker files in its root.
    pub fn detect_ecosystem(&self, root: &Path) -> Option<EcosystemTag> {
        ECOSYSTEM_MARKERS
            .iter()
            .find(|(file, _)| self.filesystem.exists(&root.join(file)))
            .and_then(|(_, tag)| tag.parse().ok())
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn materializer(&self) -> Materializer<'_> {
        Materializer::new(
            self.store.as_ref(),
            self.renderer.as_ref(),
            self.filesystem.as_ref(),
        )
    }

    fn require_service_root(&self, root: &Path) -> StencilResult<()> {
        if !self.filesystem.exists(root) {
            return Err(ApplicationError::ServiceRootMissing {
                path: root.to_path_buf(),
            }
            .into());
        }
        Ok(())
    }

    fn non_empty_plan(
        &self,
        category: &Category,
        ecosystem: &EcosystemTag,
        variables: &Variables,
    ) -> StencilResult<ResolutionPlan> {
        let plan = self.preview(category, ecosystem, variables)?;
        if plan.is_empty() {
            return Err(ApplicationError::NothingToGenerate {
                category: category.to_string(),
                ecosystem: ecosystem.to_string(),
            }
            .into());
        }
        Ok(plan)
    }

    fn register(
        &self,
        materializer: &Materializer<'_>,
        request: &ModuleRequest,
        variables: &Variables,
    ) -> StencilResult<Option<RegistrationOutcome>> {
        let registry = self.store.registry()?;
        let Some(registration) = registry.registration_for(&request.ecosystem) else {
            info!(ecosystem = %request.ecosystem, "ecosystem has no module registration");
            return Ok(None);
        };

        let mut registration = registration.clone();
        if let Some(entry_point) = &request.entry_point {
            registration.entry_point = entry_point.clone();
        }

        materializer
            .register_module(&request.service_root, &registration, variables)
            .map(Some)
    }

    /// Best-effort rollback on failure.
    fn remove_root(&self, root: &Path) {
        if let Err(e) = self.filesystem.remove_dir_all(root) {
            warn!(error = %e, path = %root.display(), "rollback failed");
        } else {
            info!("rollback successful");
        }
    }
}

fn service_variables(request: &ServiceRequest) -> Variables {
    Variables::for_service(&request.name).merge(&request.variables)
}

fn module_variables(request: &ModuleRequest) -> Variables {
    Variables::for_module(&request.name, request.module_path.as_deref()).merge(&request.variables)
}

/// Names end up as path segments and identifiers.
fn validate_name(name: &str) -> Result<(), ApplicationError> {
    let invalid = |reason: &str| ApplicationError::InvalidName {
        name: name.to_string(),
        reason: reason.into(),
    };

    if name.trim().is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.starts_with('.') {
        return Err(invalid("name cannot start with '.'"));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(invalid(&format!("character '{c}' is not allowed")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};
    use std::sync::Mutex;

    use super::*;
    use crate::application::ports::{MockFilesystem, MockTemplateRenderer, MockTemplateStore};
    use crate::domain::{
        DEFAULT_MARKER, ModuleRegistration, RawTemplate, Scope, TemplateRef, TemplateRegistry,
    };
    use crate::error::StencilError;

    // ========================================================================
    // Fakes
    // ========================================================================

    #[derive(Default)]
    struct FakeFs {
        files: Mutex<BTreeMap<PathBuf, String>>,
        dirs: Mutex<BTreeSet<PathBuf>>,
    }

    impl FakeFs {
        fn with_file(self, path: &str, content: &str) -> Self {
            self.files
                .lock()
                .unwrap()
                .insert(PathBuf::from(path), content.into());
            self
        }

        fn with_dir(self, path: &str) -> Self {
            self.dirs.lock().unwrap().insert(PathBuf::from(path));
            self
        }
    }

    impl Filesystem for std::sync::Arc<FakeFs> {
        fn create_dir_all(&self, path: &Path) -> StencilResult<()> {
            self.dirs.lock().unwrap().insert(path.to_path_buf());
            Ok(())
        }
        fn write_file(&self, path: &Path, content: &str) -> StencilResult<()> {
            self.files
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), content.into());
            Ok(())
        }
        fn read_to_string(&self, path: &Path) -> StencilResult<String> {
            self.files
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| {
                    ApplicationError::FilesystemError {
                        path: path.to_path_buf(),
                        reason: "missing".into(),
                    }
                    .into()
                })
        }
        fn exists(&self, path: &Path) -> bool {
            self.files.lock().unwrap().contains_key(path)
                || self.dirs.lock().unwrap().contains(path)
        }
        fn remove_file(&self, path: &Path) -> StencilResult<()> {
            self.files.lock().unwrap().remove(path);
            Ok(())
        }
        fn remove_dir_all(&self, path: &Path) -> StencilResult<()> {
            self.files.lock().unwrap().retain(|p, _| !p.starts_with(path));
            self.dirs.lock().unwrap().retain(|p| !p.starts_with(path));
            Ok(())
        }
    }

    struct FakeStore {
        bodies: BTreeMap<&'static str, (&'static str, Category, Option<&'static str>)>,
    }

    impl FakeStore {
        fn go_catalog() -> Self {
            let bodies = BTreeMap::from([
                ("common/service/env.tpl", ("NAME={{SERVICE_NAME}}\n", Category::Service, None)),
                (
                    "go/service/main.go.tpl",
                    ("package main\n\nfunc main() {\n\t// USE THIS COMMENT TO AUTO-GENERATE NEW MODULES\n}\n", Category::Service, Some("go")),
                ),
                (
                    "go/module/model.go.tpl",
                    ("package {{MODULE_NAME}}\n", Category::Module, Some("go")),
                ),
            ]);
            Self { bodies }
        }
    }

    impl TemplateStore for FakeStore {
        fn registry(&self) -> StencilResult<TemplateRegistry> {
            let mut builder = TemplateRegistry::builder();
            for (&path, (body, category, tag)) in &self.bodies {
                builder.discover(RawTemplate {
                    template_ref: TemplateRef::new(path),
                    name: path.rsplit('/').next().unwrap_or(path).to_string(),
                    category: category.clone(),
                    scope: if tag.is_some() {
                        Scope::EcosystemSpecific
                    } else {
                        Scope::Shared
                    },
                    ecosystem: tag.map(EcosystemTag::new),
                    body: (*body).to_string(),
                })?;
            }
            Ok(builder
                .directories(EcosystemTag::new("go"), ["cmd", "diagrams"])
                .registration(
                    EcosystemTag::new("go"),
                    ModuleRegistration {
                        entry_point: "cmd/main.go".into(),
                        marker: DEFAULT_MARKER.into(),
                        snippet: "{{MODULE_NAME}}.Register(router)".into(),
                    },
                )
                .build())
        }

        fn read(&self, template_ref: &TemplateRef) -> StencilResult<String> {
            self.bodies
                .get(template_ref.as_str())
                .map(|(body, _, _)| (*body).to_string())
                .ok_or_else(|| {
                    ApplicationError::TemplateNotFound {
                        template_ref: template_ref.to_string(),
                    }
                    .into()
                })
        }
    }

    struct Substitute;

    impl TemplateRenderer for Substitute {
        fn render(
            &self,
            _template_ref: &TemplateRef,
            body: &str,
            variables: &Variables,
        ) -> StencilResult<String> {
            Ok(variables.substitute(body))
        }
    }

    fn service_with(fs: std::sync::Arc<FakeFs>) -> ScaffoldService {
        ScaffoldService::new(
            Box::new(FakeStore::go_catalog()),
            Box::new(Substitute),
            Box::new(fs),
        )
    }

    fn go() -> EcosystemTag {
        EcosystemTag::new("go")
    }

    // ========================================================================
    // Service generation
    // ========================================================================

    #[test]
    fn create_service_writes_rendered_files_under_root() {
        let fs = std::sync::Arc::new(FakeFs::default().with_dir("/work"));
        let service = service_with(fs.clone());

        let report = service
            .create_service(&ServiceRequest {
                name: "billing".into(),
                parent: "/work".into(),
                ecosystem: go(),
                variables: Variables::new(),
                force: false,
            })
            .unwrap();

        assert_eq!(report.materialized.files.len(), 2);
        let files = fs.files.lock().unwrap();
        assert_eq!(
            files.get(Path::new("/work/billing/.env")).map(String::as_str),
            Some("NAME=billing\n")
        );
        assert!(files.contains_key(Path::new("/work/billing/cmd/main.go")));
        assert!(fs.dirs.lock().unwrap().contains(Path::new("/work/billing/diagrams")));
    }

    #[test]
    fn create_service_refuses_existing_root() {
        let fs = std::sync::Arc::new(FakeFs::default().with_dir("/work/billing"));
        let err = service_with(fs)
            .create_service(&ServiceRequest {
                name: "billing".into(),
                parent: "/work".into(),
                ecosystem: go(),
                variables: Variables::new(),
                force: false,
            })
            .unwrap_err();

        assert!(matches!(
            err,
            StencilError::Application(ApplicationError::ProjectExists { .. })
        ));
    }

    #[test]
    fn unknown_ecosystem_without_shared_templates_is_nothing_to_generate() {
        let fs = std::sync::Arc::new(FakeFs::default().with_dir("/svc"));
        let err = service_with(fs)
            .create_module(&ModuleRequest {
                name: "user".into(),
                service_root: "/svc".into(),
                ecosystem: EcosystemTag::new("cobol"),
                module_path: None,
                entry_point: None,
                register: false,
                variables: Variables::new(),
                force: false,
            })
            .unwrap_err();

        assert!(matches!(
            err,
            StencilError::Application(ApplicationError::NothingToGenerate { .. })
        ));
    }

    #[test]
    fn plans_apply_the_same_checks_as_generation() {
        let fs = std::sync::Arc::new(FakeFs::default().with_dir("/svc"));
        let service = service_with(fs.clone());
        let module = |name: &str, root: &str| ModuleRequest {
            name: name.into(),
            service_root: root.into(),
            ecosystem: go(),
            module_path: None,
            entry_point: None,
            register: true,
            variables: Variables::new(),
            force: false,
        };

        let plan = service.plan_module(&module("user", "/svc")).unwrap();
        assert_eq!(plan.files()[0].destination_path, "internal/user/user.model.go");

        assert!(matches!(
            service.plan_module(&module("../x", "/svc")),
            Err(StencilError::Application(ApplicationError::InvalidName { .. }))
        ));
        assert!(matches!(
            service.plan_module(&module("user", "/nowhere")),
            Err(StencilError::Application(ApplicationError::ServiceRootMissing { .. }))
        ));
        assert!(matches!(
            service.plan_service(&ServiceRequest {
                name: "bad name".into(),
                parent: "/work".into(),
                ecosystem: go(),
                variables: Variables::new(),
                force: false,
            }),
            Err(StencilError::Application(ApplicationError::InvalidName { .. }))
        ));
        assert!(fs.files.lock().unwrap().is_empty());
    }

    #[test]
    fn invalid_names_are_rejected() {
        assert!(validate_name("billing-api").is_ok());
        assert!(validate_name("user_profile").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("../escape").is_err());
        assert!(validate_name("a b").is_err());
        assert!(validate_name(".hidden").is_err());
    }

    // ========================================================================
    // Module generation
    // ========================================================================

    #[test]
    fn create_module_writes_files_and_registers() {
        let main = "package main\n\nfunc main() {\n\t// USE THIS COMMENT TO AUTO-GENERATE NEW MODULES\n}\n";
        let fs = std::sync::Arc::new(
            FakeFs::default()
                .with_dir("/svc")
                .with_file("/svc/cmd/main.go", main),
        );
        let service = service_with(fs.clone());

        let report = service
            .create_module(&ModuleRequest {
                name: "user".into(),
                service_root: "/svc".into(),
                ecosystem: go(),
                module_path: None,
                entry_point: None,
                register: true,
                variables: Variables::new(),
                force: false,
            })
            .unwrap();

        assert!(report.registration.as_ref().is_some_and(RegistrationOutcome::is_registered));
        let files = fs.files.lock().unwrap();
        assert_eq!(
            files
                .get(Path::new("/svc/internal/user/user.model.go"))
                .map(String::as_str),
            Some("package user\n")
        );
        assert!(files[Path::new("/svc/cmd/main.go")].contains("\tuser.Register(router)\n"));
    }

    #[test]
    fn missing_entry_point_is_reported_not_raised() {
        let fs = std::sync::Arc::new(FakeFs::default().with_dir("/svc"));
        let report = service_with(fs)
            .create_module(&ModuleRequest {
                name: "user".into(),
                service_root: "/svc".into(),
                ecosystem: go(),
                module_path: Some("pkg/user".into()),
                entry_point: None,
                register: true,
                variables: Variables::new(),
                force: false,
            })
            .unwrap();

        assert!(matches!(
            report.registration,
            Some(RegistrationOutcome::EntryPointMissing { .. })
        ));
        assert_eq!(
            report.plan.files()[0].destination_path,
            "pkg/user/user.model.go"
        );
    }

    #[test]
    fn detect_ecosystem_uses_marker_files() {
        let fs = std::sync::Arc::new(FakeFs::default().with_file("/svc/go.mod", "module svc\n"));
        let service = service_with(fs);
        assert_eq!(service.detect_ecosystem(Path::new("/svc")), Some(go()));
        assert_eq!(service.detect_ecosystem(Path::new("/other")), None);
    }

    // ========================================================================
    // Rollback (mocked ports)
    // ========================================================================

    #[test]
    fn failed_write_rolls_back_written_files() {
        let mut store = MockTemplateStore::new();
        store.expect_registry().returning(|| {
            FakeStore::go_catalog().registry()
        });
        store
            .expect_read()
            .returning(|_| Ok("body".to_string()));

        let mut renderer = MockTemplateRenderer::new();
        renderer
            .expect_render()
            .returning(|_, body, _| Ok(body.to_string()));

        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        let mut writes = 0;
        fs.expect_write_file().returning(move |path, _| {
            writes += 1;
            if writes == 1 {
                Ok(())
            } else {
                Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "disk full".into(),
                }
                .into())
            }
        });
        fs.expect_remove_file().times(1).returning(|_| Ok(()));
        fs.expect_remove_dir_all()
            .times(1)
            .returning(|_| Ok(()));

        let service = ScaffoldService::new(Box::new(store), Box::new(renderer), Box::new(fs));
        let result = service.create_service(&ServiceRequest {
            name: "billing".into(),
            parent: "/work".into(),
            ecosystem: go(),
            variables: Variables::new(),
            force: false,
        });

        assert!(matches!(
            result,
            Err(StencilError::Application(ApplicationError::FilesystemError { .. }))
        ));
    }
    #[test]
    fn failed_forced_run_restores_overwritten_files() {
        let mut store = MockTemplateStore::new();
        store
            .expect_registry()
            .returning(|| FakeStore::go_catalog().registry());
        store.expect_read().returning(|template_ref| {
            if template_ref.as_str() == "go/service/main.go.tpl" {
                Err(ApplicationError::TemplateNotFound {
                    template_ref: template_ref.to_string(),
                }
                .into())
            } else {
                FakeStore::go_catalog().read(template_ref)
            }
        });

        let fs = std::sync::Arc::new(
            FakeFs::default()
                .with_dir("/work/orders")
                .with_file("/work/orders/.env", "USER SECRET"),
        );
        let service = ScaffoldService::new(
            Box::new(store),
            Box::new(Substitute),
            Box::new(fs.clone()),
        );

        let result = service.create_service(&ServiceRequest {
            name: "orders".into(),
            parent: "/work".into(),
            ecosystem: go(),
            variables: Variables::new(),
            force: true,
        });

        assert!(matches!(
            result,
            Err(StencilError::Application(ApplicationError::TemplateNotFound { .. }))
        ));
        let files = fs.files.lock().unwrap();
        assert_eq!(
            files.get(Path::new("/work/orders/.env")).map(String::as_str),
            Some("USER SECRET")
        );
        assert!(!files.contains_key(Path::new("/work/orders/cmd/main.go")));
        assert!(fs.dirs.lock().unwrap().contains(Path::new("/work/orders")));
    }
}
