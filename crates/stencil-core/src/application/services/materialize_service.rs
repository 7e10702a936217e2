//! Materializer - applies a plan to a target root.
//!
//! The only component that turns a [`ResolutionPlan`] into bytes on storage.
//! The target root is always an explicit argument; nothing here reads or
//! changes the process working directory.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateRenderer, TemplateStore},
    },
    domain::{ModuleRegistration, PlannedFile, RelativePath, ResolutionPlan, Variables},
    error::StencilResult,
};

/// Knobs for one `apply` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterializeOptions {
    /// Replace files that already exist instead of failing.
    pub overwrite: bool,
}

/// What an `apply` call did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaterializeReport {
    pub root: PathBuf,
    pub directories: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
    /// Non-fatal findings, e.g. placeholders left in a destination.
    pub warnings: Vec<String>,
}

/// Result of a module registration attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum RegistrationOutcome {
    Registered { entry_point: PathBuf },
    EntryPointMissing { entry_point: PathBuf },
    MarkerMissing { entry_point: PathBuf },
}

impl RegistrationOutcome {
    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Registered { .. })
    }
}

/// Writes plans through the filesystem port.
pub struct Materializer<'a> {
    store: &'a dyn TemplateStore,
    renderer: &'a dyn TemplateRenderer,
    filesystem: &'a dyn Filesystem,
}

/// A planned file after path validation.
struct Target<'p> {
    path: PathBuf,
    file: &'p PlannedFile,
    /// Content the file had before this apply, if it existed.
    previous: Option<String>,
}

impl<'a> Materializer<'a> {
    pub fn new(
        store: &'a dyn TemplateStore,
        renderer: &'a dyn TemplateRenderer,
        filesystem: &'a dyn Filesystem,
    ) -> Self {
        Self {
            store,
            renderer,
            filesystem,
        }
    }

    /// Create the plan's directories and render its files under `root`.
    ///
    /// All destinations are validated (relative, inside `root`, not already
    /// present unless `overwrite`) before anything is written. If a write
    /// fails, files created by this call are removed again and files it
    /// overwrote get their previous content back.
    #[instrument(
        skip_all,
        fields(
            root = %root.display(),
            category = %plan.category(),
            ecosystem = %plan.ecosystem(),
            files = plan.files().len()
        )
    )]
    pub fn apply(
        &self,
        plan: &ResolutionPlan,
        root: &Path,
        variables: &Variables,
        options: MaterializeOptions,
    ) -> StencilResult<MaterializeReport> {
        let mut report = MaterializeReport {
            root: root.to_path_buf(),
            ..MaterializeReport::default()
        };

        for file in plan.unresolved_destinations() {
            warn!(destination = %file.destination_path, "unresolved placeholder in destination");
            report.warnings.push(format!(
                "destination '{}' still contains a placeholder",
                file.destination_path
            ));
        }

        let targets = self.validate(plan, root, options)?;

        for dir in plan.directories().iter() {
            let path = RelativePath::try_new(dir)?.under(root);
            self.filesystem.create_dir_all(&path)?;
            debug!(path = %path.display(), "directory ensured");
            report.directories.push(path);
        }

        let mut written: Vec<&Target<'_>> = Vec::with_capacity(targets.len());
        for target in &targets {
            if let Err(e) = self.write_one(target, variables) {
                warn!(error = %e, "write failed, rolling back generated files");
                // A failed write may have clobbered an existing file.
                if target.previous.is_some() {
                    written.push(target);
                }
                self.rollback(&written);
                return Err(e);
            }
            written.push(target);
        }

        info!(
            files = written.len(),
            directories = report.directories.len(),
            "plan applied"
        );
        report.files = written.into_iter().map(|t| t.path.clone()).collect();
        Ok(report)
    }

    /// Insert a module registration snippet into the service entry point.
    ///
    /// A missing entry point or marker is reported, not raised.
    #[instrument(skip_all, fields(root = %root.display(), entry_point = %registration.entry_point))]
    pub fn register_module(
        &self,
        root: &Path,
        registration: &ModuleRegistration,
        variables: &Variables,
    ) -> StencilResult<RegistrationOutcome> {
        let entry_point = RelativePath::try_new(&registration.entry_point)?.under(root);

        if !self.filesystem.exists(&entry_point) {
            warn!(path = %entry_point.display(), "entry point not found, module not registered");
            return Ok(RegistrationOutcome::EntryPointMissing { entry_point });
        }

        let source = self.filesystem.read_to_string(&entry_point)?;
        match registration.apply(&source, variables) {
            Some(updated) => {
                self.filesystem.write_file(&entry_point, &updated)?;
                info!(path = %entry_point.display(), "module registered");
                Ok(RegistrationOutcome::Registered { entry_point })
            }
            None => {
                warn!(
                    path = %entry_point.display(),
                    marker = %registration.marker,
                    "registration marker not found"
                );
                Ok(RegistrationOutcome::MarkerMissing { entry_point })
            }
        }
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn validate<'p>(
        &self,
        plan: &'p ResolutionPlan,
        root: &Path,
        options: MaterializeOptions,
    ) -> StencilResult<Vec<Target<'p>>> {
        let mut targets = Vec::with_capacity(plan.files().len());

        for file in plan.files() {
            let relative = RelativePath::try_new(&file.destination_path)?;
            let path = relative.under(root);

            let previous = if self.filesystem.exists(&path) {
                if !options.overwrite {
                    return Err(ApplicationError::FileExists { path }.into());
                }
                Some(self.filesystem.read_to_string(&path)?)
            } else {
                None
            };
            targets.push(Target {
                path,
                file,
                previous,
            });
        }

        Ok(targets)
    }

    fn write_one(&self, target: &Target<'_>, variables: &Variables) -> StencilResult<()> {
        let file = target.file;
        let body = self.store.read(&file.template_ref)?;
        let rendered = self.renderer.render(&file.template_ref, &body, variables)?;

        if let Some(parent) = target.path.parent() {
            self.filesystem.create_dir_all(parent)?;
        }
        self.filesystem.write_file(&target.path, &rendered)?;
        debug!(path = %target.path.display(), template = %file.template_ref, "file written");
        Ok(())
    }

    /// Best-effort undo of a failed apply: created files are removed,
    /// overwritten files are restored.
    fn rollback(&self, written: &[&Target<'_>]) {
        for target in written.iter().rev() {
            let undone = match &target.previous {
                Some(content) => self.filesystem.write_file(&target.path, content),
                None => self.filesystem.remove_file(&target.path),
            };
            if let Err(e) = undone {
                warn!(error = %e, path = %target.path.display(), "rollback failed");
            }
        }
    }
}
