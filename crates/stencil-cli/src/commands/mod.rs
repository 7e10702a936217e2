//! Command handlers and the adapter wiring they share.

pub mod completions;
pub mod config;
pub mod init;
pub mod list;
pub mod module;
pub mod plan;
pub mod service;

use std::path::{Path, PathBuf};

use tracing::debug;

use stencil_adapters::{BuiltinStore, DirectoryStore, LocalFilesystem, PlaceholderRenderer};
use stencil_core::{
    application::{ScaffoldReport, ScaffoldService, ports::TemplateStore},
    domain::{EcosystemTag, ResolutionPlan},
};

use crate::{
    cli::GlobalArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Template root for this invocation: `--templates` / `STENCIL_TEMPLATES_DIR`,
/// then `templates.root` from config. `None` means builtin.
pub fn template_root(global: &GlobalArgs, config: &AppConfig) -> Option<PathBuf> {
    global
        .templates
        .clone()
        .or_else(|| config.templates.root.clone())
}

pub fn template_store(global: &GlobalArgs, config: &AppConfig) -> Box<dyn TemplateStore> {
    match template_root(global, config) {
        Some(root) => {
            debug!(root = %root.display(), "using template directory");
            Box::new(DirectoryStore::new(root))
        }
        None => {
            debug!("using builtin templates");
            Box::new(BuiltinStore::new())
        }
    }
}

/// Scaffold service over the local filesystem.
pub fn scaffold_service(global: &GlobalArgs, config: &AppConfig) -> ScaffoldService {
    ScaffoldService::new(
        template_store(global, config),
        Box::new(PlaceholderRenderer::new()),
        Box::new(LocalFilesystem::new()),
    )
}

/// `defaults.ecosystem` from config, validated.
pub fn default_ecosystem(config: &AppConfig) -> CliResult<EcosystemTag> {
    config
        .defaults
        .ecosystem
        .parse()
        .map_err(|e| CliError::ConfigError {
            message: format!(
                "defaults.ecosystem '{}' is not a valid ecosystem tag",
                config.defaults.ecosystem
            ),
            source: Some(Box::new(e)),
        })
}

/// `<module_root>/<name>`, tolerating a trailing slash or an empty root.
pub fn default_module_path(module_root: &str, name: &str) -> String {
    match module_root.trim().trim_end_matches('/') {
        "" | "." => name.to_string(),
        root => format!("{root}/{name}"),
    }
}

/// Ask before a destructive step. Non-interactive sessions proceed.
#[cfg(feature = "interactive")]
pub fn confirm(prompt: &str) -> CliResult<bool> {
    use std::io::IsTerminal as _;

    if !std::io::stdin().is_terminal() {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| CliError::InvalidInput {
            message: "confirmation prompt failed".into(),
            source: Some(Box::new(e)),
        })
}

#[cfg(not(feature = "interactive"))]
pub fn confirm(_prompt: &str) -> CliResult<bool> {
    Ok(true)
}

/// Directories then files, with template refs dimmed. `root` prefixes every
/// path when given.
pub fn print_plan(output: &OutputManager, plan: &ResolutionPlan, root: Option<&Path>) -> CliResult<()> {
    let show = |relative: &str| match root {
        Some(root) => root.join(relative).display().to_string(),
        None => relative.to_string(),
    };

    output.header(&format!(
        "Plan: {} / {}",
        plan.category(),
        plan.ecosystem()
    ))?;

    if !plan.directories().is_empty() {
        output.print("Directories:")?;
        for dir in plan.directories().iter() {
            output.data(&format!("  {}/", show(dir)))?;
        }
    }

    output.print("Files:")?;
    let width = plan
        .files()
        .iter()
        .map(|f| show(&f.destination_path).len())
        .max()
        .unwrap_or(0);
    for file in plan.files() {
        output.data(&format!(
            "  {:<width$}  {}",
            show(&file.destination_path),
            output.dim(&format!("<- {}", file.template_ref)),
        ))?;
    }

    for file in plan.unresolved_destinations() {
        output.warning(&format!(
            "{} still contains placeholders; pass --name or --var to fill them",
            file.destination_path
        ))?;
    }

    Ok(())
}

/// Created paths and materializer warnings.
pub fn print_report(output: &OutputManager, report: &ScaffoldReport) -> CliResult<()> {
    for dir in &report.materialized.directories {
        output.print(&format!("  created  {}/", dir.display()))?;
    }
    for file in &report.materialized.files {
        output.print(&format!("  created  {}", file.display()))?;
    }
    for warning in &report.materialized.warnings {
        output.warning(warning)?;
    }
    Ok(())
}
