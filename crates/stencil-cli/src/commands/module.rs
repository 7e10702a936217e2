//! `stencil module`: add a module to an existing service.

use tracing::info;

use stencil_core::application::{ModuleRequest, RegistrationOutcome};

use crate::{
    cli::{GlobalArgs, ModuleArgs},
    commands::{default_ecosystem, default_module_path, print_plan, print_report, scaffold_service},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(
    args: ModuleArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let scaffold = scaffold_service(global, config);

    let ecosystem = match args.ecosystem {
        Some(tag) => tag,
        None => match scaffold.detect_ecosystem(&args.dir) {
            Some(tag) => {
                info!(ecosystem = %tag, "ecosystem detected from service root");
                tag
            }
            None => default_ecosystem(config)?,
        },
    };
    let module_path = args
        .path
        .clone()
        .unwrap_or_else(|| default_module_path(&config.defaults.module_root, &args.name));

    let request = ModuleRequest {
        name: args.name.clone(),
        service_root: args.dir.clone(),
        ecosystem: ecosystem.clone(),
        module_path: Some(module_path),
        entry_point: args.entry_point,
        register: !args.no_register,
        variables: args.vars.to_variables(),
        force: args.force,
    };

    if args.dry_run {
        let plan = scaffold.plan_module(&request)?;

        if output.is_json() {
            return output.json(&plan);
        }
        print_plan(output, &plan, Some(&args.dir))?;
        output.info("Dry run: nothing was written")?;
        return Ok(());
    }

    let report = scaffold.create_module(&request)?;

    if output.is_json() {
        return output.json(&report);
    }
    print_report(output, &report)?;

    match &report.registration {
        Some(RegistrationOutcome::Registered { entry_point }) => {
            output.success(&format!("Registered in {}", entry_point.display()))?;
        }
        Some(RegistrationOutcome::EntryPointMissing { entry_point }) => {
            output.warning(&format!(
                "Entry point {} not found; register the module by hand",
                entry_point.display()
            ))?;
        }
        Some(RegistrationOutcome::MarkerMissing { entry_point }) => {
            output.warning(&format!(
                "No registration marker in {}; register the module by hand",
                entry_point.display()
            ))?;
        }
        None if !args.no_register => {
            output.info(&format!("No registration configured for {ecosystem}"))?;
        }
        None => {}
    }

    output.success(&format!(
        "Module '{}' ({ecosystem}) added to {}",
        args.name,
        args.dir.display()
    ))?;

    Ok(())
}
