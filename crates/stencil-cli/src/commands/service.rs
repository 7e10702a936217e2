//! `stencil service`: generate a new service.

use tracing::info;

use stencil_core::application::ServiceRequest;

use crate::{
    cli::{GlobalArgs, ServiceArgs},
    commands::{confirm, default_ecosystem, print_plan, print_report, scaffold_service},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(
    args: ServiceArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let ecosystem = match args.ecosystem {
        Some(tag) => tag,
        None => default_ecosystem(config)?,
    };
    let scaffold = scaffold_service(global, config);
    let root = args.dir.join(&args.name);
    let request = ServiceRequest {
        name: args.name.clone(),
        parent: args.dir.clone(),
        ecosystem: ecosystem.clone(),
        variables: args.vars.to_variables(),
        force: args.force,
    };

    if args.dry_run {
        let plan = scaffold.plan_service(&request)?;

        if output.is_json() {
            return output.json(&plan);
        }
        print_plan(output, &plan, Some(&root))?;
        if root.exists() && !args.force {
            output.warning(&format!(
                "{} already exists; the real run needs --force",
                root.display()
            ))?;
        }
        output.info("Dry run: nothing was written")?;
        return Ok(());
    }

    if args.force && root.exists() && !args.yes {
        let prompt = format!(
            "{} exists. Overwrite generated files in it?",
            root.display()
        );
        if !confirm(&prompt)? {
            return Err(CliError::Cancelled);
        }
    }

    info!(service = %args.name, ecosystem = %ecosystem, "creating service");
    let report = scaffold.create_service(&request)?;

    if output.is_json() {
        return output.json(&report);
    }
    print_report(output, &report)?;
    output.success(&format!(
        "Service '{}' ({ecosystem}) created at {}",
        args.name,
        report.materialized.root.display()
    ))?;

    Ok(())
}
