//! `stencil plan`: resolve and print a plan without writing anything.

use stencil_core::domain::{Category, Variables};

use crate::{
    cli::{GlobalArgs, PlanArgs, PlanFormat},
    commands::{default_ecosystem, default_module_path, print_plan, scaffold_service},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(
    args: PlanArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let category = match args.category {
        Some(category) => category,
        None => config
            .defaults
            .category
            .parse()
            .map_err(|e| CliError::ConfigError {
                message: format!(
                    "defaults.category '{}' is not a valid category",
                    config.defaults.category
                ),
                source: Some(Box::new(e)),
            })?,
    };
    let ecosystem = match args.ecosystem {
        Some(tag) => tag,
        None => default_ecosystem(config)?,
    };

    let variables = seed_variables(&category, args.name.as_deref(), &config.defaults.module_root)
        .merge(&args.vars.to_variables());

    let plan = scaffold_service(global, config).preview(&category, &ecosystem, &variables)?;

    if args.format == PlanFormat::Json || output.is_json() {
        return output.json(&plan);
    }

    if plan.is_empty() {
        output.warning(&format!(
            "No templates for category '{category}' and ecosystem '{ecosystem}'"
        ))?;
        return Ok(());
    }
    print_plan(output, &plan, None)
}

/// Standard variables for `name` in `category`. Unknown categories get none.
fn seed_variables(category: &Category, name: Option<&str>, module_root: &str) -> Variables {
    match (category, name) {
        (Category::Service, Some(name)) => Variables::for_service(name),
        (Category::Module, Some(name)) => {
            Variables::for_module(name, Some(default_module_path(module_root, name).as_str()))
        }
        _ => Variables::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_name_seeds_service_name() {
        let vars = seed_variables(&Category::Service, Some("orders"), "internal");
        assert_eq!(vars.get("SERVICE_NAME"), Some("orders"));
    }

    #[test]
    fn module_name_seeds_module_path_under_root() {
        let vars = seed_variables(&Category::Module, Some("billing"), "pkg/");
        assert_eq!(vars.get("MODULE_NAME"), Some("billing"));
        assert_eq!(vars.get("MODULE_PATH"), Some("pkg/billing"));
    }

    #[test]
    fn no_name_means_no_variables() {
        assert!(seed_variables(&Category::Module, None, "internal").is_empty());
        assert!(seed_variables(&Category::Other("docs".into()), Some("x"), "internal").is_empty());
    }
}
