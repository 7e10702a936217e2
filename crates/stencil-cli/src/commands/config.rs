//! `stencil config`: read and write configuration values.

use std::{fs, path::Path};

use stencil_core::domain::{Category, EcosystemTag};

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Every key `get` and `set` accept.
const KEYS: &[&str] = &[
    "defaults.ecosystem",
    "defaults.category",
    "defaults.module_root",
    "templates.root",
    "output.no_color",
    "output.format",
];

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            output.data(&get_config_value(config, &key)?)?;
        }

        ConfigCommands::Set { key, value } => {
            let path = AppConfig::resolve_path(global.config.as_deref());
            set_config_value(&path, &key, &value)?;
            output.success(&format!("Set {key} = {value} in {}", path.display()))?;
        }

        ConfigCommands::List => {
            if output.is_json() {
                return output.json(config);
            }
            let serialised =
                toml::to_string_pretty(config).with_cli_context(|| "Failed to serialise config")?;
            output.data(serialised.trim_end())?;
        }

        ConfigCommands::Path => {
            let path = AppConfig::resolve_path(global.config.as_deref());
            output.data(&path.display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    match key {
        "defaults.ecosystem" => Ok(config.defaults.ecosystem.clone()),
        "defaults.category" => Ok(config.defaults.category.clone()),
        "defaults.module_root" => Ok(config.defaults.module_root.clone()),
        "templates.root" => Ok(config
            .templates
            .root
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()),
        "output.no_color" => Ok(config.output.no_color.to_string()),
        "output.format" => Ok(config.output.format.clone()),
        _ => Err(unknown_key(key)),
    }
}

/// Update one key in the file at `path`, creating it if needed. Other keys
/// and sections already in the file are preserved.
fn set_config_value(path: &Path, key: &str, value: &str) -> CliResult<()> {
    let (section, field) = key
        .split_once('.')
        .filter(|_| KEYS.contains(&key))
        .ok_or_else(|| unknown_key(key))?;

    let mut table: toml::Table = if path.is_file() {
        let text = fs::read_to_string(path)
            .with_cli_context(|| format!("Failed to read '{}'", path.display()))?;
        toml::from_str(&text).with_cli_context(|| format!("Failed to parse '{}'", path.display()))?
    } else {
        toml::Table::new()
    };

    let section_table = table
        .entry(section)
        .or_insert(toml::Value::Table(toml::Table::new()))
        .as_table_mut()
        .ok_or_else(|| CliError::ConfigError {
            message: format!("'{section}' in {} is not a table", path.display()),
            source: None,
        })?;
    section_table.insert(field.to_string(), parse_value(key, value)?);

    toml::Value::Table(table.clone())
        .try_into::<AppConfig>()
        .with_cli_context(|| format!("'{key} = {value}' would make the config invalid"))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_cli_context(|| {
            format!("Failed to create config directory '{}'", parent.display())
        })?;
    }
    let text = toml::to_string_pretty(&table).with_cli_context(|| "Failed to serialise config")?;
    fs::write(path, text).with_cli_context(|| format!("Failed to write '{}'", path.display()))
}

/// Typed TOML value for `key`, validated where the key has a domain type.
fn parse_value(key: &str, value: &str) -> CliResult<toml::Value> {
    let invalid = |e: Box<dyn std::error::Error + Send + Sync>| CliError::InvalidInput {
        message: format!("'{value}' is not a valid value for {key}"),
        source: Some(e),
    };

    Ok(match key {
        "output.no_color" => toml::Value::Boolean(
            value
                .trim()
                .parse::<bool>()
                .map_err(|e| invalid(Box::new(e)))?,
        ),
        "defaults.ecosystem" => toml::Value::String(
            value
                .parse::<EcosystemTag>()
                .map_err(|e| invalid(Box::new(e)))?
                .to_string(),
        ),
        "defaults.category" => toml::Value::String(
            value
                .parse::<Category>()
                .map_err(|e| invalid(Box::new(e)))?
                .to_string(),
        ),
        _ => toml::Value::String(value.to_string()),
    })
}

fn unknown_key(key: &str) -> CliError {
    CliError::ConfigError {
        message: format!("Unknown config key: '{key}' (known: {})", KEYS.join(", ")),
        source: None,
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
