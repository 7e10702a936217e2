//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use stencil_core::domain::{Assignment, Category, EcosystemTag, Variables};

pub mod global;
pub use global::{GlobalArgs, LogFormat, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "stencil",
    bin_name = "stencil",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Template-driven service and module scaffolding",
    long_about = "Stencil renders a catalog of shared and ecosystem-specific \
                  templates into new services, and adds feature modules to \
                  existing ones.",
    after_help = "EXAMPLES:\n\
        \x20 stencil service orders --lang go\n\
        \x20 stencil module billing --dir ./orders\n\
        \x20 stencil plan service --lang py --format json\n\
        \x20 stencil list --lang go\n\
        \x20 stencil completions bash > /usr/share/bash-completion/completions/stencil",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a new service.
    #[command(
        visible_alias = "svc",
        about = "Generate a new service",
        after_help = "EXAMPLES:\n\
            \x20 stencil service orders --lang go\n\
            \x20 stencil service orders --lang py --dir ~/src --var PORT=9000\n\
            \x20 stencil service orders --lang go --dry-run"
    )]
    Service(ServiceArgs),

    /// Add a module to an existing service.
    #[command(
        visible_alias = "mod",
        about = "Add a module to an existing service",
        after_help = "EXAMPLES:\n\
            \x20 stencil module billing                  # service in CWD, ecosystem detected\n\
            \x20 stencil module billing --dir ./orders --lang go\n\
            \x20 stencil module billing --path pkg/billing --no-register"
    )]
    Module(ModuleArgs),

    /// Show the resolved plan without writing anything.
    #[command(
        about = "Show the resolved plan",
        after_help = "EXAMPLES:\n\
            \x20 stencil plan service --lang go\n\
            \x20 stencil plan module --lang py --name invoice --format json"
    )]
    Plan(PlanArgs),

    /// List catalog templates.
    #[command(
        visible_alias = "ls",
        about = "List available templates",
        after_help = "EXAMPLES:\n\
            \x20 stencil list\n\
            \x20 stencil list --lang go\n\
            \x20 stencil list --category module --format json"
    )]
    List(ListArgs),

    /// Initialise a Stencil configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 stencil init                  # default location\n\
            \x20 stencil init -c ./stencil.toml\n\
            \x20 stencil init --force          # overwrite"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 stencil completions bash > ~/.local/share/bash-completion/completions/stencil\n\
            \x20 stencil completions zsh  > ~/.zfunc/_stencil\n\
            \x20 stencil completions fish > ~/.config/fish/completions/stencil.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the Stencil configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 stencil config get defaults.ecosystem\n\
            \x20 stencil config set defaults.ecosystem py\n\
            \x20 stencil config list"
    )]
    Config(ConfigCommands),
}

// ── shared arguments ──────────────────────────────────────────────────────────

/// Extra template variables, `--var KEY=VALUE`.
#[derive(Debug, Args, Default)]
pub struct VarArgs {
    /// Extra template variable. Repeatable; later values win.
    #[arg(
        long = "var",
        value_name = "KEY=VALUE",
        help = "Set a template variable (repeatable)"
    )]
    pub vars: Vec<Assignment>,
}

impl VarArgs {
    pub fn to_variables(&self) -> Variables {
        self.vars
            .iter()
            .map(|a| (a.key.as_str(), a.value.as_str()))
            .collect()
    }
}

// ── service ───────────────────────────────────────────────────────────────────

/// Arguments for `stencil service`.
#[derive(Debug, Args)]
pub struct ServiceArgs {
    /// Service name; becomes the directory name and `SERVICE_NAME`.
    #[arg(value_name = "NAME", help = "Service name")]
    pub name: String,

    /// Ecosystem tag, e.g. `go` or `py`.
    #[arg(
        short = 'l',
        long = "lang",
        value_name = "TAG",
        help = "Ecosystem (default: defaults.ecosystem from config)"
    )]
    pub ecosystem: Option<EcosystemTag>,

    /// Directory the service is created in.
    #[arg(
        short = 'd',
        long = "dir",
        value_name = "DIR",
        default_value = ".",
        help = "Parent directory"
    )]
    pub dir: PathBuf,

    #[command(flatten)]
    pub vars: VarArgs,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,

    /// Write into an existing directory, replacing generated files.
    #[arg(long = "force", help = "Write into an existing directory")]
    pub force: bool,

    /// Skip the confirmation prompt for `--force`.
    #[arg(short = 'y', long = "yes", help = "Skip confirmation")]
    pub yes: bool,
}

// ── module ────────────────────────────────────────────────────────────────────

/// Arguments for `stencil module`.
#[derive(Debug, Args)]
pub struct ModuleArgs {
    /// Module name; becomes `MODULE_NAME` and the file prefix.
    #[arg(value_name = "NAME", help = "Module name")]
    pub name: String,

    /// Ecosystem tag. Detected from the service when omitted.
    #[arg(
        short = 'l',
        long = "lang",
        value_name = "TAG",
        help = "Ecosystem (default: detected from the service)"
    )]
    pub ecosystem: Option<EcosystemTag>,

    /// Root of the existing service.
    #[arg(
        short = 'd',
        long = "dir",
        value_name = "DIR",
        default_value = ".",
        help = "Service root"
    )]
    pub dir: PathBuf,

    /// Module directory inside the service.
    #[arg(
        short = 'p',
        long = "path",
        value_name = "PATH",
        help = "Module path (default: <defaults.module_root>/<NAME>)"
    )]
    pub path: Option<String>,

    /// File that receives the registration snippet.
    #[arg(
        long = "entry-point",
        value_name = "FILE",
        help = "Override the registration entry point"
    )]
    pub entry_point: Option<String>,

    /// Do not touch the entry point.
    #[arg(long = "no-register", help = "Skip module registration")]
    pub no_register: bool,

    #[command(flatten)]
    pub vars: VarArgs,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,

    /// Replace existing module files.
    #[arg(long = "force", help = "Overwrite existing module files")]
    pub force: bool,
}

// ── plan ──────────────────────────────────────────────────────────────────────

/// Arguments for `stencil plan`.
#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Category to plan, e.g. `service` or `module`.
    #[arg(
        value_name = "CATEGORY",
        help = "Category (default: defaults.category from config)"
    )]
    pub category: Option<Category>,

    /// Ecosystem tag.
    #[arg(
        short = 'l',
        long = "lang",
        value_name = "TAG",
        help = "Ecosystem (default: defaults.ecosystem from config)"
    )]
    pub ecosystem: Option<EcosystemTag>,

    /// Seed the standard variables for this service or module name.
    #[arg(short = 'n', long = "name", value_name = "NAME", help = "Name to plan for")]
    pub name: Option<String>,

    #[command(flatten)]
    pub vars: VarArgs,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: PlanFormat,
}

/// Output format for the `plan` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlanFormat {
    /// Directories then files, one per line.
    Table,
    /// The plan as JSON.
    Json,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `stencil list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Filter by category.
    #[arg(long = "category", value_name = "CATEGORY", help = "Filter by category")]
    pub category: Option<Category>,

    /// Show the resolved view for one ecosystem.
    #[arg(
        short = 'l',
        long = "lang",
        value_name = "TAG",
        help = "Show what one ecosystem resolves to"
    )]
    pub ecosystem: Option<EcosystemTag>,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One identity per line.
    List,
    /// JSON array.
    Json,
    /// CSV rows.
    Csv,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `stencil init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `stencil completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `stencil config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.ecosystem`.
        key: String,
    },
    /// Set a configuration key to a value.
    Set {
        /// Dotted key path.
        key: String,
        /// New value.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
