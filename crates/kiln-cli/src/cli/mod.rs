//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "kiln",
    bin_name = "kiln",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Materialize generated projects and scaffold DDD modules",
    long_about = "Kiln turns a generated multi-variant project tree into a single \
                  FastAPI or Django REST Framework project, and adds layered DDD \
                  modules to it afterwards.",
    after_help = "EXAMPLES:\n\
        \x20 kiln materialize ./demo --framework fastapi --database postgresql\n\
        \x20 kiln materialize --params cookiecutter.json --git\n\
        \x20 kiln create-ddd-app orders --service-name sales\n\
        \x20 kiln completions bash > /usr/share/bash-completion/completions/kiln",
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
    /// Collapse a staged project tree to the chosen variant.
    #[command(
        visible_alias = "m",
        about = "Materialize a generated project",
        after_help = "EXAMPLES:\n\
            \x20 kiln materialize                         # current directory, marker + prompts\n\
            \x20 kiln materialize ./demo -f drf -d mysql\n\
            \x20 kiln materialize ./demo --params params.json --no-input\n\
            \x20 kiln materialize ./demo -f fastapi -d sqlite --dry-run"
    )]
    Materialize(MaterializeArgs),

    /// Generate a layered DDD module inside a project.
    #[command(
        visible_alias = "ddd",
        about = "Create a DDD module",
        after_help = "EXAMPLES:\n\
            \x20 kiln create-ddd-app orders\n\
            \x20 kiln create-ddd-app invoices --service-name billing\n\
            \x20 kiln create-ddd-app orders --startapp-cmd \"python manage.py startapp\""
    )]
    CreateDddApp(CreateAppArgs),

    /// Initialise a Kiln configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 kiln init             # default location\n\
            \x20 kiln init --force     # overwrite existing file\n\
            \x20 kiln -c ./kiln.toml init"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 kiln completions bash > ~/.local/share/bash-completion/completions/kiln\n\
            \x20 kiln completions zsh  > ~/.zfunc/_kiln\n\
            \x20 kiln completions fish > ~/.config/fish/completions/kiln.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Kiln configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 kiln config get defaults.framework\n\
            \x20 kiln config list\n\
            \x20 kiln config path"
    )]
    Config(ConfigCommands),
}

// ── materialize ───────────────────────────────────────────────────────────────

/// Arguments for `kiln materialize`.
#[derive(Debug, Args)]
pub struct MaterializeArgs {
    /// Generated project root.
    #[arg(value_name = "ROOT", default_value = ".", help = "Generated project root")]
    pub root: PathBuf,

    /// Variant identifier. Kept as free text so unknown values reach the
    /// registry and are reported with the list of known variants.
    #[arg(
        short = 'f',
        long = "framework",
        value_name = "ID",
        help = "Framework variant (fastapi, drf)"
    )]
    pub framework: Option<String>,

    /// Database kind.
    #[arg(
        short = 'd',
        long = "database",
        value_name = "KIND",
        help = "Database kind (sqlite, postgresql, mysql)"
    )]
    pub database: Option<String>,

    /// Display name; defaults to the root directory's name.
    #[arg(short = 'n', long = "name", value_name = "NAME", help = "Project name")]
    pub name: Option<String>,

    /// Override the slug derived from the name.
    #[arg(long = "slug", value_name = "SLUG", help = "Project slug")]
    pub slug: Option<String>,

    #[arg(long = "author", value_name = "NAME", help = "Author name")]
    pub author: Option<String>,

    #[arg(long = "email", value_name = "EMAIL", help = "Author email")]
    pub email: Option<String>,

    #[arg(long = "description", value_name = "TEXT", help = "Project description")]
    pub description: Option<String>,

    /// JSON parameter record written by the generator.
    #[arg(
        short = 'p',
        long = "params",
        value_name = "FILE",
        help = "Read parameters from a JSON file"
    )]
    pub params: Option<PathBuf>,

    /// Initialise a git repository and commit the result.
    #[arg(long = "git", help = "git init + initial commit after materializing")]
    pub git: bool,

    /// Print the plan without touching the tree.
    #[arg(long = "dry-run", help = "Show what would change without changing it")]
    pub dry_run: bool,

    /// Never prompt; fail on missing parameters instead.
    #[arg(long = "no-input", help = "Do not prompt for missing parameters")]
    pub no_input: bool,
}

// ── create-ddd-app ────────────────────────────────────────────────────────────

/// Arguments for `kiln create-ddd-app`.
#[derive(Debug, Args)]
pub struct CreateAppArgs {
    /// Module name; must be a valid Python identifier.
    #[arg(value_name = "MODULE", help = "Module name")]
    pub module: String,

    /// Service directory name (`<NAME>_service`); defaults to the module.
    #[arg(long = "service-name", value_name = "NAME", help = "Service name")]
    pub service_name: Option<String>,

    /// Project root containing the source directory.
    #[arg(
        long = "project-root",
        value_name = "DIR",
        default_value = ".",
        help = "Project root"
    )]
    pub project_root: PathBuf,

    /// Source directory relative to the project root.
    #[arg(
        long = "source-dir",
        value_name = "DIR",
        help = "Source directory under the project root [default: src]"
    )]
    pub source_dir: Option<PathBuf>,

    /// External command creating the base module; the module name is appended.
    #[arg(
        long = "startapp-cmd",
        value_name = "CMD",
        help = "Command that creates the base module, e.g. \"python manage.py startapp\""
    )]
    pub startapp_cmd: Option<String>,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `kiln init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `kiln completions`.
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

/// Subcommands for `kiln config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.framework`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn materialize_defaults_to_current_dir() {
        let cli = Cli::parse_from(["kiln", "materialize"]);
        let Commands::Materialize(args) = cli.command else {
            panic!("expected Materialize command");
        };
        assert_eq!(args.root, PathBuf::from("."));
        assert!(args.framework.is_none());
        assert!(!args.git);
    }

    #[test]
    fn unknown_framework_is_left_to_the_registry() {
        let cli = Cli::parse_from(["kiln", "m", "demo", "-f", "flask", "-d", "sqlite"]);
        let Commands::Materialize(args) = cli.command else {
            panic!("expected Materialize command");
        };
        assert_eq!(args.framework.as_deref(), Some("flask"));
        assert_eq!(args.root, PathBuf::from("demo"));
    }

    #[test]
    fn create_ddd_app_options() {
        let cli = Cli::parse_from([
            "kiln",
            "create-ddd-app",
            "invoices",
            "--service-name",
            "billing",
            "--project-root",
            "/srv/app",
        ]);
        let Commands::CreateDddApp(args) = cli.command else {
            panic!("expected CreateDddApp command");
        };
        assert_eq!(args.module, "invoices");
        assert_eq!(args.service_name.as_deref(), Some("billing"));
        assert_eq!(args.project_root, PathBuf::from("/srv/app"));
        assert!(args.source_dir.is_none());
    }

    #[test]
    fn module_name_is_required() {
        assert!(Cli::try_parse_from(["kiln", "create-ddd-app"]).is_err());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["kiln", "--quiet", "--verbose", "config", "list"]);
        assert!(result.is_err());
    }
}
