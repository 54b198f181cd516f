//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "stubforge",
    bin_name = "stubforge",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Class stubs, application skeletons and components in one command",
    long_about = "stubforge renders PHP class stubs for swoft applications, \
                  creates new applications from skeleton repositories and \
                  lays out reusable components.",
    after_help = "EXAMPLES:\n\
        \x20 stubforge gen controller user\n\
        \x20 stubforge gen command demo app/Console -y\n\
        \x20 stubforge new app shop --type http\n\
        \x20 stubforge new component cache --pkg-name acme/cache\n\
        \x20 stubforge completions bash > /usr/share/bash-completion/completions/stubforge",
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

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a class file from a stub.
    #[command(
        visible_alias = "g",
        about = "Generate a class file from a stub template",
        after_help = "EXAMPLES:\n\
            \x20 stubforge gen controller user\n\
            \x20 stubforge gen ctrl order --prefix /api/orders --rest false\n\
            \x20 stubforge gen listener order @app/Listener/Order -y\n\
            \x20 stubforge gen task report --tpl-file ./my-task.stub"
    )]
    Gen(GenArgs),

    /// Create an application or a component.
    #[command(subcommand, visible_alias = "n", about = "Create an application or a component")]
    New(NewCommands),

    /// List the known artifact types.
    #[command(
        visible_alias = "ls",
        about = "List artifact types usable with `gen`",
        after_help = "EXAMPLES:\n\
            \x20 stubforge list\n\
            \x20 stubforge list --format json"
    )]
    List(ListArgs),

    /// Initialise a stubforge configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 stubforge init           # user config directory\n\
            \x20 stubforge init --local   # .stubforge.toml in CWD"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 stubforge completions bash > ~/.local/share/bash-completion/completions/stubforge\n\
            \x20 stubforge completions zsh  > ~/.zfunc/_stubforge\n\
            \x20 stubforge completions fish > ~/.config/fish/completions/stubforge.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the stubforge configuration.
    #[command(
        about = "Configuration inspection",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 stubforge config get generator.template_dir\n\
            \x20 stubforge config list\n\
            \x20 stubforge config path"
    )]
    Config(ConfigCommands),
}

// ── gen ───────────────────────────────────────────────────────────────────────

/// Arguments for `stubforge gen`.
#[derive(Debug, Args)]
pub struct GenArgs {
    /// Artifact type key or alias (see `stubforge list`).
    #[arg(value_name = "TYPE")]
    pub type_key: String,

    /// Class name without suffix or extension. Prompted for when omitted.
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    /// Output directory. Accepts `@alias/...` paths.
    #[arg(value_name = "DIR")]
    pub dir: Option<String>,

    /// Template file name, or a path to a template file.
    #[arg(long = "tpl-file", value_name = "FILE")]
    pub tpl_file: Option<String>,

    /// Directory holding the class templates.
    #[arg(long = "tpl-dir", value_name = "DIR")]
    pub tpl_dir: Option<PathBuf>,

    /// Class namespace.
    #[arg(short = 'n', long = "namespace", value_name = "NS")]
    pub namespace: Option<String>,

    /// Class name suffix.
    #[arg(long = "suffix", value_name = "SUFFIX")]
    pub suffix: Option<String>,

    /// Route prefix for controllers and websocket modules.
    #[arg(long = "prefix", value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Render a RESTful http controller; `--rest false` selects the plain one.
    #[arg(
        long = "rest",
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub rest: Option<bool>,

    /// Show the rendered content before writing.
    #[arg(long = "preview")]
    pub preview: bool,

    /// Skip every confirmation.
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,
}

// ── new ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum NewCommands {
    /// Create an application from a skeleton repository.
    #[command(
        visible_alias = "application",
        after_help = "EXAMPLES:\n\
            \x20 stubforge new app shop --type http\n\
            \x20 stubforge new app chat --type ws --no-install\n\
            \x20 stubforge new app tool --repo me/tool-skeleton --refresh"
    )]
    App(NewAppArgs),

    /// Create a reusable component skeleton.
    #[command(
        visible_alias = "comp",
        after_help = "EXAMPLES:\n\
            \x20 stubforge new component cache\n\
            \x20 stubforge new component cache -o ./libs --pkg-name acme/cache --no-license"
    )]
    Component(NewComponentArgs),
}

/// Arguments for `stubforge new app`.
#[derive(Debug, Args)]
pub struct NewAppArgs {
    /// Application name; also the directory created under the working dir.
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Preset skeleton: http, ws, tcp or rpc.
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub project_type: Option<String>,

    /// Skeleton repository: full URL or `user/repo` on GitHub. Wins over `--type`.
    #[arg(long = "repo", value_name = "REPO")]
    pub repo: Option<String>,

    /// Drop the cached skeleton and clone it again.
    #[arg(long = "refresh")]
    pub refresh: bool,

    /// Skip the dependency install step.
    #[arg(long = "no-install")]
    pub no_install: bool,

    /// Skip every confirmation.
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,
}

/// Arguments for `stubforge new component`.
#[derive(Debug, Args)]
pub struct NewComponentArgs {
    /// Component name.
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Parent directory of the component (default: working dir).
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Root namespace (default: the capitalized name).
    #[arg(short = 'n', long = "namespace", value_name = "NS")]
    pub namespace: Option<String>,

    /// Composer package name (default: `<username>/<name>`).
    #[arg(long = "pkg-name", value_name = "VENDOR/NAME")]
    pub pkg_name: Option<String>,

    /// Vendor name used for the default package name.
    #[arg(long = "username", value_name = "NAME")]
    pub username: Option<String>,

    /// Leave out the LICENSE file.
    #[arg(long = "no-license")]
    pub no_license: bool,

    /// Skip every confirmation.
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `stubforge list`.
#[derive(Debug, Args)]
pub struct ListArgs {
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
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One type key per line.
    List,
    /// JSON array.
    Json,
    /// CSV rows.
    Csv,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `stubforge init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write `.stubforge.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `stubforge completions`.
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

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `generator.template_dir`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the user configuration file.
    Path,
}
