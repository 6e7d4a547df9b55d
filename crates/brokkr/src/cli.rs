//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Brokkr - install and track versioned modules from git repositories
#[derive(Parser, Debug)]
#[command(name = "brokkr")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Repository source management
    #[command(subcommand)]
    Repo(RepoCommands),

    /// Check out a ref from a registered repository
    Checkout(CheckoutArgs),

    /// Installed module management
    #[command(subcommand)]
    Module(ModuleCommands),

    /// Show version information
    Version(VersionArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// Repo commands

#[derive(Subcommand, Debug)]
pub enum RepoCommands {
    /// Register a repository source
    Add(RepoAddArgs),

    /// List registered repository sources
    List(RepoListArgs),

    /// Validate a source and refresh its ref catalog
    #[command(alias = "refresh")]
    Validate(RepoValidateArgs),

    /// Show the cached ref catalog of a source
    Refs(RepoRefsArgs),

    /// Remove a repository source
    Remove(RepoRemoveArgs),
}

#[derive(Args, Debug)]
pub struct RepoAddArgs {
    /// Unique name for the source
    pub name: String,

    /// Public repository URL (GitHub, GitLab, or any git host)
    pub url: String,

    /// Absolute directory checkouts are published to
    /// (defaults to `default_target_root` from the config file)
    #[arg(short, long)]
    pub target: Option<Utf8PathBuf>,

    /// Register the source as inactive
    #[arg(long)]
    pub inactive: bool,
}

#[derive(Args, Debug)]
pub struct RepoListArgs {
    /// Include inactive sources
    #[arg(long)]
    pub all: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct RepoValidateArgs {
    /// Name of the source to validate
    pub name: String,
}

#[derive(Args, Debug)]
pub struct RepoRefsArgs {
    /// Name of the source
    pub name: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct RepoRemoveArgs {
    /// Name of the source to remove
    pub name: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

// Checkout command

#[derive(Args, Debug)]
pub struct CheckoutArgs {
    /// Name of the registered repository source
    pub repo: String,

    /// Ref to check out: `tag:<name>`, `branch:<name>`, or a bare tag name
    pub reference: String,

    /// Override the module name derived from the repository URL
    #[arg(long)]
    pub module_name: Option<String>,

    /// Reload the host's module list after the checkout
    #[arg(long)]
    pub reload: bool,

    /// Signal the host process to restart after the checkout
    #[arg(long)]
    pub restart: bool,
}

// Module commands

#[derive(Subcommand, Debug)]
pub enum ModuleCommands {
    /// List installed modules
    List(ModuleListArgs),

    /// Remove an installed module
    Remove(ModuleRemoveArgs),
}

#[derive(Args, Debug)]
pub struct ModuleListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ModuleRemoveArgs {
    /// Installed path or module name of the checkout to remove
    pub target: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

// Version command

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Completions command

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
