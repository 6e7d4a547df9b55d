//! Brokkr CLI - install and track versioned modules from git repositories
//!
//! This is the main entry point for the Brokkr command-line interface.

mod cli;
mod commands;
mod config;
mod host;
mod output;
mod store;
mod version;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI args
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose, cli.quiet);

    // Run command
    match cli.command {
        Commands::Repo(args) => commands::repo::run(args).await,
        Commands::Checkout(args) => commands::checkout::run(args).await,
        Commands::Module(args) => commands::module::run(args).await,
        Commands::Version(args) => commands::version::run(args),
        Commands::Completions(args) => commands::completions::run(args),
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            // Default to warn so operator-facing output stays clean;
            // -v/-vv raise the level for troubleshooting
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
