//! Thumber CLI - derive thumbnails from geometry-suffixed file names.
//!
//! A request path like `photos/cat-64x64.png` names the main image
//! `photos/cat.png` and the geometry `64x64`. Thumber checks the geometry
//! against the configured allow-list, resizes the main image and writes the
//! result at the requested path under the storage root.
//!
//! # Usage
//!
//! ```bash
//! # Generate a thumbnail under the configured storage root
//! thumber generate photos/cat-64x64.png
//!
//! # Use another root and several workers
//! thumber generate --root ./public --parallel 8 a/cat-64x64.png b/dog-200x200#.jpg
//!
//! # See how a path parses without touching any image
//! thumber inspect users/42-200x200.jpg
//!
//! # View configuration
//! thumber config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// Thumber - derive thumbnails from geometry-suffixed file names.
#[derive(Parser, Debug)]
#[command(name = "thumber")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file (defaults to the platform config directory)
    #[arg(short, long, global = true, env = "THUMBER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate thumbnails and write them next to their main images
    Generate(cli::generate::GenerateArgs),

    /// Show how thumbnail paths parse and resolve
    Inspect(cli::inspect::InspectArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Thumber v{}", thumber_core::VERSION);

    run(cli, config).await
}

/// Load the configuration for this invocation.
///
/// An explicit `--config` file must load, except for the `config` command,
/// which has to work on missing or broken files. Otherwise a bad file
/// falls back to defaults with a warning.
fn load_config(cli: &Cli) -> anyhow::Result<thumber_core::Config> {
    let managing_config = matches!(cli.command, Commands::Config(_));
    let loaded = match &cli.config {
        Some(path) if !managing_config => return Ok(thumber_core::Config::load_from(path)?),
        Some(path) => thumber_core::Config::load_from(path),
        None => thumber_core::Config::load(),
    };

    // Logging isn't initialized yet, so use eprintln for config warnings.
    Ok(loaded.unwrap_or_else(|e| {
        eprintln!(
            "Warning: Failed to load config: {e}\n  \
             Using default configuration. Check your config file with `thumber config path`."
        );
        thumber_core::Config::default()
    }))
}

async fn run(cli: Cli, config: thumber_core::Config) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate(args) => cli::generate::execute(args, &config).await,
        Commands::Inspect(args) => cli::inspect::execute(args, &config).await,
        Commands::Config(args) => cli::config::execute(args, &config, cli.config).await,
    }
}
