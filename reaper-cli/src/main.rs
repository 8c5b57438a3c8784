//! Reaper CLI - Command line interface for Branch Reaper
//!
//! Deletes stale branches in Azure DevOps repositories.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reaper_core::{Config, Secrets};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::SweepArgs;

/// Branch Reaper: delete branches whose last commit is older than a threshold
#[derive(Parser, Debug)]
#[command(name = "reaper")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ~/.config/reaper/config.toml)
    #[arg(long, global = true, env = "REAPER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Delete stale branches
    #[command(visible_alias = "s")]
    Sweep(SweepArgs),

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = match cli.config {
        Some(ref path) => Config::load_from_file(path)?,
        None => Config::load()?,
    };

    if cli.verbose {
        tracing::info!(
            threshold_days = config.retention.threshold_days,
            excluded = ?config.retention.excluded_branches,
            transcript = %config.transcript.path.display(),
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("reaper {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Sweep(args)) => {
            args.execute(cli.verbose, config).await?;
        }
        Some(Commands::Config) => {
            print_config(&config, cli.config.as_deref())?;
        }
        None => {
            println!("Branch Reaper - stale branch cleanup for Azure DevOps");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn print_config(config: &Config, explicit: Option<&std::path::Path>) -> anyhow::Result<()> {
    println!("Reaper Configuration");
    println!("====================");
    println!();
    println!("Retention:");
    println!("  threshold_days: {}", config.retention.threshold_days);
    println!(
        "  excluded_branches: {}",
        config.retention.excluded_branches.join(", ")
    );
    println!();
    println!("Transcript:");
    println!("  path: {}", config.transcript.path.display());
    println!();
    println!("HTTP:");
    println!("  api_url: {}", config.http.api_url);
    match config.http.timeout {
        Some(t) => println!("  timeout: {:?}", t),
        None => println!("  timeout: (none)"),
    }
    println!();
    println!("Console:");
    println!("  format: {}", config.console.format);
    println!();

    let path = explicit
        .map(|p| p.to_path_buf())
        .or_else(Config::default_config_path);
    if let Some(path) = path {
        println!("Config file: {}", path.display());
        if path.exists() {
            println!("  (exists)");
        } else {
            println!("  (not found - using defaults)");
        }
    }

    let pat_source = if std::env::var_os("PAT").is_some() {
        "PAT environment variable"
    } else if Secrets::resolve_token(None)?.is_some() {
        "secrets file"
    } else {
        "(not set)"
    };
    println!("PAT: {}", pat_source);

    Ok(())
}
