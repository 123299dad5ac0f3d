//! # rx CLI entry point
//!
//! Parses command-line arguments, builds the registry, and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rx_cli::check::{run_check, CheckArgs};
use rx_cli::document::load_registry;
use rx_cli::inspect::{run_expand, run_types, ExpandArgs, TypesArgs};

/// Rx schema validator.
///
/// Compiles Rx schemas and validates JSON/YAML documents against them.
#[derive(Parser, Debug)]
#[command(name = "rx", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Registry configuration file (extra prefixes and learned types).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate documents against a schema.
    Check(CheckArgs),

    /// Expand type names to canonical URIs.
    Expand(ExpandArgs),

    /// List registered types.
    Types(TypesArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins when set; otherwise -v picks the level.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = load_registry(cli.config.as_deref()).and_then(|registry| match &cli.command {
        Commands::Check(args) => run_check(args, &registry),
        Commands::Expand(args) => run_expand(args, &registry),
        Commands::Types(args) => run_types(args, &registry),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
