//! gleaner - CLI tool for managing and harvesting a file-backed record
//! store.
//!
//! This is a thin wrapper over the gleaner libraries, intended for
//! building fixture repositories and exercising the pagination engine
//! from the command line.

mod cli;
mod commands;
mod keys;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.json_logs);

    match cli.command {
        Commands::Put(args) => commands::put::run(args),
        Commands::Delete(args) => commands::delete::run(args),
        Commands::Formats(args) => commands::formats::run(args),
        Commands::Harvest(args) => commands::harvest::run(args).await,
        Commands::Page(args) => commands::page::run(args).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .init();
    }
}
