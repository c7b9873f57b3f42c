//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::{delete, formats, harvest, page, put};

/// CLI tool for managing and harvesting a gleaner file store.
#[derive(Parser, Debug)]
#[command(name = "gleaner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create or replace a record in the store
    Put(put::PutArgs),

    /// Tombstone a record
    Delete(delete::DeleteArgs),

    /// List or extend the format registry
    Formats(formats::FormatsArgs),

    /// Run a selective harvest against the store
    Harvest(harvest::HarvestArgs),

    /// Fetch a single page from a resumption token
    Page(page::PageArgs),
}
