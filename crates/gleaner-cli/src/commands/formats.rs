//! Formats command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use gleaner_core::MetadataPrefix;
use gleaner_file::FileFormatRegistry;

use crate::output;

#[derive(Args, Debug)]
pub struct FormatsArgs {
    /// Store root directory
    #[arg(long)]
    pub store: PathBuf,

    /// Register a new format prefix instead of listing
    #[arg(long)]
    pub add: Option<String>,
}

pub fn run(args: FormatsArgs) -> Result<()> {
    let mut registry =
        FileFormatRegistry::load(&args.store).context("Failed to load format registry")?;

    match args.add {
        Some(raw) => {
            let prefix = MetadataPrefix::new(&raw).context("Invalid format prefix")?;
            registry.add(prefix).context("Failed to register format")?;
            output::success(&format!("Registered {}", raw));
        }
        None => {
            for prefix in registry.list() {
                println!("{}", prefix);
            }
        }
    }

    Ok(())
}
