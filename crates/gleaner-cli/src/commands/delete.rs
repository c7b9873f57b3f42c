//! Delete command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;

use gleaner_core::RecordId;
use gleaner_file::FileStore;

use crate::output;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Store root directory
    #[arg(long)]
    pub store: PathBuf,

    /// Record identifier
    #[arg(long)]
    pub id: String,
}

pub fn run(args: DeleteArgs) -> Result<()> {
    let id = RecordId::new(&args.id).context("Invalid record identifier")?;

    let store = FileStore::new(&args.store);
    store
        .tombstone(&id, Utc::now())
        .context("Failed to delete record")?;

    output::success(&format!("Deleted {}", id));
    Ok(())
}
