//! Page command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use gleaner_engine::{HarvestConfig, HarvestRequest, Harvester};
use gleaner_file::{FileFormatRegistry, FileStore};

use crate::{keys, output};

#[derive(Args, Debug)]
pub struct PageArgs {
    /// Store root directory
    #[arg(long)]
    pub store: PathBuf,

    /// Resumption token from a previous page
    #[arg(long)]
    pub token: String,

    /// Pretty-print records
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: PageArgs) -> Result<()> {
    let store = FileStore::new(&args.store);
    let registry =
        FileFormatRegistry::load(&args.store).context("Failed to load format registry")?;
    let signing_keys = keys::load_or_create(&args.store)?;

    let harvester = Harvester::new(store, registry, signing_keys, HarvestConfig::default());

    let request = HarvestRequest::resume(&args.token);
    let page = harvester
        .produce_next_page(&request)
        .await
        .context("Page fetch failed")?;

    for record in &page.records {
        if args.pretty {
            output::json_pretty(record)?;
        } else {
            output::json(record)?;
        }
    }

    match page.resumption_token {
        Some(token) => output::note("resumptionToken", &token),
        None => output::note("resumptionToken", "(complete)"),
    }

    Ok(())
}
