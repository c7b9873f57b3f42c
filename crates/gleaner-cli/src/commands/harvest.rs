//! Harvest command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use gleaner_engine::{HarvestConfig, HarvestRequest, Harvester};
use gleaner_file::{FileFormatRegistry, FileStore};

use crate::{keys, output};

#[derive(Args, Debug)]
pub struct HarvestArgs {
    /// Store root directory
    #[arg(long)]
    pub store: PathBuf,

    /// Metadata format to harvest
    #[arg(long)]
    pub format: String,

    /// Inclusive lower datestamp bound
    #[arg(long)]
    pub from: Option<String>,

    /// Inclusive upper datestamp bound
    #[arg(long)]
    pub until: Option<String>,

    /// Restrict the harvest to a set
    #[arg(long)]
    pub set: Option<String>,

    /// Records per page
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Keep following resumption tokens until the harvest completes
    #[arg(long)]
    pub follow: bool,

    /// Pretty-print records
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: HarvestArgs) -> Result<()> {
    let store = FileStore::new(&args.store);
    let registry =
        FileFormatRegistry::load(&args.store).context("Failed to load format registry")?;
    let signing_keys = keys::load_or_create(&args.store)?;

    let mut config = HarvestConfig::default();
    if let Some(page_size) = args.page_size {
        config = config.with_default_page_size(page_size);
    }

    let harvester = Harvester::new(store, registry, signing_keys, config);

    let mut request = HarvestRequest {
        metadata_prefix: Some(args.format.clone()),
        from: args.from.clone(),
        until: args.until.clone(),
        set: args.set.clone(),
        resumption_token: None,
    };

    let mut pages = 0usize;
    let mut total = 0usize;

    loop {
        let page = harvester
            .produce_next_page(&request)
            .await
            .context("Harvest failed")?;

        pages += 1;
        total += page.records.len();

        for record in &page.records {
            if args.pretty {
                output::json_pretty(record)?;
            } else {
                output::json(record)?;
            }
        }

        match page.resumption_token {
            Some(token) if args.follow => {
                request = HarvestRequest::resume(token);
            }
            Some(token) => {
                output::note("resumptionToken", &token);
                break;
            }
            None => break,
        }
    }

    output::note("records", &format!("{} in {} page(s)", total, pages));
    Ok(())
}
