//! Put command implementation.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;

use gleaner_core::{Datestamp, MetadataDoc, MetadataPrefix, RecordId, SetSpec};
use gleaner_file::FileStore;

use crate::output;

#[derive(Args, Debug)]
pub struct PutArgs {
    /// Store root directory
    #[arg(long)]
    pub store: PathBuf,

    /// Record identifier
    #[arg(long)]
    pub id: String,

    /// Metadata format prefix the payload is rendered in
    #[arg(long)]
    pub format: String,

    /// Path to a JSON file with the metadata payload
    #[arg(long)]
    pub file: PathBuf,

    /// Set membership (repeatable)
    #[arg(long = "set")]
    pub sets: Vec<String>,

    /// Datestamp to record (defaults to now)
    #[arg(long)]
    pub datestamp: Option<String>,
}

pub fn run(args: PutArgs) -> Result<()> {
    let id = RecordId::new(&args.id).context("Invalid record identifier")?;
    let prefix = MetadataPrefix::new(&args.format).context("Invalid format prefix")?;
    let sets = args
        .sets
        .iter()
        .map(|s| SetSpec::new(s.as_str()))
        .collect::<gleaner_core::Result<Vec<_>>>()
        .context("Invalid set spec")?;

    let last_modified: DateTime<Utc> = match &args.datestamp {
        Some(s) => Datestamp::parse(s).context("Invalid datestamp")?.instant(),
        None => Utc::now(),
    };

    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&content).context("Metadata file is not valid JSON")?;
    let doc = MetadataDoc::new(value).context("Invalid metadata document")?;

    let store = FileStore::new(&args.store);
    store
        .put_record(&id, &sets, BTreeMap::from([(prefix, doc)]), last_modified)
        .context("Failed to store record")?;

    output::success(&format!("Stored {}", id));
    Ok(())
}
