//! Core harvesting protocol types.
//!
//! These types enforce protocol invariants at construction time,
//! ensuring invalid states are unrepresentable.

mod datestamp;
mod metadata_prefix;
mod record_id;
mod set_spec;

pub use datestamp::{Datestamp, Granularity};
pub use metadata_prefix::MetadataPrefix;
pub use record_id::RecordId;
pub use set_spec::SetSpec;
