//! Record and page types.
//!
//! This module defines what the record store hands the engine
//! ([`StoredRecord`]) and what the engine hands the serialization layer
//! ([`HarvestedRecord`], [`Page`]).

mod metadata_doc;
mod types;

pub use metadata_doc::MetadataDoc;
pub use types::{DeletionPolicy, HarvestedRecord, Page, RecordHeader, StoredRecord};
