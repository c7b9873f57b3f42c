//! gleaner-core - Types and traits for selective metadata harvesting.
//!
//! This crate defines the vocabulary shared by every gleaner component:
//! validated identifiers, the harvest [`Cursor`], record and page types,
//! the error taxonomy, and the collaborator traits (record store, format
//! registry, set resolver, clock) that concrete backends implement.

pub mod cursor;
pub mod error;
pub mod record;
pub mod traits;
pub mod types;

pub use cursor::{Cursor, Watermark};
pub use error::{Error, ErrorCode, InvalidInputError};
pub use record::{DeletionPolicy, HarvestedRecord, MetadataDoc, Page, RecordHeader, StoredRecord};
pub use traits::{
    Clock, FormatRegistry, HierarchicalSets, RangeQuery, RecordStore, SetResolver, SystemClock,
};
pub use types::{Datestamp, Granularity, MetadataPrefix, RecordId, SetSpec};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
