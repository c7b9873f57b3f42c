//! gleaner-file - Filesystem-backed record store for gleaner.
//!
//! One JSON file per record under `store/records/`, plus a format
//! registry read from `store/formats.json`. Intended for small
//! repositories, fixtures, and integration testing; a production
//! deployment would put a database behind the same
//! [`RecordStore`](gleaner_core::RecordStore) trait.

mod registry;
mod store;

pub use registry::FileFormatRegistry;
pub use store::FileStore;
