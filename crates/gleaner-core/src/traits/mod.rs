//! Collaborator traits.
//!
//! The engine is a pure function of its inputs; everything with state or
//! I/O hides behind one of these seams.

mod clock;
mod registry;
mod sets;
mod store;

pub use clock::{Clock, SystemClock};
pub use registry::FormatRegistry;
pub use sets::{HierarchicalSets, SetResolver};
pub use store::{RangeQuery, RecordStore};
